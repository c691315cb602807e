use crate::api::models::{DashboardStats, GrowthStats};
use crate::error::AppResult;
use crate::gateway::{ApiGateway, ApiMethod};
use crate::session::SessionStore;

/// Month-over-month growth in percent. Zero when the previous month had
/// nothing to compare against, so the headline tile never shows a division
/// artifact.
pub fn growth_percent(this_month: i64, last_month: i64) -> f64 {
    if last_month <= 0 {
        return 0.0;
    }
    (this_month - last_month) as f64 / last_month as f64 * 100.0
}

impl GrowthStats {
    pub fn post_growth_percent(&self) -> f64 {
        growth_percent(self.posts_this_month, self.posts_last_month)
    }

    pub fn view_growth_percent(&self) -> f64 {
        growth_percent(self.views_this_month, self.views_last_month)
    }
}

/// Dashboard statistics fetch.
#[derive(Clone)]
pub struct StatisticsService {
    gateway: ApiGateway,
    session: SessionStore,
}

impl StatisticsService {
    pub fn new(gateway: ApiGateway, session: SessionStore) -> Self {
        Self { gateway, session }
    }

    pub async fn fetch(&self) -> AppResult<DashboardStats> {
        let token = self.session.bearer()?;
        self.gateway
            .request_as("statistics", ApiMethod::Get, None, Some(&token))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growth_math() {
        assert_eq!(growth_percent(15, 10), 50.0);
        assert_eq!(growth_percent(5, 10), -50.0);
        assert_eq!(growth_percent(10, 10), 0.0);
    }

    #[test]
    fn growth_with_empty_previous_month_is_zero() {
        assert_eq!(growth_percent(12, 0), 0.0);
        assert_eq!(growth_percent(0, 0), 0.0);
    }

    #[test]
    fn growth_from_wire_shape() {
        let g: GrowthStats = serde_json::from_str(
            r#"{"BaiVietThangNay":6,"BaiVietThangTruoc":4,"LuotXemThangNay":300,"LuotXemThangTruoc":200}"#,
        ).unwrap();
        assert_eq!(g.post_growth_percent(), 50.0);
        assert_eq!(g.view_growth_percent(), 50.0);
    }
}
