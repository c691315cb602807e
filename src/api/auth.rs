use serde_json::json;
use tracing::info;

use crate::config::routes;
use crate::error::{AppError, AppResult};
use crate::gateway::{ApiGateway, ApiMethod};
use crate::identity::UserProfile;
use crate::session::SessionStore;

/// Login/logout against the backend, persisting the session triple on
/// success. Field validation happens before any network call.
#[derive(Clone)]
pub struct AuthService {
    gateway: ApiGateway,
    session: SessionStore,
}

impl AuthService {
    pub fn new(gateway: ApiGateway, session: SessionStore) -> Self {
        Self { gateway, session }
    }

    /// POST `auth/login` and persist the returned token/user pair. The
    /// reply must carry both; anything else is a failed login.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<UserProfile> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(AppError::validation("missing_credentials", "username and password are required"));
        }

        let body = json!({ "username": username, "password": password });
        let val = self.gateway.request("auth/login", ApiMethod::Post, Some(&body), None).await?;

        let token = val.get("token").and_then(|t| t.as_str());
        let user = val.get("user");
        let (Some(token), Some(user)) = (token, user) else {
            return Err(AppError::auth("login_failed", "login failed"));
        };
        let profile: UserProfile = serde_json::from_value(user.clone())
            .map_err(|e| AppError::auth("login_failed".to_string(), format!("unreadable user profile: {}", e)))?;

        self.session.save(token, &profile)?;
        info!(target: "goalblog::auth", "login ok user={}", profile.username);
        Ok(profile)
    }

    /// Clear the session and report where to navigate.
    pub fn logout(&self) -> AppResult<&'static str> {
        self.session.clear()?;
        info!(target: "goalblog::auth", "logout");
        Ok(routes::LOGIN)
    }

    pub fn session(&self) -> &SessionStore { &self.session }
}
