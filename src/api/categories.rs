use serde_json::Value as JsonValue;

use crate::api::models::{Category, CategoryDraft};
use crate::error::{AppError, AppResult};
use crate::gateway::{ApiGateway, ApiMethod};
use crate::session::SessionStore;

/// Categories CRUD. The list endpoint returns a plain array.
#[derive(Clone)]
pub struct CategoriesService {
    gateway: ApiGateway,
    session: SessionStore,
}

impl CategoriesService {
    pub fn new(gateway: ApiGateway, session: SessionStore) -> Self {
        Self { gateway, session }
    }

    pub async fn list(&self) -> AppResult<Vec<Category>> {
        let token = self.session.bearer()?;
        self.gateway.request_as("categories", ApiMethod::Get, None, Some(&token)).await
    }

    pub async fn get(&self, id: i64) -> AppResult<Category> {
        let token = self.session.bearer()?;
        self.gateway
            .request_as(&format!("categories/{}", id), ApiMethod::Get, None, Some(&token))
            .await
    }

    pub async fn create(&self, draft: &CategoryDraft) -> AppResult<JsonValue> {
        self.validate(draft)?;
        let token = self.session.bearer()?;
        let body = serde_json::to_value(draft)
            .map_err(|e| AppError::internal("encode_category".to_string(), e.to_string()))?;
        self.gateway.request("categories", ApiMethod::Post, Some(&body), Some(&token)).await
    }

    pub async fn update(&self, id: i64, draft: &CategoryDraft) -> AppResult<JsonValue> {
        self.validate(draft)?;
        let token = self.session.bearer()?;
        let body = serde_json::to_value(draft)
            .map_err(|e| AppError::internal("encode_category".to_string(), e.to_string()))?;
        self.gateway
            .request(&format!("categories/{}", id), ApiMethod::Put, Some(&body), Some(&token))
            .await
    }

    pub async fn delete(&self, id: i64) -> AppResult<JsonValue> {
        let token = self.session.bearer()?;
        self.gateway
            .request(&format!("categories/{}", id), ApiMethod::Delete, None, Some(&token))
            .await
    }

    fn validate(&self, draft: &CategoryDraft) -> AppResult<()> {
        if draft.name.trim().is_empty() {
            return Err(AppError::validation("missing_name", "a category name is required"));
        }
        Ok(())
    }
}
