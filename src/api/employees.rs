use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value as JsonValue};
use tracing::{info, warn};

use crate::api::models::{Employee, EmployeeForm};
use crate::error::{AppError, AppResult};
use crate::gateway::{ApiGateway, ApiMethod, ImagePayload, MediaUploader};
use crate::identity::{Permissions, UserProfile};
use crate::session::SessionStore;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Self-service profile edit: the text fields an employee may change about
/// themselves. Serialized with the backend's write names.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub full_name: String,
    pub position: String,
    pub department: String,
    pub email: String,
    /// Current avatar URL; replaced only when a new upload succeeds.
    pub image: String,
}

#[derive(Debug, Clone, Default)]
pub struct PasswordChange {
    pub current: String,
    pub new: String,
    pub confirm: String,
}

/// Filters for the employee list.
#[derive(Debug, Clone, Default)]
pub struct EmployeeQuery {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    pub role: Option<String>,
    pub department: Option<String>,
}

impl EmployeeQuery {
    fn to_endpoint(&self) -> String {
        let page = self.page.max(1);
        let limit = if self.limit == 0 { 10 } else { self.limit };
        let mut url = format!("employees?limit={}&offset={}", limit, (page - 1) * limit);
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            url.push_str(&format!("&search={}", urlencoding::encode(search)));
        }
        if let Some(role) = self.role.as_deref().filter(|s| !s.is_empty()) {
            url.push_str(&format!("&role={}", urlencoding::encode(role)));
        }
        if let Some(department) = self.department.as_deref().filter(|s| !s.is_empty()) {
            url.push_str(&format!("&department={}", urlencoding::encode(department)));
        }
        url
    }
}

/// Employee management (the administrator screen) plus the self-service
/// profile operations that ride on the same endpoint.
#[derive(Clone)]
pub struct EmployeesService {
    gateway: ApiGateway,
    session: SessionStore,
    uploader: MediaUploader,
}

impl EmployeesService {
    pub fn new(gateway: ApiGateway, session: SessionStore, uploader: MediaUploader) -> Self {
        Self { gateway, session, uploader }
    }

    /// The employee screen is restricted to administrators. Re-derived from
    /// the current session snapshot on every call, never cached, because a
    /// background refetch can change the profile under us.
    fn ensure_admin(&self) -> AppResult<UserProfile> {
        let user = self.session.user()
            .ok_or_else(|| AppError::auth("not_authenticated", "session missing or expired"))?;
        if !Permissions::of(&user).is_admin() {
            return Err(AppError::auth("forbidden", "administrator role required"));
        }
        Ok(user)
    }

    pub async fn list(&self, query: &EmployeeQuery) -> AppResult<Vec<Employee>> {
        self.ensure_admin()?;
        let token = self.session.bearer()?;
        self.gateway
            .request_as(&query.to_endpoint(), ApiMethod::Get, None, Some(&token))
            .await
    }

    pub async fn get(&self, id: i64) -> AppResult<Employee> {
        self.ensure_admin()?;
        let token = self.session.bearer()?;
        self.gateway
            .request_as(&format!("employees/{}", id), ApiMethod::Get, None, Some(&token))
            .await
    }

    /// Create or update an employee record.
    ///
    /// Client-side validation runs first; a new avatar is uploaded next and
    /// a failed upload aborts the save. When the administrator edits their
    /// own record the permission fields must be untouched (courtesy guard;
    /// the server remains the authority).
    pub async fn save(
        &self,
        mut form: EmployeeForm,
        existing_id: Option<i64>,
        new_avatar: Option<&ImagePayload>,
    ) -> AppResult<JsonValue> {
        let current = self.ensure_admin()?;
        self.validate_form(&form, existing_id.is_none())?;

        if existing_id == Some(current.id) && Self::changes_own_permissions(&form, &current) {
            return Err(AppError::validation(
                "own_permissions",
                "permissions of the signed-in account cannot be changed here",
            ));
        }

        if let Some(image) = new_avatar {
            // Abort on failure, mirroring the post thumbnail rule.
            let uploaded = self.uploader.upload(image).await?;
            form.image = uploaded.url;
        }

        // A blank password on edit means "keep the existing one".
        if existing_id.is_some() && form.password.as_deref() == Some("") {
            form.password = None;
        }

        let token = self.session.bearer()?;
        let body = serde_json::to_value(&form)
            .map_err(|e| AppError::internal("encode_employee".to_string(), e.to_string()))?;
        match existing_id {
            None => {
                let val = self.gateway.request("employees", ApiMethod::Post, Some(&body), Some(&token)).await?;
                info!(target: "goalblog::employees", "created employee {}", form.username);
                Ok(val)
            }
            Some(id) => {
                self.gateway
                    .request(&format!("employees/{}", id), ApiMethod::Put, Some(&body), Some(&token))
                    .await
            }
        }
    }

    /// Delete an employee. The signed-in account cannot delete itself;
    /// deactivate it instead.
    pub async fn delete(&self, id: i64) -> AppResult<JsonValue> {
        let current = self.ensure_admin()?;
        if id == current.id {
            return Err(AppError::validation("delete_self", "the signed-in account cannot be deleted"));
        }
        let token = self.session.bearer()?;
        self.gateway
            .request(&format!("employees/{}", id), ApiMethod::Delete, None, Some(&token))
            .await
    }

    /// Self-service profile update. The avatar upload is non-fatal here:
    /// when it fails the text fields still save with the previous image,
    /// unlike post/employee creation which aborts.
    pub async fn update_profile(
        &self,
        employee_id: i64,
        mut update: ProfileUpdate,
        new_avatar: Option<&ImagePayload>,
    ) -> AppResult<JsonValue> {
        if update.full_name.trim().is_empty() {
            return Err(AppError::validation("missing_name", "a full name is required"));
        }
        if !update.email.is_empty() && !EMAIL_RE.is_match(&update.email) {
            return Err(AppError::validation("bad_email", "email address is not valid"));
        }

        if let Some(image) = new_avatar {
            match self.uploader.upload(image).await {
                Ok(uploaded) => update.image = uploaded.url,
                Err(e) => {
                    warn!(target: "goalblog::employees", "avatar upload failed, saving profile without it: {}", e);
                }
            }
        }

        let token = self.session.bearer()?;
        let body = json!({
            "hoVaTen": update.full_name,
            "chucVu": update.position,
            "phong": update.department,
            "email": update.email,
            "image": update.image,
        });
        let val = self.gateway
            .request(&format!("employees/{}", employee_id), ApiMethod::Put, Some(&body), Some(&token))
            .await?;

        // Keep the stored session profile's display name current.
        if let Some(mut user) = self.session.user() {
            user.name = update.full_name.clone();
            if let Some(token) = self.session.token() {
                self.session.save(&token, &user)?;
            }
        }
        Ok(val)
    }

    /// Change the signed-in employee's password.
    pub async fn change_password(&self, employee_id: i64, change: &PasswordChange) -> AppResult<JsonValue> {
        if change.current.is_empty() {
            return Err(AppError::validation("missing_current", "the current password is required"));
        }
        if change.new.is_empty() {
            return Err(AppError::validation("missing_new", "a new password is required"));
        }
        if change.new != change.confirm {
            return Err(AppError::validation("password_mismatch", "the new passwords do not match"));
        }
        let token = self.session.bearer()?;
        let body = json!({ "password": change.new, "currentPassword": change.current });
        self.gateway
            .request(&format!("employees/{}", employee_id), ApiMethod::Put, Some(&body), Some(&token))
            .await
    }

    fn validate_form(&self, form: &EmployeeForm, creating: bool) -> AppResult<()> {
        if form.full_name.trim().is_empty() {
            return Err(AppError::validation("missing_name", "a full name is required"));
        }
        if form.username.trim().is_empty() {
            return Err(AppError::validation("missing_username", "a username is required"));
        }
        if creating && form.password.as_deref().unwrap_or("").is_empty() {
            return Err(AppError::validation("missing_password", "a password is required"));
        }
        if form.email.trim().is_empty() {
            return Err(AppError::validation("missing_email", "an email address is required"));
        }
        if !EMAIL_RE.is_match(&form.email) {
            return Err(AppError::validation("bad_email", "email address is not valid"));
        }
        if form.position.trim().is_empty() {
            return Err(AppError::validation("missing_position", "a position is required"));
        }
        if form.department.trim().is_empty() {
            return Err(AppError::validation("missing_department", "a department is required"));
        }
        Ok(())
    }

    fn changes_own_permissions(form: &EmployeeForm, current: &UserProfile) -> bool {
        form.role_tag != current.role_tag
            || form.can_view != current.can_view
            || form.can_create != current.can_create
            || form.can_edit != current.can_edit
            || form.can_delete != current.can_delete
    }
}
