use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::config::{keys, Config};
use crate::error::AppResult;
use crate::identity::UserProfile;
use crate::session::ReturnUrlTracker;
use crate::storage::{SharedBackend, StorageOp};

/// Persistent session state over an injected storage backend.
///
/// The token, user profile and expiry timestamp are written and cleared as
/// one atomic batch so readers never observe a partially-valid session.
/// Expiry is detected lazily: nothing polls, the next `is_authenticated`
/// check discovers it and clears the stale state. All mutations here are
/// synchronous (never across an await point), so rapid save/clear sequences
/// from interleaved async completions apply in program order.
#[derive(Clone)]
pub struct SessionStore {
    backend: SharedBackend,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(backend: SharedBackend, config: &Config) -> Self {
        Self { backend, ttl: config.session_ttl }
    }

    /// Override the session lifetime. Tests use this to exercise expiry
    /// without sleeping.
    pub fn with_ttl(backend: SharedBackend, ttl: Duration) -> Self {
        Self { backend, ttl }
    }

    /// Persist a fresh session: token, serialized profile, and
    /// `expiry = now + ttl`, in one batch. A second save overwrites the
    /// first wholesale, never merging users.
    pub fn save(&self, token: &str, user: &UserProfile) -> AppResult<()> {
        let expiry = Utc::now() + self.ttl;
        let user_json = serde_json::to_string(user)
            .map_err(|e| crate::error::AppError::internal("encode_user".to_string(), e.to_string()))?;
        self.backend.apply(&[
            StorageOp::set(keys::TOKEN, token),
            StorageOp::set(keys::USER, user_json),
            StorageOp::set(keys::EXPIRY, expiry.to_rfc3339()),
        ])?;
        debug!(target: "goalblog::session", "session saved user={} expiry={}", user.username, expiry.to_rfc3339());
        Ok(())
    }

    /// The stored bearer token, if any.
    pub fn token(&self) -> Option<String> {
        self.backend.get(keys::TOKEN)
    }

    /// The token for an authorized API call. Fails with an auth error when
    /// the session is missing or expired (clearing stale state as a side
    /// effect of the check), so callers never send a dead token.
    pub fn bearer(&self) -> AppResult<String> {
        if !self.is_authenticated(None) {
            return Err(crate::error::AppError::auth("not_authenticated", "session missing or expired"));
        }
        self.token()
            .ok_or_else(|| crate::error::AppError::auth("not_authenticated", "session missing or expired"))
    }

    /// The stored profile. Malformed stored JSON is treated as absence,
    /// never an error.
    pub fn user(&self) -> Option<UserProfile> {
        let raw = self.backend.get(keys::USER)?;
        match serde_json::from_str::<UserProfile>(&raw) {
            Ok(u) => Some(u),
            Err(e) => {
                warn!(target: "goalblog::session", "stored user unparseable, treating as absent: {}", e);
                None
            }
        }
    }

    /// Remove token, user, expiry and any pending return-URL together.
    /// Used on logout and on detected expiry.
    pub fn clear(&self) -> AppResult<()> {
        self.backend.apply(&[
            StorageOp::remove(keys::TOKEN),
            StorageOp::remove(keys::USER),
            StorageOp::remove(keys::EXPIRY),
            StorageOp::remove(keys::RETURN_URL),
        ])?;
        debug!(target: "goalblog::session", "session cleared");
        Ok(())
    }

    /// True iff token, expiry and user are all present and the expiry has
    /// not passed. On a past expiry the stale state is cleared. On any
    /// false outcome, `current_path` (when given) is recorded as the
    /// post-login redirect target.
    pub fn is_authenticated(&self, current_path: Option<&str>) -> bool {
        let token = self.backend.get(keys::TOKEN);
        let expiry = self.backend.get(keys::EXPIRY);
        let user = self.backend.get(keys::USER);

        let tracker = ReturnUrlTracker::new(self.backend.clone());
        let (Some(_token), Some(expiry), Some(user_raw)) = (token, expiry, user) else {
            if let Some(path) = current_path {
                tracker.save(path);
            }
            return false;
        };

        let expired = match DateTime::parse_from_rfc3339(&expiry) {
            Ok(t) => Utc::now() > t.with_timezone(&Utc),
            // An unreadable expiry is an inconsistent session; treat as expired.
            Err(_) => true,
        };
        // Same for an unreadable profile: the triple is only valid as a unit.
        let expired = expired || serde_json::from_str::<UserProfile>(&user_raw).is_err();
        if expired {
            let _ = self.clear();
            if let Some(path) = current_path {
                tracker.save(path);
            }
            return false;
        }
        true
    }
}
