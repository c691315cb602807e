//! Runtime configuration for the console client.
//! Everything is environment-driven with sensible defaults so the library
//! works out of the box against the production backend and tests can point
//! it at a mock server.

use chrono::Duration;

/// Route constants shared by the guard, the return-URL tracker and callers.
pub mod routes {
    pub const LOGIN: &str = "/";
    pub const DASHBOARD: &str = "/dashboard";
    pub const PROFILE: &str = "/profile";
    pub const POSTS: &str = "/posts";
    pub const CATEGORIES: &str = "/categories";
    pub const EMPLOYEES: &str = "/employees";
}

/// Durable storage keys for the session triple and the pending redirect.
/// All four are cleared together on logout.
pub mod keys {
    pub const TOKEN: &str = "authToken";
    pub const USER: &str = "userData";
    pub const EXPIRY: &str = "tokenExpiry";
    pub const RETURN_URL: &str = "returnUrl";
}

pub const DEFAULT_API_URL: &str = "https://api.toolapp.name.vn/api";
pub const DEFAULT_CLOUD_NAME: &str = "duv9pccwi";
pub const DEFAULT_UPLOAD_PRESET: &str = "poalupload";
pub const DEFAULT_UPLOAD_MAX_BYTES: u64 = 5 * 1024 * 1024;
pub const DEFAULT_SESSION_TTL_MS: i64 = 24 * 60 * 60 * 1000;

/// MIME types accepted by the media-upload channel.
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif"];

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the backend REST API, without a trailing slash.
    pub api_url: String,
    /// Media-host account the upload channel posts into.
    pub cloud_name: String,
    /// Fixed unsigned-upload preset identifier at the media host.
    pub upload_preset: String,
    /// Upload ceiling in bytes.
    pub upload_max_bytes: u64,
    /// How long a saved session stays valid.
    pub session_ttl: Duration,
}

impl Config {
    /// Read configuration from `GOALBLOG_*` environment variables, falling
    /// back to the defaults above for anything unset or unparseable.
    pub fn from_env() -> Self {
        let api_url = std::env::var("GOALBLOG_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let cloud_name = std::env::var("GOALBLOG_CLOUD_NAME").unwrap_or_else(|_| DEFAULT_CLOUD_NAME.to_string());
        let upload_preset = std::env::var("GOALBLOG_UPLOAD_PRESET").unwrap_or_else(|_| DEFAULT_UPLOAD_PRESET.to_string());
        let upload_max_bytes: u64 = std::env::var("GOALBLOG_UPLOAD_MAX_BYTES").ok()
            .and_then(|s| s.parse::<u64>().ok()).unwrap_or(DEFAULT_UPLOAD_MAX_BYTES);
        let session_ttl_ms: i64 = std::env::var("GOALBLOG_SESSION_TTL_MS").ok()
            .and_then(|s| s.parse::<i64>().ok()).unwrap_or(DEFAULT_SESSION_TTL_MS);
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            cloud_name,
            upload_preset,
            upload_max_bytes,
            session_ttl: Duration::milliseconds(session_ttl_ms),
        }
    }

    /// Configuration pointed at an explicit base URL, defaults elsewhere.
    /// Used by tests and by the console binary's `--api` flag.
    pub fn with_api_url(url: &str) -> Self {
        let mut cfg = Self::default();
        cfg.api_url = url.trim_end_matches('/').to_string();
        cfg
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            cloud_name: DEFAULT_CLOUD_NAME.to_string(),
            upload_preset: DEFAULT_UPLOAD_PRESET.to_string(),
            upload_max_bytes: DEFAULT_UPLOAD_MAX_BYTES,
            session_ttl: Duration::milliseconds(DEFAULT_SESSION_TTL_MS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_production_values() {
        let cfg = Config::default();
        assert_eq!(cfg.api_url, "https://api.toolapp.name.vn/api");
        assert_eq!(cfg.upload_max_bytes, 5 * 1024 * 1024);
        assert_eq!(cfg.session_ttl.num_hours(), 24);
    }

    #[test]
    fn with_api_url_strips_trailing_slash() {
        let cfg = Config::with_api_url("http://127.0.0.1:7878/api/");
        assert_eq!(cfg.api_url, "http://127.0.0.1:7878/api");
    }
}
