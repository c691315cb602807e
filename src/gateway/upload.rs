use base64::Engine;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::config::{Config, ALLOWED_IMAGE_TYPES};
use crate::error::{AppError, AppResult};

/// An image picked by the user, before any validation or transfer.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadMetadata {
    pub name: String,
    pub size: u64,
    pub format: String,
    pub width: u64,
    pub height: u64,
}

/// Normalized result of a successful transfer to the media host.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadResult {
    pub url: String,
    pub public_id: String,
    pub metadata: UploadMetadata,
}

/// Upload channel to the third-party media host. Validation runs before
/// any network activity: an oversized or wrong-type payload is rejected
/// locally and nothing is transferred.
#[derive(Clone)]
pub struct MediaUploader {
    endpoint: String,
    upload_preset: String,
    max_bytes: u64,
    client: reqwest::Client,
}

impl MediaUploader {
    pub fn new(config: &Config) -> Self {
        Self {
            endpoint: format!(
                "https://api.cloudinary.com/v1_1/{}/image/upload",
                config.cloud_name
            ),
            upload_preset: config.upload_preset.clone(),
            max_bytes: config.upload_max_bytes,
            client: reqwest::Client::new(),
        }
    }

    /// Pre-flight checks. Returns a validation error without touching the
    /// network when the payload is empty, oversized, or of a type outside
    /// the allow-list.
    pub fn validate(&self, payload: &ImagePayload) -> AppResult<()> {
        if payload.bytes.is_empty() {
            return Err(AppError::validation("empty_file", "no file content to upload"));
        }
        if payload.bytes.len() as u64 > self.max_bytes {
            return Err(AppError::validation(
                "file_too_large".to_string(),
                format!("file exceeds the {} MB limit", self.max_bytes / 1024 / 1024),
            ));
        }
        if !ALLOWED_IMAGE_TYPES.contains(&payload.mime.as_str()) {
            return Err(AppError::validation(
                "unsupported_type".to_string(),
                format!("file type {} is not supported", payload.mime),
            ));
        }
        Ok(())
    }

    /// Validate, encode and transfer the payload; returns the normalized
    /// result or a validation/transfer failure.
    pub async fn upload(&self, payload: &ImagePayload) -> AppResult<UploadResult> {
        self.validate(payload)?;

        // The media host accepts the file as a base64 data URI form field.
        let data_uri = format!(
            "data:{};base64,{}",
            payload.mime,
            base64::engine::general_purpose::STANDARD.encode(&payload.bytes)
        );
        let form = reqwest::multipart::Form::new()
            .text("file", data_uri)
            .text("upload_preset", self.upload_preset.clone());

        debug!(target: "goalblog::upload", "uploading {} ({} bytes) to media host", payload.file_name, payload.bytes.len());
        let resp = self.client.post(&self.endpoint).multipart(form).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let val: JsonValue = resp.json().await.unwrap_or(JsonValue::Null);
            let message = val
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(|s| s.to_string())
                .unwrap_or_else(|| format!("upload failed: HTTP {}", status));
            warn!(target: "goalblog::upload", "media host rejected upload: {}", message);
            return Err(AppError::api(status.as_u16(), "upload_failed".to_string(), message));
        }

        let data: JsonValue = resp.json().await?;
        let Some(url) = data.get("secure_url").and_then(|u| u.as_str()) else {
            return Err(AppError::api(status.as_u16(), "upload_failed", "invalid response from media host"));
        };
        Ok(UploadResult {
            url: url.to_string(),
            public_id: data.get("public_id").and_then(|v| v.as_str()).unwrap_or_default().to_string(),
            metadata: UploadMetadata {
                name: data.get("original_filename").and_then(|v| v.as_str()).unwrap_or(&payload.file_name).to_string(),
                size: data.get("bytes").and_then(|v| v.as_u64()).unwrap_or(payload.bytes.len() as u64),
                format: data.get("format").and_then(|v| v.as_str()).unwrap_or_default().to_string(),
                width: data.get("width").and_then(|v| v.as_u64()).unwrap_or(0),
                height: data.get("height").and_then(|v| v.as_u64()).unwrap_or(0),
            },
        })
    }
}
