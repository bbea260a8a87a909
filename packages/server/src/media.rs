//! Media host upload client
//!
//! Posted binary images are not stored locally; they are delegated to a
//! configured media host over a multipart upload and the hosted URL is
//! substituted for the event's `image` field.

use crate::config::MediaConfig;
use axum::body::Bytes;
use thiserror::Error;

/// Media host upload failures (infrastructure errors, surfaced as 500s)
#[derive(Error, Debug)]
pub enum MediaError {
    #[error("Image upload request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Image host returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("Image host response missing url field")]
    MissingUrl,
}

/// HTTP client for the configured media host
#[derive(Debug, Clone)]
pub struct MediaClient {
    http: reqwest::Client,
    upload_url: String,
    api_key: Option<String>,
}

impl MediaClient {
    /// Create a client for the configured media host
    pub fn new(config: &MediaConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            upload_url: config.upload_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Upload image bytes and return the hosted URL
    ///
    /// Accepts either `url` or `secure_url` in the host's JSON response.
    pub async fn upload_image(
        &self,
        file_name: &str,
        bytes: Bytes,
    ) -> Result<String, MediaError> {
        let part = reqwest::multipart::Part::bytes(bytes.to_vec())
            .file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let mut request = self.http.post(&self.upload_url).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(MediaError::Status(response.status()));
        }

        let body: serde_json::Value = response.json().await?;
        body.get("secure_url")
            .or_else(|| body.get("url"))
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or(MediaError::MissingUrl)
    }
}
