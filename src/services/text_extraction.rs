use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::errors::{AppError, AppResult};

const EXTRACTION_TIMEOUT_SECS: u64 = 60;

/// Pulls plain text out of an uploaded document so it can serve as grading
/// reference material.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, path: &Path) -> AppResult<String>;
}

/// Delegates extraction to the OCR sidecar over HTTP. The sidecar accepts a
/// raw PDF body on POST /extract and answers `{"text": "..."}`.
pub struct OcrSidecarExtractor {
    client: reqwest::Client,
    base_url: String,
}

impl OcrSidecarExtractor {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl TextExtractor for OcrSidecarExtractor {
    async fn extract_text(&self, path: &Path) -> AppResult<String> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AppError::InternalError(format!("could not read upload: {}", e)))?;

        let response = self
            .client
            .post(format!("{}/extract", self.base_url))
            .header("Content-Type", "application/pdf")
            .body(bytes)
            .timeout(Duration::from_secs(EXTRACTION_TIMEOUT_SECS))
            .send()
            .await
            .map_err(|e| AppError::InternalError(format!("text extraction failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::InternalError(format!(
                "text extraction failed with status {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::InternalError(format!("text extraction failed: {}", e)))?;

        Ok(body
            .get("text")
            .and_then(|t| t.as_str())
            .unwrap_or_default()
            .to_string())
    }
}
