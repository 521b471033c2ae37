use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::provider::{
    map_status_error, map_transport_error, ProviderError, ProviderErrorKind, TextProvider,
    PROVIDER_TIMEOUT_SECS,
};

/// Self-hosted backend speaking the Ollama generate protocol. A single fixed
/// model serves every tenant; no per-user credentials.
pub struct LocalProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f32,
}

impl LocalProvider {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            model: model.into(),
            temperature,
        }
    }
}

#[async_trait]
impl TextProvider for LocalProvider {
    async fn generate(&self, _user_id: &str, prompt: &str) -> Result<String, ProviderError> {
        let payload = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
            "options": { "temperature": self.temperature },
        });

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&payload)
            .timeout(Duration::from_secs(PROVIDER_TIMEOUT_SECS))
            .send()
            .await
            .map_err(|e| map_transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status_error(status, &body));
        }

        let body: Value = response.json().await.map_err(|e| {
            ProviderError::new(
                ProviderErrorKind::MalformedUpstreamResponse,
                format!("model endpoint response was not valid JSON: {}", e),
            )
        })?;

        body.get("response")
            .and_then(|r| r.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| {
                ProviderError::new(
                    ProviderErrorKind::MalformedUpstreamResponse,
                    "model endpoint response carried no completion text",
                )
            })
    }
}
