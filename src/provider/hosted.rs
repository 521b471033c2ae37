use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde_json::Value;

use crate::provider::{
    map_status_error, map_transport_error, CredentialResolver, ProviderError, ProviderErrorKind,
    TextProvider, PROVIDER_TIMEOUT_SECS,
};

/// Hosted multi-tenant backend speaking the OpenAI-compatible
/// chat-completions protocol. Each caller supplies their own API key through
/// the credential store.
pub struct HostedProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f32,
    credentials: Arc<dyn CredentialResolver>,
}

impl HostedProvider {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
        credentials: Arc<dyn CredentialResolver>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            model: model.into(),
            temperature,
            credentials,
        }
    }
}

#[async_trait]
impl TextProvider for HostedProvider {
    async fn generate(&self, user_id: &str, prompt: &str) -> Result<String, ProviderError> {
        let api_key = self.credentials.resolve(user_id).await.map_err(|_| {
            ProviderError::new(
                ProviderErrorKind::AuthenticationFailed,
                "no provider API key configured for this account",
            )
        })?;

        let payload = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "user", "content": prompt}
            ],
            "temperature": self.temperature,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key.expose_secret())
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
                format!("provider response was not valid JSON: {}", e),
            )
        })?;

        body.get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| {
                ProviderError::new(
                    ProviderErrorKind::MalformedUpstreamResponse,
                    "provider response carried no completion text",
                )
            })
    }
}
