use std::env;

use secrecy::SecretString;

/// Which generation backend the server talks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderMode {
    /// OpenAI-compatible hosted endpoint, per-user API keys.
    Hosted,
    /// Local Ollama instance, no credentials.
    Local,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub jwt_secret: SecretString,
    pub jwt_expiration_hours: i64,
    pub provider_mode: ProviderMode,
    pub provider_base_url: String,
    pub provider_model: String,
    pub provider_temperature: f32,
    pub key_sealing_secret: SecretString,
    pub ocr_base_url: String,
    pub upload_dir: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME")
                .unwrap_or_else(|_| "quizsmith-local".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            jwt_secret: SecretString::from(
                env::var("JWT_SECRET")
                    .unwrap_or_else(|_| "dev_secret_key_change_in_production".to_string()),
            ),
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(24),
            provider_mode: match env::var("PROVIDER_MODE").as_deref() {
                Ok("local") => ProviderMode::Local,
                _ => ProviderMode::Hosted,
            },
            provider_base_url: env::var("PROVIDER_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            provider_model: env::var("PROVIDER_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            provider_temperature: env::var("PROVIDER_TEMPERATURE")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(0.7),
            key_sealing_secret: SecretString::from(
                env::var("KEY_SEALING_SECRET")
                    .unwrap_or_else(|_| "dev_sealing_secret_change_in_production".to_string()),
            ),
            ocr_base_url: env::var("OCR_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:5001".to_string()),
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
        }
    }

    /// Validate that production-critical configuration is set
    /// Panics if required secrets are using default values
    pub fn validate_for_production(&self) {
        use secrecy::ExposeSecret;

        let jwt_secret = self.jwt_secret.expose_secret();
        let sealing_secret = self.key_sealing_secret.expose_secret();

        if jwt_secret == "dev_secret_key_change_in_production" {
            panic!(
                "FATAL: JWT_SECRET is using default value! Set JWT_SECRET environment variable to a secure random string."
            );
        }

        if jwt_secret.len() < 32 {
            panic!(
                "FATAL: JWT_SECRET is too short ({}). Must be at least 32 characters for security.",
                jwt_secret.len()
            );
        }

        if sealing_secret == "dev_sealing_secret_change_in_production" {
            panic!(
                "FATAL: KEY_SEALING_SECRET is using default value! Set KEY_SEALING_SECRET environment variable."
            );
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "quizsmith-test".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            jwt_secret: SecretString::from("test_jwt_secret_key".to_string()),
            jwt_expiration_hours: 1,
            provider_mode: ProviderMode::Local,
            provider_base_url: "http://localhost:11434".to_string(),
            provider_model: "llama3".to_string(),
            provider_temperature: 0.7,
            key_sealing_secret: SecretString::from("test_sealing_secret".to_string()),
            ocr_base_url: "http://localhost:5001".to_string(),
            upload_dir: "uploads".to_string(),
        }
    }
}
