use std::sync::Arc;

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Key, Nonce,
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};

use crate::errors::{AppError, AppResult};
use crate::models::domain::ProviderKeyRecord;
use crate::provider::CredentialResolver;
use crate::repositories::ProviderKeyRepository;

const NONCE_LEN: usize = 12;

/// Stores per-user provider API keys sealed with AES-256-GCM. Keys are only
/// ever decrypted in memory, immediately before an upstream call.
pub struct ProviderKeyService {
    cipher: Aes256Gcm,
    repository: Arc<dyn ProviderKeyRepository>,
}

impl ProviderKeyService {
    pub fn new(sealing_secret: &SecretString, repository: Arc<dyn ProviderKeyRepository>) -> Self {
        let digest = Sha256::digest(sealing_secret.expose_secret().as_bytes());
        let key = Key::<Aes256Gcm>::from_slice(digest.as_slice());
        Self {
            cipher: Aes256Gcm::new(key),
            repository,
        }
    }

    pub async fn store(&self, user_id: &str, api_key: &str) -> AppResult<()> {
        let ciphertext = self.seal(api_key)?;
        self.repository
            .upsert(ProviderKeyRecord::new(user_id, ciphertext))
            .await?;
        log::info!("provider key updated for user {}", user_id);
        Ok(())
    }

    fn seal(&self, plaintext: &str) -> AppResult<String> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let sealed = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| AppError::InternalError("failed to seal provider key".to_string()))?;

        let mut payload = Vec::with_capacity(NONCE_LEN + sealed.len());
        payload.extend_from_slice(nonce.as_slice());
        payload.extend_from_slice(&sealed);
        Ok(BASE64.encode(payload))
    }

    fn unseal(&self, ciphertext: &str) -> AppResult<SecretString> {
        let payload = BASE64
            .decode(ciphertext)
            .map_err(|_| AppError::InternalError("stored provider key is corrupt".to_string()))?;
        if payload.len() <= NONCE_LEN {
            return Err(AppError::InternalError(
                "stored provider key is corrupt".to_string(),
            ));
        }

        let (nonce, sealed) = payload.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), sealed)
            .map_err(|_| {
                AppError::InternalError("stored provider key could not be unsealed".to_string())
            })?;

        let api_key = String::from_utf8(plaintext)
            .map_err(|_| AppError::InternalError("stored provider key is corrupt".to_string()))?;
        Ok(SecretString::from(api_key))
    }
}

#[async_trait]
impl CredentialResolver for ProviderKeyService {
    async fn resolve(&self, user_id: &str) -> AppResult<SecretString> {
        let record = self
            .repository
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("No provider API key on file".to_string()))?;

        self.unseal(&record.ciphertext)
    }
}
