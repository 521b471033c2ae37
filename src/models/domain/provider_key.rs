use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One sealed provider API key per user. `ciphertext` is base64 of
/// nonce || AES-256-GCM ciphertext; the plaintext never touches the store.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProviderKeyRecord {
    pub user_id: String,
    pub ciphertext: String,
    pub updated_at: DateTime<Utc>,
}

impl ProviderKeyRecord {
    pub fn new(user_id: &str, ciphertext: String) -> Self {
        ProviderKeyRecord {
            user_id: user_id.to_string(),
            ciphertext,
            updated_at: Utc::now(),
        }
    }
}
