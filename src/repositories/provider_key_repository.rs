use async_trait::async_trait;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::ProviderKeyRecord};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProviderKeyRepository: Send + Sync {
    /// Single atomic insert-or-replace keyed by user id. Concurrent updates
    /// from the same user can never produce duplicate rows.
    async fn upsert(&self, record: ProviderKeyRecord) -> AppResult<()>;
    async fn find_by_user(&self, user_id: &str) -> AppResult<Option<ProviderKeyRecord>>;
}

pub struct MongoProviderKeyRepository {
    collection: Collection<ProviderKeyRecord>,
}

impl MongoProviderKeyRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("provider_keys");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for provider_keys collection");

        let user_index = IndexModel::builder()
            .keys(doc! { "user_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("user_id_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(user_index).await?;

        Ok(())
    }
}

#[async_trait]
impl ProviderKeyRepository for MongoProviderKeyRepository {
    async fn upsert(&self, record: ProviderKeyRecord) -> AppResult<()> {
        self.collection
            .replace_one(doc! { "user_id": &record.user_id }, &record)
            .upsert(true)
            .await?;
        Ok(())
    }

    async fn find_by_user(&self, user_id: &str) -> AppResult<Option<ProviderKeyRecord>> {
        let record = self
            .collection
            .find_one(doc! { "user_id": user_id })
            .await?;
        Ok(record)
    }
}
