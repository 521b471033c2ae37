use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{db::Database, errors::AppResult, models::domain::SubmissionRecord};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    async fn create(&self, record: SubmissionRecord) -> AppResult<SubmissionRecord>;
    async fn list_by_user(
        &self,
        user_id: &str,
        quiz_id: Option<String>,
    ) -> AppResult<Vec<SubmissionRecord>>;
}

pub struct MongoSubmissionRepository {
    collection: Collection<SubmissionRecord>,
}

impl MongoSubmissionRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("submissions");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for submissions collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let user_quiz_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "quiz_id": 1 })
            .options(IndexOptions::builder().name("user_quiz".to_string()).build())
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(user_quiz_index).await?;

        Ok(())
    }
}

#[async_trait]
impl SubmissionRepository for MongoSubmissionRepository {
    async fn create(&self, record: SubmissionRecord) -> AppResult<SubmissionRecord> {
        self.collection.insert_one(&record).await?;
        Ok(record)
    }

    async fn list_by_user(
        &self,
        user_id: &str,
        quiz_id: Option<String>,
    ) -> AppResult<Vec<SubmissionRecord>> {
        let mut filter = doc! { "user_id": user_id };
        if let Some(qid) = quiz_id {
            filter.insert("quiz_id", qid);
        }

        let records = self
            .collection
            .find(filter)
            .sort(doc! { "submitted_at": -1 })
            .await?
            .try_collect()
            .await?;
        Ok(records)
    }
}
