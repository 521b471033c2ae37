pub mod provider_key_repository;
pub mod quiz_repository;
pub mod submission_repository;
pub mod user_repository;

pub use provider_key_repository::{MongoProviderKeyRepository, ProviderKeyRepository};
pub use quiz_repository::{MongoQuizRepository, QuizRepository};
pub use submission_repository::{MongoSubmissionRepository, SubmissionRepository};
pub use user_repository::{MongoUserRepository, UserRepository};
