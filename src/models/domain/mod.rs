pub mod provider_key;
pub mod question;
pub mod quiz;
pub mod submission;
pub mod user;

pub use provider_key::ProviderKeyRecord;
pub use question::{Question, QuestionType};
pub use quiz::{Quiz, QuizType};
pub use submission::{EvaluationOutcome, EvaluationResult, SubmissionRecord};
pub use user::User;
