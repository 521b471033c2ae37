pub mod evaluation_service;
pub mod provider_key_service;
pub mod quiz_service;
pub mod submission_service;
pub mod text_extraction;
pub mod user_service;

pub use evaluation_service::DescriptiveGrader;
pub use provider_key_service::ProviderKeyService;
pub use quiz_service::QuizService;
pub use submission_service::SubmissionService;
pub use text_extraction::{OcrSidecarExtractor, TextExtractor};
pub use user_service::UserService;
