pub mod auth_handler;
pub mod health_handler;
pub mod provider_key_handler;
pub mod quiz_handler;
pub mod submission_handler;

pub use auth_handler::{login, register};
pub use health_handler::{health_check, health_check_ready};
pub use provider_key_handler::put_provider_key;
pub use quiz_handler::{
    delete_quiz, generate_combined_exam, generate_descriptive_quiz, generate_quiz, get_quiz,
    list_quizzes,
};
pub use submission_handler::{list_submissions, submit_quiz};
