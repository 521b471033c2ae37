pub mod request;
pub mod response;

pub use request::{
    CombinedExamRequest, DescriptiveQuizRequest, GenerateQuizRequest, LoginRequest,
    ProviderKeyRequest, RegisterRequest, SubmissionHistoryQuery,
};
pub use response::{
    AuthResponse, GenerateQuizResponse, QuizSummary, RedactedQuestion, RedactedQuiz,
    SubmissionResponse, SuccessResponse,
};
