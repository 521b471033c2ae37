use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{
    EvaluationResult, Question, QuestionType, Quiz, QuizType, SubmissionRecord,
};

/// Answer-key-free view of a question, safe to send to the quiz-taker.
/// `options` is always serialized, empty for non-multiple-choice types, so
/// clients never branch on a missing key.
#[derive(Debug, Clone, Serialize)]
pub struct RedactedQuestion {
    pub id: String,
    pub question: String,
    pub question_type: QuestionType,
    pub options: Vec<String>,
}

impl From<Question> for RedactedQuestion {
    fn from(question: Question) -> Self {
        RedactedQuestion {
            id: question.id,
            question: question.question,
            question_type: question.question_type,
            options: question.options,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RedactedQuiz {
    pub id: String,
    pub quiz_type: QuizType,
    #[serde(rename = "class")]
    pub class_label: String,
    pub curriculum: String,
    pub subject: String,
    pub chapters: Vec<String>,
    pub questions: Vec<RedactedQuestion>,
    pub created_at: DateTime<Utc>,
}

impl From<Quiz> for RedactedQuiz {
    fn from(quiz: Quiz) -> Self {
        RedactedQuiz {
            id: quiz.id,
            quiz_type: quiz.quiz_type,
            class_label: quiz.class_label,
            curriculum: quiz.curriculum,
            subject: quiz.subject,
            chapters: quiz.chapters,
            questions: quiz.questions.into_iter().map(RedactedQuestion::from).collect(),
            created_at: quiz.created_at,
        }
    }
}

/// List-view row for a user's quizzes.
#[derive(Debug, Clone, Serialize)]
pub struct QuizSummary {
    pub id: String,
    pub quiz_type: QuizType,
    pub subject: String,
    pub chapters: Vec<String>,
    pub question_count: usize,
    pub created_at: DateTime<Utc>,
}

impl From<Quiz> for QuizSummary {
    fn from(quiz: Quiz) -> Self {
        QuizSummary {
            id: quiz.id,
            quiz_type: quiz.quiz_type,
            subject: quiz.subject,
            chapters: quiz.chapters,
            question_count: quiz.questions.len(),
            created_at: quiz.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateQuizResponse {
    pub success: bool,
    pub quiz_id: String,
}

#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub score: f64,
    pub total_score: i32,
    pub max_possible_score: i32,
    pub results: Vec<EvaluationResult>,
    pub message: String,
}

impl From<SubmissionRecord> for SubmissionResponse {
    fn from(record: SubmissionRecord) -> Self {
        SubmissionResponse {
            score: record.score_percent,
            total_score: record.total_score,
            max_possible_score: record.max_possible_score,
            results: record.results,
            message: "Quiz evaluated successfully".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}
