use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::question::{Question, QuestionType};

/// A generated quiz, owned by exactly one user and immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String,
    pub user_id: String,
    pub quiz_type: QuizType,
    pub class_label: String,
    pub curriculum: String,
    pub subject: String,
    pub chapters: Vec<String>,
    pub questions: Vec<Question>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum QuizType {
    MultipleChoice,
    FillBlank,
    Descriptive,
    Combined,
}

impl QuizType {
    /// The question type generated for a single-type quiz. `Combined` quizzes
    /// are built from per-type sub-batches and have no single question type.
    pub fn question_type(&self) -> Option<QuestionType> {
        match self {
            QuizType::MultipleChoice => Some(QuestionType::MultipleChoice),
            QuizType::FillBlank => Some(QuestionType::FillBlank),
            QuizType::Descriptive => Some(QuestionType::Descriptive),
            QuizType::Combined => None,
        }
    }
}

impl Quiz {
    pub fn new(
        user_id: &str,
        quiz_type: QuizType,
        class_label: &str,
        curriculum: &str,
        subject: &str,
        chapters: Vec<String>,
        questions: Vec<Question>,
    ) -> Self {
        Quiz {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            quiz_type,
            class_label: class_label.to_string(),
            curriculum: curriculum.to_string(),
            subject: subject.to_string(),
            chapters,
            questions,
            created_at: Utc::now(),
        }
    }
}
