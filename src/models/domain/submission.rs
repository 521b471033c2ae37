use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::question::QuestionType;

/// How the AI grader's structured output survived validation. Objective
/// questions are always `Valid` since their grading is deterministic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum EvaluationOutcome {
    Valid,
    PartialWithDefaults,
    Failed,
}

/// Grading outcome for one question within one submission.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct EvaluationResult {
    pub question: String,
    pub question_type: QuestionType,
    pub correct_answer: String,
    pub explanation: String,
    pub user_answer: String,
    pub extracted_text: String,
    pub score: i32,
    pub feedback: String,
    pub correct_parts: String,
    pub improvements: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
    pub outcome: EvaluationOutcome,
}

/// One graded submission attempt. Created once, never mutated.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SubmissionRecord {
    pub id: String,
    pub user_id: String,
    pub quiz_id: String,
    pub score_percent: f64,
    pub total_score: i32,
    pub max_possible_score: i32,
    pub results: Vec<EvaluationResult>,
    pub submitted_at: DateTime<Utc>,
}

impl SubmissionRecord {
    pub fn new(
        user_id: &str,
        quiz_id: &str,
        score_percent: f64,
        total_score: i32,
        max_possible_score: i32,
        results: Vec<EvaluationResult>,
    ) -> Self {
        SubmissionRecord {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            quiz_id: quiz_id.to_string(),
            score_percent,
            total_score,
            max_possible_score,
            results,
            submitted_at: Utc::now(),
        }
    }
}
