use std::sync::Arc;

use serde_json::Value;

use crate::constants::prompts::build_evaluation_prompt;
use crate::errors::truncate_chars;
use crate::models::domain::{EvaluationOutcome, Question};
use crate::parsing::clean;
use crate::provider::TextProvider;

/// Deterministic comparator for multiple-choice answers. The user's answer
/// (trimmed, uppercased) is compared to the leading letter token of the
/// stored answer, i.e. the text before the first '.'. Full-text answers like
/// "Ampere" against "C. Ampere" do not match; the contract is the letter.
pub fn matches_multiple_choice(question: &Question, user_answer: &str) -> bool {
    let expected = question
        .answer
        .split('.')
        .next()
        .unwrap_or("")
        .trim()
        .to_uppercase();
    let given = user_answer.trim().to_uppercase();

    !expected.is_empty() && expected == given
}

/// Deterministic comparator for fill-in-blank answers: trimmed,
/// case-insensitive exact equality. No fuzzy matching or synonym handling;
/// "colour" does not match "color".
pub fn matches_fill_blank(question: &Question, user_answer: &str) -> bool {
    question.answer.trim().to_lowercase() == user_answer.trim().to_lowercase()
}

/// A grading verdict for one free-text answer. Construction never fails;
/// grader trouble degrades into a zero score with diagnostic feedback.
#[derive(Clone, Debug, PartialEq)]
pub struct GradedAnswer {
    pub score: i32,
    pub feedback: String,
    pub correct_parts: String,
    pub improvements: String,
    pub outcome: EvaluationOutcome,
}

impl GradedAnswer {
    fn failed(feedback: String) -> Self {
        GradedAnswer {
            score: 0,
            feedback,
            correct_parts: "N/A".to_string(),
            improvements: "N/A".to_string(),
            outcome: EvaluationOutcome::Failed,
        }
    }
}

/// AI-assisted grader for descriptive answers. Treats the grading model's
/// output as untrusted: missing or wrong-typed fields are repaired with
/// defaults instead of discarding the attempt.
pub struct DescriptiveGrader {
    provider: Arc<dyn TextProvider>,
}

impl DescriptiveGrader {
    pub fn new(provider: Arc<dyn TextProvider>) -> Self {
        Self { provider }
    }

    pub async fn evaluate(
        &self,
        user_id: &str,
        question: &Question,
        typed_answer: &str,
        reference_text: &str,
    ) -> GradedAnswer {
        let prompt = build_evaluation_prompt(question, typed_answer, reference_text);

        let raw = match self.provider.generate(user_id, &prompt).await {
            Ok(raw) => raw,
            Err(err) => {
                log::warn!("descriptive grading call failed: {}", err);
                return GradedAnswer::failed(format!(
                    "Automatic grading was unavailable for this answer ({}). Scored 0 by default.",
                    err.kind
                ));
            }
        };

        parse_grading_response(&raw)
    }
}

/// Validates and repairs the grading model's JSON. `score` must be a number
/// and the three text fields strings; anything missing is defaulted rather
/// than fatal. Only an unparseable body yields the full default object.
fn parse_grading_response(raw: &str) -> GradedAnswer {
    let cleaned = clean(raw);

    let root: Value = match serde_json::from_str(&cleaned) {
        Ok(v) => v,
        Err(_) => {
            return GradedAnswer::failed(format!(
                "Could not parse the grading response (starts with: \"{}\"). Scored 0 by default.",
                truncate_chars(&cleaned, 60)
            ));
        }
    };

    let score_value = root.get("score").and_then(|v| v.as_f64());
    let feedback = root.get("feedback").and_then(|v| v.as_str());
    let correct_parts = root.get("correct_parts").and_then(|v| v.as_str());
    let improvements = root.get("improvements").and_then(|v| v.as_str());

    let complete = score_value.is_some()
        && feedback.is_some()
        && correct_parts.is_some()
        && improvements.is_some();

    let score = score_value
        .map(|s| s.round() as i64)
        .unwrap_or(0)
        .clamp(0, 10) as i32;

    GradedAnswer {
        score,
        feedback: feedback.unwrap_or("N/A").to_string(),
        correct_parts: correct_parts.unwrap_or("N/A").to_string(),
        improvements: improvements.unwrap_or("N/A").to_string(),
        outcome: if complete {
            EvaluationOutcome::Valid
        } else {
            EvaluationOutcome::PartialWithDefaults
        },
    }
}
