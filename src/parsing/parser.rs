use std::collections::HashSet;

use serde_json::Value;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::domain::{Question, QuestionType};
use crate::parsing::sanitizer::clean_field_text;

/// Parses sanitized generator output into validated questions.
///
/// Fails with `MalformedGeneration` when the text is not JSON, lacks a
/// `questions` array, or yields no usable entries. A count differing from
/// `expected_count` is tolerated and logged; missing questions are never
/// fabricated.
pub fn parse_questions(
    cleaned: &str,
    question_type: QuestionType,
    expected_count: u32,
) -> AppResult<Vec<Question>> {
    let root: Value =
        serde_json::from_str(cleaned).map_err(|_| AppError::malformed_generation(cleaned))?;

    let entries = root
        .get("questions")
        .and_then(|q| q.as_array())
        .ok_or_else(|| AppError::malformed_generation(cleaned))?;

    if entries.is_empty() {
        return Err(AppError::malformed_generation(cleaned));
    }

    let mut seen_ids: HashSet<String> = HashSet::new();
    let mut questions = Vec::with_capacity(entries.len());

    for entry in entries {
        match parse_entry(entry, question_type, &mut seen_ids) {
            Some(question) => questions.push(question),
            None => log::warn!("skipping generated entry with no question text"),
        }
    }

    if questions.is_empty() {
        return Err(AppError::malformed_generation(cleaned));
    }

    if questions.len() as u32 != expected_count {
        log::warn!(
            "generator returned {} questions, {} requested; accepting the batch",
            questions.len(),
            expected_count
        );
    }

    Ok(questions)
}

fn parse_entry(
    entry: &Value,
    question_type: QuestionType,
    seen_ids: &mut HashSet<String>,
) -> Option<Question> {
    let text = clean_field_text(entry.get("question").and_then(|v| v.as_str()).unwrap_or(""));
    if text.is_empty() {
        return None;
    }

    let answer = clean_field_text(entry.get("answer").and_then(|v| v.as_str()).unwrap_or(""));
    let explanation = clean_field_text(
        entry
            .get("explanation")
            .and_then(|v| v.as_str())
            .unwrap_or(""),
    );

    let options = if question_type == QuestionType::MultipleChoice {
        entry
            .get("options")
            .and_then(|v| v.as_array())
            .map(|opts| {
                opts.iter()
                    .filter_map(|o| o.as_str())
                    .map(clean_field_text)
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    } else {
        Vec::new()
    };

    if question_type == QuestionType::MultipleChoice && !(2..=6).contains(&options.len()) {
        log::warn!(
            "multiple-choice entry carries {} options, expected 2 to 6; accepting it",
            options.len()
        );
    }

    let id = assign_id(entry.get("id"), seen_ids);

    Some(Question {
        id,
        question: text,
        question_type,
        options,
        answer,
        explanation,
    })
}

/// Keeps a generator-supplied id (string or number, coerced to string) when
/// it is non-empty and unused within the batch; otherwise synthesizes a fresh
/// UUID. Ids are unique within a batch by construction.
fn assign_id(supplied: Option<&Value>, seen_ids: &mut HashSet<String>) -> String {
    let coerced = supplied.and_then(|v| match v {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    });

    let id = match coerced {
        Some(candidate) if !seen_ids.contains(&candidate) => candidate,
        _ => Uuid::new_v4().to_string(),
    };

    seen_ids.insert(id.clone());
    id
}
