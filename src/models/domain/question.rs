use serde::{Deserialize, Serialize};

/// A single generated question. `options` is populated only for
/// `MultipleChoice`; `answer` holds the canonical ground truth ("C. Ampere"
/// for multiple choice, the expected string for fill-in-blank, a model answer
/// for descriptive questions).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: String,
    pub question: String,
    pub question_type: QuestionType,
    #[serde(default)]
    pub options: Vec<String>,
    pub answer: String,
    pub explanation: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum QuestionType {
    MultipleChoice,
    FillBlank,
    Descriptive,
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::FillBlank => "fill_blank",
            QuestionType::Descriptive => "descriptive",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_type_round_trip_serialization() {
        let variants = [
            QuestionType::MultipleChoice,
            QuestionType::FillBlank,
            QuestionType::Descriptive,
        ];

        for variant in variants {
            let json = serde_json::to_string(&variant).expect("variant should serialize");
            let parsed: QuestionType =
                serde_json::from_str(&json).expect("variant should deserialize");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn question_type_rejects_unknown_variant() {
        let invalid = "\"Essay\"";
        let parsed = serde_json::from_str::<QuestionType>(invalid);

        assert!(parsed.is_err());
    }

    #[test]
    fn question_deserializes_without_options() {
        let json = r#"{
            "id": "q-1",
            "question": "Capital of France?",
            "question_type": "FillBlank",
            "answer": "Paris",
            "explanation": "Paris is the capital of France."
        }"#;

        let question: Question = serde_json::from_str(json).expect("question should deserialize");
        assert!(question.options.is_empty());
        assert_eq!(question.question_type, QuestionType::FillBlank);
    }
}
