use serde::Deserialize;
use validator::Validate;

use crate::models::domain::QuizType;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: String,

    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Body of `POST /api/generate-quiz`. `class` is the grade/class label
/// ("10", "Grade 8", ...), kept as an opaque string.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenerateQuizRequest {
    pub quiz_type: QuizType,

    #[serde(rename = "class")]
    #[validate(length(min = 1, max = 50))]
    pub class_label: String,

    #[validate(length(min = 1, max = 100))]
    pub curriculum: String,

    #[validate(length(min = 1, max = 100))]
    pub subject: String,

    #[validate(length(min = 1, max = 20))]
    pub chapters: Vec<String>,

    pub num_questions: u32,
}

/// Body of `POST /api/descriptive-quiz`; the quiz type is fixed server-side.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DescriptiveQuizRequest {
    #[serde(rename = "class")]
    #[validate(length(min = 1, max = 50))]
    pub class_label: String,

    #[validate(length(min = 1, max = 100))]
    pub curriculum: String,

    #[validate(length(min = 1, max = 100))]
    pub subject: String,

    #[validate(length(min = 1, max = 20))]
    pub chapters: Vec<String>,

    pub num_questions: u32,
}

/// Body of `POST /api/combined-exam`. Individual counts may be zero; the
/// service enforces total > 0 and the combined cap.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CombinedExamRequest {
    #[serde(rename = "class")]
    #[validate(length(min = 1, max = 50))]
    pub class_label: String,

    #[validate(length(min = 1, max = 100))]
    pub curriculum: String,

    #[validate(length(min = 1, max = 100))]
    pub subject: String,

    #[validate(length(min = 1, max = 20))]
    pub chapters: Vec<String>,

    #[serde(default)]
    #[validate(range(max = 30))]
    pub num_mcq: u32,

    #[serde(default)]
    #[validate(range(max = 30))]
    pub num_fib: u32,

    #[serde(default)]
    #[validate(range(max = 30))]
    pub num_descriptive: u32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProviderKeyRequest {
    #[validate(length(min = 8, max = 512))]
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionHistoryQuery {
    pub quiz_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_quiz_request_deserializes_wire_body() {
        let body = r#"{
            "quiz_type": "MultipleChoice",
            "class": "10",
            "curriculum": "CBSE",
            "subject": "Physics",
            "chapters": ["Electricity", "Magnetism"],
            "num_questions": 5
        }"#;

        let request: GenerateQuizRequest =
            serde_json::from_str(body).expect("request should deserialize");
        assert_eq!(request.class_label, "10");
        assert_eq!(request.chapters.len(), 2);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn generate_quiz_request_rejects_empty_subject() {
        let request = GenerateQuizRequest {
            quiz_type: QuizType::FillBlank,
            class_label: "10".to_string(),
            curriculum: "CBSE".to_string(),
            subject: String::new(),
            chapters: vec!["Algebra".to_string()],
            num_questions: 5,
        };

        assert!(request.validate().is_err());
    }

    #[test]
    fn combined_exam_counts_default_to_zero() {
        let body = r#"{
            "class": "10",
            "curriculum": "CBSE",
            "subject": "Physics",
            "chapters": ["Light"],
            "num_mcq": 4
        }"#;

        let request: CombinedExamRequest =
            serde_json::from_str(body).expect("request should deserialize");
        assert_eq!(request.num_mcq, 4);
        assert_eq!(request.num_fib, 0);
        assert_eq!(request.num_descriptive, 0);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn combined_exam_rejects_absurd_section_counts() {
        let request = CombinedExamRequest {
            class_label: "10".to_string(),
            curriculum: "CBSE".to_string(),
            subject: "Physics".to_string(),
            chapters: vec!["Light".to_string()],
            num_mcq: u32::MAX,
            num_fib: 31,
            num_descriptive: 0,
        };

        assert!(request.validate().is_err());
    }
}
