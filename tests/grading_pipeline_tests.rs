use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
    sync::Arc,
};

use async_trait::async_trait;
use tokio::sync::RwLock;

use quizsmith_server::{
    errors::{AppError, AppResult},
    models::domain::{Quiz, QuestionType, QuizType, SubmissionRecord},
    models::dto::{CombinedExamRequest, GenerateQuizRequest},
    provider::{ProviderError, ProviderErrorKind, TextProvider},
    repositories::{QuizRepository, SubmissionRepository},
    services::{DescriptiveGrader, QuizService, SubmissionService, TextExtractor},
};

struct InMemoryQuizRepository {
    quizzes: Arc<RwLock<HashMap<String, Quiz>>>,
}

impl InMemoryQuizRepository {
    fn new() -> Self {
        Self {
            quizzes: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        let mut quizzes = self.quizzes.write().await;
        quizzes.insert(quiz.id.clone(), quiz.clone());
        Ok(quiz)
    }

    async fn find_by_id_and_user(&self, id: &str, user_id: &str) -> AppResult<Option<Quiz>> {
        let quizzes = self.quizzes.read().await;
        Ok(quizzes
            .get(id)
            .filter(|quiz| quiz.user_id == user_id)
            .cloned())
    }

    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<Quiz>> {
        let quizzes = self.quizzes.read().await;
        let mut items: Vec<_> = quizzes
            .values()
            .filter(|quiz| quiz.user_id == user_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn delete_by_id_and_user(&self, id: &str, user_id: &str) -> AppResult<bool> {
        let mut quizzes = self.quizzes.write().await;
        let owned = quizzes
            .get(id)
            .map(|quiz| quiz.user_id == user_id)
            .unwrap_or(false);
        if owned {
            quizzes.remove(id);
        }
        Ok(owned)
    }
}

struct InMemorySubmissionRepository {
    records: Arc<RwLock<Vec<SubmissionRecord>>>,
}

impl InMemorySubmissionRepository {
    fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

#[async_trait]
impl SubmissionRepository for InMemorySubmissionRepository {
    async fn create(&self, record: SubmissionRecord) -> AppResult<SubmissionRecord> {
        let mut records = self.records.write().await;
        records.push(record.clone());
        Ok(record)
    }

    async fn list_by_user(
        &self,
        user_id: &str,
        quiz_id: Option<String>,
    ) -> AppResult<Vec<SubmissionRecord>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.user_id == user_id)
            .filter(|r| quiz_id.as_deref().map(|id| r.quiz_id == id).unwrap_or(true))
            .cloned()
            .collect())
    }
}

/// Answers each prompt with the first rule whose needle the prompt contains.
struct ScriptedProvider {
    rules: Vec<(&'static str, Result<String, ProviderError>)>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    fn new(rules: Vec<(&'static str, Result<String, ProviderError>)>) -> Self {
        Self {
            rules,
            calls: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextProvider for ScriptedProvider {
    async fn generate(&self, _user_id: &str, prompt: &str) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        for (needle, response) in &self.rules {
            if prompt.contains(needle) {
                return response.clone();
            }
        }
        panic!("no scripted response matches prompt: {}", prompt);
    }
}

struct NoUploadExtractor;

#[async_trait]
impl TextExtractor for NoUploadExtractor {
    async fn extract_text(&self, _path: &std::path::Path) -> AppResult<String> {
        Err(AppError::InternalError(
            "no extractor in this test".to_string(),
        ))
    }
}

fn mcq_payload() -> String {
    r#"```json
{"questions": [
  {"id": 1, "question": "What is the SI unit of current?",
   "options": ["A. Volt", "B. Ohm", "C. Ampere", "D. Watt"],
   "answer": "C. Ampere", "explanation": "Current is measured in amperes."},
  {"question": "Which law relates V, I and R?",
   "options": ["A. Ohm's law", "B. Lenz's law", "C. Hooke's law", "D. Boyle's law"],
   "answer": "A. Ohm's law", "explanation": "V = IR."}
]}
```"#
        .to_string()
}

fn descriptive_payload() -> String {
    r#"{"questions": [
  {"question": "Explain Ohm's law.", "answer": "V = IR at constant temperature.",
   "explanation": "Voltage is proportional to current."}
]}"#
    .to_string()
}

fn generate_request(quiz_type: QuizType, num_questions: u32) -> GenerateQuizRequest {
    GenerateQuizRequest {
        quiz_type,
        class_label: "10".to_string(),
        curriculum: "CBSE".to_string(),
        subject: "Physics".to_string(),
        chapters: vec!["Electricity".to_string()],
        num_questions,
    }
}

fn combined_request(num_mcq: u32, num_fib: u32, num_descriptive: u32) -> CombinedExamRequest {
    CombinedExamRequest {
        class_label: "10".to_string(),
        curriculum: "CBSE".to_string(),
        subject: "Physics".to_string(),
        chapters: vec!["Electricity".to_string()],
        num_mcq,
        num_fib,
        num_descriptive,
    }
}

#[actix_rt::test]
async fn generated_quiz_is_stored_and_served_redacted() {
    let provider = Arc::new(ScriptedProvider::new(vec![(
        "multiple-choice",
        Ok(mcq_payload()),
    )]));
    let repository = Arc::new(InMemoryQuizRepository::new());
    let service = QuizService::new(provider.clone(), repository.clone());

    let quiz = service
        .generate_quiz("user-a", generate_request(QuizType::MultipleChoice, 2))
        .await
        .expect("generation should succeed");

    assert_eq!(quiz.questions.len(), 2);
    let ids: std::collections::HashSet<_> = quiz.questions.iter().map(|q| &q.id).collect();
    assert_eq!(ids.len(), 2);

    let redacted = service
        .get_quiz_for_taking("user-a", &quiz.id)
        .await
        .expect("owner should see the quiz");
    let json = serde_json::to_value(&redacted).unwrap();
    for question in json["questions"].as_array().unwrap() {
        assert!(question.get("answer").is_none());
        assert!(question.get("explanation").is_none());
        assert!(question["options"].is_array());
    }

    assert_eq!(provider.call_count(), 1);
}

#[actix_rt::test]
async fn quizzes_of_other_users_read_as_not_found() {
    let provider = Arc::new(ScriptedProvider::new(vec![(
        "multiple-choice",
        Ok(mcq_payload()),
    )]));
    let repository = Arc::new(InMemoryQuizRepository::new());
    let service = QuizService::new(provider, repository);

    let quiz = service
        .generate_quiz("user-a", generate_request(QuizType::MultipleChoice, 2))
        .await
        .unwrap();

    let foreign = service.get_quiz_for_taking("user-b", &quiz.id).await;
    let missing = service.get_quiz_for_taking("user-b", "no-such-quiz").await;

    // Indistinguishable outcomes.
    match (foreign, missing) {
        (Err(AppError::NotFound(a)), Err(AppError::NotFound(b))) => assert_eq!(a, b),
        other => panic!("expected NotFound for both lookups, got {:?}", other),
    }

    let delete = service.delete_quiz("user-b", &quiz.id).await;
    assert!(matches!(delete, Err(AppError::NotFound(_))));
    assert!(service.get_quiz_for_taking("user-a", &quiz.id).await.is_ok());
}

#[actix_rt::test]
async fn caps_are_enforced_before_any_provider_call() {
    let provider = Arc::new(ScriptedProvider::new(vec![]));
    let repository = Arc::new(InMemoryQuizRepository::new());
    let service = QuizService::new(provider.clone(), repository);

    let over_cap = service
        .generate_quiz("user-a", generate_request(QuizType::MultipleChoice, 21))
        .await;
    assert!(matches!(over_cap, Err(AppError::ValidationError(_))));

    let zero = service
        .generate_quiz("user-a", generate_request(QuizType::FillBlank, 0))
        .await;
    assert!(matches!(zero, Err(AppError::ValidationError(_))));

    let combined_over = service
        .generate_combined_exam("user-a", combined_request(11, 10, 10))
        .await;
    assert!(matches!(combined_over, Err(AppError::ValidationError(_))));

    // Section counts summing past u32 must neither panic nor wrap under the
    // cap.
    let combined_wrapping = service
        .generate_combined_exam("user-a", combined_request(u32::MAX, 31, 0))
        .await;
    assert!(matches!(combined_wrapping, Err(AppError::ValidationError(_))));

    let combined_empty = service
        .generate_combined_exam("user-a", combined_request(0, 0, 0))
        .await;
    assert!(matches!(combined_empty, Err(AppError::ValidationError(_))));

    assert_eq!(provider.call_count(), 0);
}

#[actix_rt::test]
async fn combined_exam_survives_a_failing_section() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        ("multiple-choice", Ok(mcq_payload())),
        (
            "fill-in-the-blank",
            Err(ProviderError::new(
                ProviderErrorKind::RateLimited,
                "slow down",
            )),
        ),
        ("written answer", Ok(descriptive_payload())),
    ]));
    let repository = Arc::new(InMemoryQuizRepository::new());
    let service = QuizService::new(provider.clone(), repository);

    let quiz = service
        .generate_combined_exam("user-a", combined_request(2, 2, 1))
        .await
        .expect("two healthy sections should carry the exam");

    assert_eq!(quiz.quiz_type, QuizType::Combined);
    assert_eq!(quiz.questions.len(), 3);
    assert!(quiz
        .questions
        .iter()
        .all(|q| q.question_type != QuestionType::FillBlank));
    // Multiple choice first, descriptive last.
    assert_eq!(quiz.questions[0].question_type, QuestionType::MultipleChoice);
    assert_eq!(quiz.questions[2].question_type, QuestionType::Descriptive);
    assert_eq!(provider.call_count(), 3);
}

#[actix_rt::test]
async fn combined_exam_with_every_section_failing_reports_the_first_error() {
    let provider = Arc::new(ScriptedProvider::new(vec![(
        "questions",
        Err(ProviderError::new(
            ProviderErrorKind::Unreachable,
            "connection refused",
        )),
    )]));
    let repository = Arc::new(InMemoryQuizRepository::new());
    let service = QuizService::new(provider, repository);

    let result = service
        .generate_combined_exam("user-a", combined_request(2, 2, 0))
        .await;
    assert!(matches!(result, Err(AppError::Provider(_))));
}

#[actix_rt::test]
async fn submission_grades_objective_and_descriptive_questions() {
    // The grading prompt also mentions "written answer", so its rule has to
    // come first.
    let provider = Arc::new(ScriptedProvider::new(vec![
        (
            "grading a student",
            Ok(r#"{"score": 7, "feedback": "Mostly right.",
                   "correct_parts": "Stated the law.", "improvements": "Mention temperature."}"#
                .to_string()),
        ),
        ("multiple-choice", Ok(mcq_payload())),
        ("written answer", Ok(descriptive_payload())),
    ]));
    let quiz_repository = Arc::new(InMemoryQuizRepository::new());
    let submission_repository = Arc::new(InMemorySubmissionRepository::new());

    let quiz_service = QuizService::new(provider.clone(), quiz_repository.clone());
    let submission_service = SubmissionService::new(
        quiz_repository,
        submission_repository,
        DescriptiveGrader::new(provider),
        Arc::new(NoUploadExtractor),
    );

    let quiz = quiz_service
        .generate_combined_exam("user-a", combined_request(2, 0, 1))
        .await
        .unwrap();

    let mut answers = HashMap::new();
    answers.insert(quiz.questions[0].id.clone(), "C".to_string());
    answers.insert(quiz.questions[1].id.clone(), "B".to_string());
    answers.insert(
        quiz.questions[2].id.clone(),
        "Voltage is proportional to current.".to_string(),
    );

    let record = submission_service
        .submit("user-a", &quiz.id, &answers, None)
        .await
        .expect("submission should be graded");

    // 10 + 0 + 7 out of 30.
    assert_eq!(record.total_score, 17);
    assert_eq!(record.max_possible_score, 30);
    assert!((record.score_percent - 56.666).abs() < 0.01);
    assert_eq!(record.results[0].is_correct, Some(true));
    assert_eq!(record.results[1].is_correct, Some(false));
    assert_eq!(record.results[2].is_correct, None);

    let history = submission_service
        .list_submissions("user-a", Some(quiz.id.clone()))
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert!(submission_service
        .list_submissions("user-b", None)
        .await
        .unwrap()
        .is_empty());
}

#[actix_rt::test]
async fn broken_grader_output_never_fails_a_submission() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        (
            "grading a student",
            Ok("I refuse to answer in JSON today.".to_string()),
        ),
        ("written answer", Ok(descriptive_payload())),
    ]));
    let quiz_repository = Arc::new(InMemoryQuizRepository::new());
    let submission_repository = Arc::new(InMemorySubmissionRepository::new());

    let quiz_service = QuizService::new(provider.clone(), quiz_repository.clone());
    let submission_service = SubmissionService::new(
        quiz_repository,
        submission_repository,
        DescriptiveGrader::new(provider),
        Arc::new(NoUploadExtractor),
    );

    let quiz = quiz_service
        .generate_quiz("user-a", generate_request(QuizType::Descriptive, 1))
        .await
        .unwrap();

    let mut answers = HashMap::new();
    answers.insert(quiz.questions[0].id.clone(), "Some honest attempt.".to_string());

    let record = submission_service
        .submit("user-a", &quiz.id, &answers, None)
        .await
        .expect("grading trouble must not fail the submission");

    assert_eq!(record.total_score, 0);
    assert_eq!(record.results[0].score, 0);
    assert_eq!(record.results[0].correct_parts, "N/A");
    assert!(record.results[0].feedback.contains("Scored 0 by default"));
}
