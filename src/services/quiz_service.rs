use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use uuid::Uuid;

use crate::constants::prompts::build_generation_prompt;
use crate::errors::{AppError, AppResult};
use crate::models::domain::{Question, QuestionType, Quiz, QuizType};
use crate::models::dto::{
    CombinedExamRequest, GenerateQuizRequest, QuizSummary, RedactedQuiz,
};
use crate::parsing::{clean, parse_questions};
use crate::provider::TextProvider;
use crate::repositories::QuizRepository;

pub const MAX_SINGLE_TYPE_QUESTIONS: u32 = 20;
pub const MAX_COMBINED_QUESTIONS: u32 = 30;

pub struct QuizService {
    provider: Arc<dyn TextProvider>,
    repository: Arc<dyn QuizRepository>,
}

impl QuizService {
    pub fn new(provider: Arc<dyn TextProvider>, repository: Arc<dyn QuizRepository>) -> Self {
        Self {
            provider,
            repository,
        }
    }

    /// Generates and stores a single-type quiz. Caps are checked before any
    /// provider call is made.
    pub async fn generate_quiz(&self, user_id: &str, request: GenerateQuizRequest) -> AppResult<Quiz> {
        let question_type = request.quiz_type.question_type().ok_or_else(|| {
            AppError::ValidationError(
                "Combined quizzes are created through the combined-exam endpoint".to_string(),
            )
        })?;

        if request.num_questions == 0 || request.num_questions > MAX_SINGLE_TYPE_QUESTIONS {
            return Err(AppError::ValidationError(format!(
                "num_questions must be between 1 and {}",
                MAX_SINGLE_TYPE_QUESTIONS
            )));
        }

        let questions = self
            .generate_batch(
                user_id,
                question_type,
                &request.class_label,
                &request.curriculum,
                &request.subject,
                &request.chapters,
                request.num_questions,
            )
            .await?;

        let quiz = Quiz::new(
            user_id,
            request.quiz_type,
            &request.class_label,
            &request.curriculum,
            &request.subject,
            request.chapters,
            questions,
        );
        log::info!(
            "generated quiz {} ({} questions) for user {}",
            quiz.id,
            quiz.questions.len(),
            user_id
        );
        self.repository.create(quiz).await
    }

    /// Generates a combined exam from up to three per-type batches, requested
    /// concurrently. A failing batch is dropped with a warning; the exam is
    /// stored as long as at least one batch succeeds.
    pub async fn generate_combined_exam(
        &self,
        user_id: &str,
        request: CombinedExamRequest,
    ) -> AppResult<Quiz> {
        // Summed in u64: the three counts are client-controlled and must not
        // be able to wrap past the cap.
        let total = u64::from(request.num_mcq)
            + u64::from(request.num_fib)
            + u64::from(request.num_descriptive);
        if total == 0 {
            return Err(AppError::ValidationError(
                "A combined exam needs at least one question".to_string(),
            ));
        }
        if total > u64::from(MAX_COMBINED_QUESTIONS) {
            return Err(AppError::ValidationError(format!(
                "A combined exam may hold at most {} questions",
                MAX_COMBINED_QUESTIONS
            )));
        }

        let sections = [
            (QuestionType::MultipleChoice, request.num_mcq),
            (QuestionType::FillBlank, request.num_fib),
            (QuestionType::Descriptive, request.num_descriptive),
        ];

        let batches = sections
            .iter()
            .filter(|(_, count)| *count > 0)
            .map(|(question_type, count)| {
                self.generate_batch(
                    user_id,
                    *question_type,
                    &request.class_label,
                    &request.curriculum,
                    &request.subject,
                    &request.chapters,
                    *count,
                )
            });

        let mut questions = Vec::new();
        let mut first_error = None;
        for outcome in join_all(batches).await {
            match outcome {
                Ok(batch) => questions.extend(batch),
                Err(err) => {
                    log::warn!("combined exam section failed: {}", err);
                    first_error.get_or_insert(err);
                }
            }
        }

        if questions.is_empty() {
            return Err(first_error.unwrap_or_else(|| {
                AppError::InternalError("combined exam generation produced nothing".to_string())
            }));
        }

        dedupe_question_ids(&mut questions);

        let quiz = Quiz::new(
            user_id,
            QuizType::Combined,
            &request.class_label,
            &request.curriculum,
            &request.subject,
            request.chapters,
            questions,
        );
        log::info!(
            "generated combined exam {} ({} questions) for user {}",
            quiz.id,
            quiz.questions.len(),
            user_id
        );
        self.repository.create(quiz).await
    }

    /// Fetches a quiz for taking, with answers and explanations stripped. A
    /// quiz owned by someone else reads as not found.
    pub async fn get_quiz_for_taking(&self, user_id: &str, quiz_id: &str) -> AppResult<RedactedQuiz> {
        let quiz = self
            .repository
            .find_by_id_and_user(quiz_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;
        Ok(RedactedQuiz::from(quiz))
    }

    pub async fn list_quizzes(&self, user_id: &str) -> AppResult<Vec<QuizSummary>> {
        let quizzes = self.repository.list_by_user(user_id).await?;
        Ok(quizzes.into_iter().map(QuizSummary::from).collect())
    }

    pub async fn delete_quiz(&self, user_id: &str, quiz_id: &str) -> AppResult<()> {
        let deleted = self
            .repository
            .delete_by_id_and_user(quiz_id, user_id)
            .await?;
        if !deleted {
            return Err(AppError::NotFound("Quiz not found".to_string()));
        }
        log::info!("deleted quiz {} for user {}", quiz_id, user_id);
        Ok(())
    }

    async fn generate_batch(
        &self,
        user_id: &str,
        question_type: QuestionType,
        class_label: &str,
        curriculum: &str,
        subject: &str,
        chapters: &[String],
        count: u32,
    ) -> AppResult<Vec<Question>> {
        let prompt =
            build_generation_prompt(question_type, class_label, curriculum, subject, chapters, count);
        let raw = self.provider.generate(user_id, &prompt).await?;
        let cleaned = clean(&raw);
        parse_questions(&cleaned, question_type, count)
    }
}

/// Batches are parsed independently, so two sections can both carry a
/// model-supplied id like "1". Later duplicates get fresh ids.
fn dedupe_question_ids(questions: &mut [Question]) {
    let mut seen = HashSet::new();
    for question in questions.iter_mut() {
        if !seen.insert(question.id.clone()) {
            question.id = Uuid::new_v4().to_string();
            seen.insert(question.id.clone());
        }
    }
}
