use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::errors::{AppError, AppResult};
use crate::models::domain::{
    EvaluationOutcome, EvaluationResult, Question, QuestionType, SubmissionRecord,
};
use crate::repositories::{QuizRepository, SubmissionRepository};
use crate::services::evaluation_service::{
    matches_fill_blank, matches_multiple_choice, DescriptiveGrader,
};
use crate::services::text_extraction::TextExtractor;

const POINTS_PER_QUESTION: i32 = 10;

pub struct SubmissionService {
    quiz_repository: Arc<dyn QuizRepository>,
    submission_repository: Arc<dyn SubmissionRepository>,
    grader: DescriptiveGrader,
    extractor: Arc<dyn TextExtractor>,
}

impl SubmissionService {
    pub fn new(
        quiz_repository: Arc<dyn QuizRepository>,
        submission_repository: Arc<dyn SubmissionRepository>,
        grader: DescriptiveGrader,
        extractor: Arc<dyn TextExtractor>,
    ) -> Self {
        Self {
            quiz_repository,
            submission_repository,
            grader,
            extractor,
        }
    }

    /// Grades one submission attempt and stores the record. Questions are
    /// graded in the quiz's stored order; unanswered questions score zero.
    /// An uploaded document only enriches descriptive grading, so extraction
    /// trouble degrades to an empty reference instead of failing the attempt.
    pub async fn submit(
        &self,
        user_id: &str,
        quiz_id: &str,
        answers: &HashMap<String, String>,
        upload: Option<PathBuf>,
    ) -> AppResult<SubmissionRecord> {
        let lookup = self
            .quiz_repository
            .find_by_id_and_user(quiz_id, user_id)
            .await
            .and_then(|quiz| quiz.ok_or_else(|| AppError::NotFound("Quiz not found".to_string())));

        let quiz = match lookup {
            Ok(quiz) => quiz,
            Err(err) => {
                // The upload must not outlive the request even when grading
                // never starts.
                if let Some(path) = &upload {
                    if let Err(remove_err) = tokio::fs::remove_file(path).await {
                        log::warn!("could not remove upload {}: {}", path.display(), remove_err);
                    }
                }
                return Err(err);
            }
        };

        let reference_text = match upload {
            Some(path) => self.extract_and_discard(&path).await,
            None => String::new(),
        };

        let mut results = Vec::with_capacity(quiz.questions.len());
        for question in &quiz.questions {
            let user_answer = answers
                .get(&question.id)
                .map(String::as_str)
                .unwrap_or_default();
            results.push(
                self.grade_question(user_id, question, user_answer, &reference_text)
                    .await,
            );
        }

        let total_score: i32 = results.iter().map(|r| r.score).sum();
        let max_possible_score = POINTS_PER_QUESTION * results.len() as i32;
        let score_percent = if max_possible_score > 0 {
            100.0 * f64::from(total_score) / f64::from(max_possible_score)
        } else {
            0.0
        };

        let record = SubmissionRecord::new(
            user_id,
            quiz_id,
            score_percent,
            total_score,
            max_possible_score,
            results,
        );
        log::info!(
            "submission {} for quiz {} scored {}/{}",
            record.id,
            quiz_id,
            total_score,
            max_possible_score
        );
        self.submission_repository.create(record).await
    }

    pub async fn list_submissions(
        &self,
        user_id: &str,
        quiz_id: Option<String>,
    ) -> AppResult<Vec<SubmissionRecord>> {
        self.submission_repository
            .list_by_user(user_id, quiz_id)
            .await
    }

    /// Extracts reference text from the upload, then removes the temporary
    /// file on every path, success or not, before any grading starts.
    async fn extract_and_discard(&self, path: &Path) -> String {
        let extracted = match self.extractor.extract_text(path).await {
            Ok(text) => text,
            Err(err) => {
                log::warn!("upload text extraction failed, grading without it: {}", err);
                String::new()
            }
        };

        if let Err(err) = tokio::fs::remove_file(path).await {
            log::warn!("could not remove upload {}: {}", path.display(), err);
        }

        extracted
    }

    async fn grade_question(
        &self,
        user_id: &str,
        question: &Question,
        user_answer: &str,
        reference_text: &str,
    ) -> EvaluationResult {
        match question.question_type {
            QuestionType::MultipleChoice => {
                objective_result(question, user_answer, matches_multiple_choice(question, user_answer))
            }
            QuestionType::FillBlank => {
                objective_result(question, user_answer, matches_fill_blank(question, user_answer))
            }
            QuestionType::Descriptive => {
                if user_answer.trim().is_empty() {
                    return EvaluationResult {
                        question: question.question.clone(),
                        question_type: question.question_type,
                        correct_answer: question.answer.clone(),
                        explanation: question.explanation.clone(),
                        user_answer: user_answer.to_string(),
                        extracted_text: reference_text.to_string(),
                        score: 0,
                        feedback: "No answer was provided.".to_string(),
                        correct_parts: "N/A".to_string(),
                        improvements: "N/A".to_string(),
                        is_correct: None,
                        outcome: EvaluationOutcome::Valid,
                    };
                }

                let graded = self
                    .grader
                    .evaluate(user_id, question, user_answer, reference_text)
                    .await;

                EvaluationResult {
                    question: question.question.clone(),
                    question_type: question.question_type,
                    correct_answer: question.answer.clone(),
                    explanation: question.explanation.clone(),
                    user_answer: user_answer.to_string(),
                    extracted_text: reference_text.to_string(),
                    score: graded.score,
                    feedback: graded.feedback,
                    correct_parts: graded.correct_parts,
                    improvements: graded.improvements,
                    is_correct: None,
                    outcome: graded.outcome,
                }
            }
        }
    }
}

fn objective_result(question: &Question, user_answer: &str, is_correct: bool) -> EvaluationResult {
    EvaluationResult {
        question: question.question.clone(),
        question_type: question.question_type,
        correct_answer: question.answer.clone(),
        explanation: question.explanation.clone(),
        user_answer: user_answer.to_string(),
        extracted_text: String::new(),
        score: if is_correct { POINTS_PER_QUESTION } else { 0 },
        feedback: if is_correct {
            "Correct.".to_string()
        } else {
            "Incorrect.".to_string()
        },
        correct_parts: "N/A".to_string(),
        improvements: "N/A".to_string(),
        is_correct: Some(is_correct),
        outcome: EvaluationOutcome::Valid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::Quiz;
    use crate::provider::{MockTextProvider, TextProvider};
    use crate::repositories::quiz_repository::MockQuizRepository;
    use crate::repositories::submission_repository::MockSubmissionRepository;
    use crate::services::text_extraction::MockTextExtractor;
    use crate::test_utils::fixtures::{
        descriptive_question, fill_blank_question, mcq_question, quiz_for,
    };
    use mockall::predicate::eq;

    fn sample_quiz() -> Quiz {
        quiz_for(
            "user-1",
            vec![
                mcq_question("q-1", "C. Ampere"),
                fill_blank_question("q-2", "ohm"),
                descriptive_question("q-3"),
            ],
        )
    }

    fn service_with(
        quiz: Option<Quiz>,
        provider: MockTextProvider,
    ) -> SubmissionService {
        let mut quiz_repository = MockQuizRepository::new();
        quiz_repository
            .expect_find_by_id_and_user()
            .returning(move |_, _| Ok(quiz.clone()));

        let mut submission_repository = MockSubmissionRepository::new();
        submission_repository
            .expect_create()
            .returning(|record| Ok(record));

        let provider: Arc<dyn TextProvider> = Arc::new(provider);
        SubmissionService::new(
            Arc::new(quiz_repository),
            Arc::new(submission_repository),
            DescriptiveGrader::new(provider),
            Arc::new(MockTextExtractor::new()),
        )
    }

    #[actix_rt::test]
    async fn submission_for_missing_quiz_is_not_found() {
        let service = service_with(None, MockTextProvider::new());
        let result = service
            .submit("user-1", "quiz-x", &HashMap::new(), None)
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[actix_rt::test]
    async fn mixed_quiz_is_scored_question_by_question() {
        let mut provider = MockTextProvider::new();
        provider.expect_generate().times(1).returning(|_, _| {
            Ok(r#"{"score": 7, "feedback": "Decent.", "correct_parts": "Formula.",
                   "improvements": "Units."}"#
                .to_string())
        });
        let service = service_with(Some(sample_quiz()), provider);

        let answers = HashMap::from([
            ("q-1".to_string(), "c".to_string()),
            ("q-2".to_string(), "farad".to_string()),
            ("q-3".to_string(), "Voltage equals current times resistance.".to_string()),
        ]);

        let record = service
            .submit("user-1", "quiz-1", &answers, None)
            .await
            .unwrap();

        assert_eq!(record.total_score, 17);
        assert_eq!(record.max_possible_score, 30);
        assert!((record.score_percent - 56.666).abs() < 0.01);
        assert_eq!(record.results[0].is_correct, Some(true));
        assert_eq!(record.results[1].is_correct, Some(false));
        assert_eq!(record.results[2].is_correct, None);
        assert_eq!(record.results[2].score, 7);
    }

    #[actix_rt::test]
    async fn empty_descriptive_answer_skips_the_grader() {
        // No expect_generate: any provider call would panic the mock.
        let mut quiz = sample_quiz();
        quiz.questions.retain(|q| q.question_type == QuestionType::Descriptive);
        let service = service_with(Some(quiz), MockTextProvider::new());

        let record = service
            .submit("user-1", "quiz-1", &HashMap::new(), None)
            .await
            .unwrap();

        assert_eq!(record.total_score, 0);
        assert_eq!(record.results[0].feedback, "No answer was provided.");
        assert_eq!(record.results[0].outcome, EvaluationOutcome::Valid);
    }

    #[actix_rt::test]
    async fn submission_history_query_passes_user_and_quiz_filter() {
        let mut submission_repository = MockSubmissionRepository::new();
        submission_repository
            .expect_list_by_user()
            .with(eq("user-1"), eq(Some("quiz-9".to_string())))
            .times(1)
            .returning(|_, _| Ok(vec![]));

        let provider: Arc<dyn TextProvider> = Arc::new(MockTextProvider::new());
        let service = SubmissionService::new(
            Arc::new(MockQuizRepository::new()),
            Arc::new(submission_repository),
            DescriptiveGrader::new(provider),
            Arc::new(MockTextExtractor::new()),
        );

        let records = service
            .list_submissions("user-1", Some("quiz-9".to_string()))
            .await
            .unwrap();
        assert!(records.is_empty());
    }

    #[actix_rt::test]
    async fn unanswered_objective_questions_score_zero() {
        let mut quiz = sample_quiz();
        quiz.questions.retain(|q| q.question_type != QuestionType::Descriptive);
        let service = service_with(Some(quiz), MockTextProvider::new());

        let record = service
            .submit("user-1", "quiz-1", &HashMap::new(), None)
            .await
            .unwrap();

        assert_eq!(record.total_score, 0);
        assert_eq!(record.max_possible_score, 20);
        assert_eq!(record.score_percent, 0.0);
    }
}
