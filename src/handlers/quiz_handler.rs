use std::sync::Arc;

use actix_web::{delete, get, post, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::domain::QuizType,
    models::dto::{
        CombinedExamRequest, DescriptiveQuizRequest, GenerateQuizRequest, GenerateQuizResponse,
        SuccessResponse,
    },
};

#[post("/generate-quiz")]
pub async fn generate_quiz(
    state: web::Data<Arc<AppState>>,
    request: web::Json<GenerateQuizRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let quiz = state.quiz_service.generate_quiz(&auth.0.sub, request).await?;
    Ok(HttpResponse::Created().json(GenerateQuizResponse {
        success: true,
        quiz_id: quiz.id,
    }))
}

#[post("/descriptive-quiz")]
pub async fn generate_descriptive_quiz(
    state: web::Data<Arc<AppState>>,
    request: web::Json<DescriptiveQuizRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let request = GenerateQuizRequest {
        quiz_type: QuizType::Descriptive,
        class_label: request.class_label,
        curriculum: request.curriculum,
        subject: request.subject,
        chapters: request.chapters,
        num_questions: request.num_questions,
    };

    let quiz = state.quiz_service.generate_quiz(&auth.0.sub, request).await?;
    Ok(HttpResponse::Created().json(GenerateQuizResponse {
        success: true,
        quiz_id: quiz.id,
    }))
}

#[post("/combined-exam")]
pub async fn generate_combined_exam(
    state: web::Data<Arc<AppState>>,
    request: web::Json<CombinedExamRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let quiz = state
        .quiz_service
        .generate_combined_exam(&auth.0.sub, request)
        .await?;
    Ok(HttpResponse::Created().json(GenerateQuizResponse {
        success: true,
        quiz_id: quiz.id,
    }))
}

#[get("/quizzes")]
pub async fn list_quizzes(
    state: web::Data<Arc<AppState>>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let quizzes = state.quiz_service.list_quizzes(&auth.0.sub).await?;
    Ok(HttpResponse::Ok().json(quizzes))
}

#[get("/quiz/{quiz_id}")]
pub async fn get_quiz(
    state: web::Data<Arc<AppState>>,
    quiz_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let quiz = state
        .quiz_service
        .get_quiz_for_taking(&auth.0.sub, &quiz_id)
        .await?;
    Ok(HttpResponse::Ok().json(quiz))
}

#[delete("/quiz/{quiz_id}")]
pub async fn delete_quiz(
    state: web::Data<Arc<AppState>>,
    quiz_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    state.quiz_service.delete_quiz(&auth.0.sub, &quiz_id).await?;
    Ok(HttpResponse::Ok().json(SuccessResponse { success: true }))
}
