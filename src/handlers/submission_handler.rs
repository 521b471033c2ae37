use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use actix_multipart::Multipart;
use actix_web::{get, post, web, HttpResponse};
use futures::TryStreamExt;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::{AppError, AppResult},
    models::dto::{SubmissionHistoryQuery, SubmissionResponse},
};

const ANSWER_FIELD_PREFIX: &str = "answer_";
const UPLOAD_FIELD: &str = "pdfFile";

#[post("/submit-quiz/{quiz_id}")]
pub async fn submit_quiz(
    state: web::Data<Arc<AppState>>,
    quiz_id: web::Path<String>,
    payload: Multipart,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let (answers, upload) = read_submission(payload, &state.config.upload_dir).await?;

    let record = state
        .submission_service
        .submit(&auth.0.sub, &quiz_id, &answers, upload)
        .await?;
    Ok(HttpResponse::Ok().json(SubmissionResponse::from(record)))
}

#[get("/submissions")]
pub async fn list_submissions(
    state: web::Data<Arc<AppState>>,
    query: web::Query<SubmissionHistoryQuery>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let records = state
        .submission_service
        .list_submissions(&auth.0.sub, query.into_inner().quiz_id)
        .await?;
    Ok(HttpResponse::Ok().json(records))
}

/// Drains the multipart form into answer fields and at most one uploaded
/// document. The document is spooled to the upload directory under a fresh
/// name; on any later error the spooled file is removed before returning.
async fn read_submission(
    mut payload: Multipart,
    upload_dir: &str,
) -> AppResult<(HashMap<String, String>, Option<PathBuf>)> {
    let mut answers = HashMap::new();
    let mut upload: Option<PathBuf> = None;

    let outcome = async {
        while let Some(mut field) = payload
            .try_next()
            .await
            .map_err(|e| AppError::ValidationError(format!("Invalid multipart payload: {}", e)))?
        {
            let name = field.name().unwrap_or_default().to_string();

            if let Some(question_id) = name.strip_prefix(ANSWER_FIELD_PREFIX) {
                let mut data = Vec::new();
                while let Some(chunk) = field.try_next().await.map_err(|e| {
                    AppError::ValidationError(format!("Invalid multipart payload: {}", e))
                })? {
                    data.extend_from_slice(&chunk);
                }
                let value = String::from_utf8(data).map_err(|_| {
                    AppError::ValidationError(format!("Answer field {} is not UTF-8", name))
                })?;
                answers.insert(question_id.to_string(), value);
            } else if name == UPLOAD_FIELD && upload.is_none() {
                upload = Some(spool_upload(&mut field, upload_dir).await?);
            } else {
                log::debug!("ignoring unexpected multipart field {}", name);
            }
        }
        Ok(())
    }
    .await;

    match outcome {
        Ok(()) => Ok((answers, upload)),
        Err(err) => {
            if let Some(path) = upload {
                if let Err(remove_err) = tokio::fs::remove_file(&path).await {
                    log::warn!("could not remove upload {}: {}", path.display(), remove_err);
                }
            }
            Err(err)
        }
    }
}

async fn spool_upload(
    field: &mut actix_multipart::Field,
    upload_dir: &str,
) -> AppResult<PathBuf> {
    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| AppError::InternalError(format!("Could not prepare upload dir: {}", e)))?;

    let path = PathBuf::from(upload_dir).join(format!("{}.pdf", Uuid::new_v4()));
    let mut file = tokio::fs::File::create(&path)
        .await
        .map_err(|e| AppError::InternalError(format!("Could not store upload: {}", e)))?;

    let result = async {
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| AppError::ValidationError(format!("Invalid upload stream: {}", e)))?
        {
            file.write_all(&chunk)
                .await
                .map_err(|e| AppError::InternalError(format!("Could not store upload: {}", e)))?;
        }
        file.flush()
            .await
            .map_err(|e| AppError::InternalError(format!("Could not store upload: {}", e)))
    }
    .await;

    match result {
        Ok(()) => Ok(path),
        Err(err) => {
            if let Err(remove_err) = tokio::fs::remove_file(&path).await {
                log::warn!("could not remove upload {}: {}", path.display(), remove_err);
            }
            Err(err)
        }
    }
}
