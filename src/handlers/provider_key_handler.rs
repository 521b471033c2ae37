use std::sync::Arc;

use actix_web::{put, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::{ProviderKeyRequest, SuccessResponse},
};

#[put("/provider-key")]
pub async fn put_provider_key(
    state: web::Data<Arc<AppState>>,
    request: web::Json<ProviderKeyRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    state
        .provider_key_service
        .store(&auth.0.sub, &request.api_key)
        .await?;
    Ok(HttpResponse::Ok().json(SuccessResponse { success: true }))
}
