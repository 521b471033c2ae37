use std::sync::Arc;

use crate::{
    auth::JwtService,
    config::{Config, ProviderMode},
    db::Database,
    errors::AppResult,
    provider::{CredentialResolver, HostedProvider, LocalProvider, TextProvider},
    repositories::{
        MongoProviderKeyRepository, MongoQuizRepository, MongoSubmissionRepository,
        MongoUserRepository,
    },
    services::{
        DescriptiveGrader, OcrSidecarExtractor, ProviderKeyService, QuizService,
        SubmissionService, UserService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub quiz_service: Arc<QuizService>,
    pub submission_service: Arc<SubmissionService>,
    pub provider_key_service: Arc<ProviderKeyService>,
    pub jwt_service: JwtService,
    pub db: Database,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let user_repository = Arc::new(MongoUserRepository::new(&db));
        user_repository.ensure_indexes().await?;
        let quiz_repository = Arc::new(MongoQuizRepository::new(&db));
        quiz_repository.ensure_indexes().await?;
        let submission_repository = Arc::new(MongoSubmissionRepository::new(&db));
        submission_repository.ensure_indexes().await?;
        let provider_key_repository = Arc::new(MongoProviderKeyRepository::new(&db));
        provider_key_repository.ensure_indexes().await?;

        let jwt_service = JwtService::new(&config.jwt_secret, config.jwt_expiration_hours);
        let user_service = Arc::new(UserService::new(
            user_repository,
            jwt_service.clone(),
        ));

        let provider_key_service = Arc::new(ProviderKeyService::new(
            &config.key_sealing_secret,
            provider_key_repository,
        ));

        let provider: Arc<dyn TextProvider> = match config.provider_mode {
            ProviderMode::Hosted => Arc::new(HostedProvider::new(
                config.provider_base_url.clone(),
                config.provider_model.clone(),
                config.provider_temperature,
                provider_key_service.clone() as Arc<dyn CredentialResolver>,
            )),
            ProviderMode::Local => Arc::new(LocalProvider::new(
                config.provider_base_url.clone(),
                config.provider_model.clone(),
                config.provider_temperature,
            )),
        };

        let quiz_service = Arc::new(QuizService::new(
            provider.clone(),
            quiz_repository.clone(),
        ));
        let submission_service = Arc::new(SubmissionService::new(
            quiz_repository,
            submission_repository,
            DescriptiveGrader::new(provider),
            Arc::new(OcrSidecarExtractor::new(config.ocr_base_url.clone())),
        ));

        Ok(Self {
            user_service,
            quiz_service,
            submission_service,
            provider_key_service,
            jwt_service,
            db,
            config: Arc::new(config),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }
}
