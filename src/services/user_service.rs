use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::auth::JwtService;
use crate::errors::{AppError, AppResult};
use crate::models::domain::User;
use crate::models::dto::{AuthResponse, LoginRequest, RegisterRequest};
use crate::repositories::UserRepository;

pub struct UserService {
    repository: Arc<dyn UserRepository>,
    jwt: JwtService,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>, jwt: JwtService) -> Self {
        Self { repository, jwt }
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthResponse> {
        if self
            .repository
            .find_by_username(&request.username)
            .await?
            .is_some()
        {
            return Err(AppError::ValidationError(
                "Username is already taken".to_string(),
            ));
        }

        let password_hash = hash_password(&request.password)?;
        let user = self
            .repository
            .create(User::new(&request.username, &password_hash))
            .await?;
        log::info!("registered user {}", user.username);

        let token = self.jwt.create_token(&user)?;
        Ok(AuthResponse {
            token,
            username: user.username,
        })
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        // Same error for unknown user and bad password.
        let user = self
            .repository
            .find_by_username(&request.username)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid username or password".to_string()))?;

        verify_password(&request.password, &user.password_hash)?;

        let token = self.jwt.create_token(&user)?;
        Ok(AuthResponse {
            token,
            username: user.username,
        })
    }
}

fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::InternalError(format!("Failed to hash password: {}", e)))
}

fn verify_password(password: &str, stored_hash: &str) -> AppResult<()> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| AppError::InternalError(format!("Stored password hash is invalid: {}", e)))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AppError::Unauthorized("Invalid username or password".to_string()))
}
