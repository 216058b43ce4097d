//! Authentication handlers.

use actix_web::{HttpResponse, web};
use std::sync::Arc;

use quill_core::domain::User;
use quill_core::ports::{BaseRepository, PasswordService, TokenService, UserRepository};
use quill_shared::ApiResponse;
use quill_shared::dto::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username.clone(),
        created_at: user.created_at,
    }
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    // Validate input, reporting every failing constraint at once
    let mut errors = Vec::new();
    if req.username.trim().is_empty() {
        errors.push("Username is required".to_string());
    }
    if req.password.len() < 6 {
        errors.push("Password must be at least 6 characters".to_string());
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    // Check if user already exists
    if state.users.find_by_username(&req.username).await?.is_some() {
        return Err(AppError::Conflict("Username already exists".to_string()));
    }

    // Hash password - the plaintext is never persisted
    let password_hash = password_service
        .hash(&req.password)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let user = User::new(req.username, password_hash);
    let saved = state.users.insert(user).await?;

    tracing::info!(user_id = %saved.id, "User registered");

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(
        user_response(&saved),
        "User registered successfully",
    )))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    // Unknown username and wrong password map to the same outcome, so the
    // response does not reveal which usernames exist.
    let user = state
        .users
        .find_by_username(&req.username)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let valid = password_service
        .verify(&req.password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if !valid {
        return Err(AppError::Unauthorized);
    }

    let token = token_service
        .generate_token(user.id, &user.username)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        AuthResponse {
            access_token: token,
            token_type: "Bearer".to_string(),
            expires_in: token_service.expiration_seconds() as u64,
        },
        "Login successful",
    )))
}
