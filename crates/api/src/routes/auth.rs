//! Authentication routes for user registration and login.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::user::{LoginRequest, LoginResponse, RegisterRequest};
use persistence::repositories::UserRepository;
use serde::Serialize;
use shared::password::{hash_password, verify_password};
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;

/// Response body for successful registration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
}

/// Register a new user.
///
/// POST /api/users/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    request.validate()?;

    let repo = UserRepository::new(state.pool.clone());
    let email = request.email.to_lowercase();

    if repo
        .exists_by_username_or_email(&request.username, &email)
        .await?
    {
        return Err(ApiError::Conflict(
            "User with that email or username already exists".to_string(),
        ));
    }

    let password_hash = hash_password(&request.password)
        .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))?;

    // A concurrent registration can still win the race; the unique
    // constraint surfaces as 23505, which maps to Conflict.
    let user = repo
        .create(&request.username, &email, &password_hash)
        .await?;

    info!(user_id = %user.id, username = %user.username, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
        }),
    ))
}

/// Log in a user and issue an access token.
///
/// POST /api/users/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    request.validate()?;

    let repo = UserRepository::new(state.pool.clone());

    // Same response whether the email or the password was wrong.
    let user = repo
        .find_by_email(&request.email.to_lowercase())
        .await?
        .ok_or_else(|| ApiError::Validation("Invalid credentials".to_string()))?;

    let matches = verify_password(&request.password, &user.password_hash)
        .map_err(|e| ApiError::Internal(format!("Password verification failed: {}", e)))?;

    if !matches {
        return Err(ApiError::Validation("Invalid credentials".to_string()));
    }

    let token = state
        .jwt
        .generate_token(user.id)
        .map_err(|e| ApiError::Internal(format!("Token generation failed: {}", e)))?;

    info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse { token }))
}
