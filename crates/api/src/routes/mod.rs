//! HTTP route handlers.

pub mod appointments;
pub mod auth;
pub mod groups;
pub mod health;
pub mod medications;
pub mod users;

use persistence::entities::UserEntity;
use persistence::repositories::UserRepository;

use crate::app::AppState;
use crate::error::ApiError;

/// Load the authenticated caller's user record.
///
/// A valid token whose user row no longer exists (deleted account) is
/// treated as unauthenticated.
pub(crate) async fn resolve_caller(
    state: &AppState,
    user_id: uuid::Uuid,
) -> Result<UserEntity, ApiError> {
    UserRepository::new(state.pool.clone())
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Token is not valid".to_string()))
}
