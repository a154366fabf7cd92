//! User account routes: current-user lookup and account deletion.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::group::GroupResponse;
use domain::models::user::UserResponse;
use persistence::repositories::{GroupRepository, UserRepository};
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::routes::resolve_caller;

/// Get the authenticated user, with their group populated when present.
///
/// GET /api/users/me
pub async fn get_me(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<Json<UserResponse>, ApiError> {
    let user = resolve_caller(&state, user_auth.user_id).await?;

    let group = match user.group_id {
        Some(group_id) => GroupRepository::new(state.pool.clone())
            .find_by_id(group_id)
            .await?
            .map(|g| GroupResponse::from(domain::models::Group::from(g))),
        None => None,
    };

    Ok(Json(UserResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        group,
        created_at: user.created_at,
    }))
}

/// Delete the authenticated user's account.
///
/// DELETE /api/users/me
///
/// When the user belongs to a group, all medications and appointments of
/// that group are deleted as well. The group itself and its other members
/// are left in place.
pub async fn delete_account(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<StatusCode, ApiError> {
    let repo = UserRepository::new(state.pool.clone());

    let user = repo
        .find_by_id(user_auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let rows_affected = repo.delete_account(user.id, user.group_id).await?;
    if rows_affected == 0 {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    info!(
        user_id = %user.id,
        group_id = ?user.group_id,
        "User account deleted with group data"
    );

    Ok(StatusCode::NO_CONTENT)
}
