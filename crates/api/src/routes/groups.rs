//! Group lifecycle routes: create, join, leave, and delete.
//!
//! Invariants enforced here:
//! - a user belongs to at most one group at a time;
//! - the member list is ordered and append-only, so the owner is always
//!   the first element;
//! - a group never outlives its last member, and no medication or
//!   appointment outlives its group.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::group::{
    default_group_name, generate_invite_code, GroupResponse, JoinGroupRequest,
};
use domain::models::Group;
use persistence::repositories::{GroupRepository, LeaveOutcome};
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::routes::resolve_caller;

/// Create a new group with the caller as sole member and owner.
///
/// POST /api/groups
pub async fn create_group(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<(StatusCode, Json<GroupResponse>), ApiError> {
    let user = resolve_caller(&state, user_auth.user_id).await?;

    if user.group_id.is_some() {
        return Err(ApiError::Conflict("User already in a group".to_string()));
    }

    let repo = GroupRepository::new(state.pool.clone());

    let invite_code = repo.generate_unique_invite_code(generate_invite_code).await?;
    let name = default_group_name(&user.username);

    let group = repo.create_group(&name, &invite_code, user.id).await?;

    info!(
        group_id = %group.id,
        user_id = %user.id,
        "Group created"
    );

    Ok((
        StatusCode::CREATED,
        Json(Group::from(group).into()),
    ))
}

/// Join an existing group using an invite code.
///
/// POST /api/groups/join
///
/// Codes are matched case-insensitively; the caller is appended to the
/// member list so existing membership order is preserved.
pub async fn join_group(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Json(request): Json<JoinGroupRequest>,
) -> Result<Json<GroupResponse>, ApiError> {
    request.validate()?;

    let user = resolve_caller(&state, user_auth.user_id).await?;

    if user.group_id.is_some() {
        return Err(ApiError::Conflict("User already in a group".to_string()));
    }

    let repo = GroupRepository::new(state.pool.clone());

    let group = repo
        .find_by_invite_code(&request.normalized_code())
        .await?
        .ok_or_else(|| ApiError::NotFound("Group not found".to_string()))?;

    let group = repo.join_group(group.id, user.id).await?;

    info!(
        group_id = %group.id,
        user_id = %user.id,
        member_count = group.member_ids.len(),
        "User joined group"
    );

    Ok(Json(Group::from(group).into()))
}

/// Leave the caller's group.
///
/// POST /api/groups/leave
///
/// Leaving as the last member disbands the group: its medications and
/// appointments are deleted with it.
pub async fn leave_group(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<StatusCode, ApiError> {
    let user = resolve_caller(&state, user_auth.user_id).await?;

    let group_id = user
        .group_id
        .ok_or_else(|| ApiError::Conflict("User is not in a group".to_string()))?;

    let repo = GroupRepository::new(state.pool.clone());
    let outcome = repo.leave_group(group_id, user.id).await?;

    match outcome {
        LeaveOutcome::Remaining(group) => {
            info!(
                group_id = %group_id,
                user_id = %user.id,
                member_count = group.member_ids.len(),
                "User left group"
            );
        }
        LeaveOutcome::Disbanded => {
            info!(
                group_id = %group_id,
                user_id = %user.id,
                "Last member left; group disbanded with its data"
            );
        }
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Delete the caller's group outright. Owner only.
///
/// DELETE /api/groups
///
/// Deletes all dependent medications and appointments, clears the group
/// reference on every member, and removes the group.
pub async fn delete_group(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<StatusCode, ApiError> {
    let user = resolve_caller(&state, user_auth.user_id).await?;

    let group_id = user
        .group_id
        .ok_or_else(|| ApiError::Conflict("User is not in a group".to_string()))?;

    let repo = GroupRepository::new(state.pool.clone());

    let group: Group = repo
        .find_by_id(group_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Group not found".to_string()))?
        .into();

    if !group.is_owner(user.id) {
        return Err(ApiError::Forbidden(
            "Only the group owner can delete the group".to_string(),
        ));
    }

    repo.delete_group(group_id).await?;

    info!(
        group_id = %group_id,
        user_id = %user.id,
        "Group deleted by owner"
    );

    Ok(StatusCode::NO_CONTENT)
}
