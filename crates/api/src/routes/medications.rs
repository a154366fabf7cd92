//! Medication routes, including administration history.
//!
//! All reads and writes are scoped to the caller's group: a medication
//! belonging to another group answers 404, indistinguishable from a
//! missing one.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::medication::{
    CreateMedicationRequest, UpdateAdministrationRequest, UpdateMedicationRequest,
};
use domain::models::Medication;
use persistence::entities::MedicationEntity;
use persistence::repositories::MedicationRepository;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::routes::resolve_caller;

/// Fetch a medication and check it belongs to the caller's group.
async fn find_scoped_medication(
    repo: &MedicationRepository,
    id: Uuid,
    caller_group: Option<Uuid>,
) -> Result<MedicationEntity, ApiError> {
    let medication = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Medication not found".to_string()))?;

    if caller_group != Some(medication.group_id) {
        return Err(ApiError::NotFound("Medication not found".to_string()));
    }

    Ok(medication)
}

/// List the caller's group's medications, newest first.
///
/// GET /api/medications
///
/// A caller without a group gets an empty list, not an error.
pub async fn list_medications(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<Json<Vec<Medication>>, ApiError> {
    let user = resolve_caller(&state, user_auth.user_id).await?;

    let Some(group_id) = user.group_id else {
        return Ok(Json(Vec::new()));
    };

    let medications = MedicationRepository::new(state.pool.clone())
        .list_for_group(group_id)
        .await?;

    Ok(Json(medications))
}

/// Create a medication in the caller's group.
///
/// POST /api/medications
pub async fn create_medication(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Json(request): Json<CreateMedicationRequest>,
) -> Result<(StatusCode, Json<Medication>), ApiError> {
    request.validate()?;

    let user = resolve_caller(&state, user_auth.user_id).await?;

    let group_id = user
        .group_id
        .ok_or_else(|| ApiError::Conflict("User does not belong to a group".to_string()))?;

    let repo = MedicationRepository::new(state.pool.clone());
    let medication = repo
        .create(group_id, &request.name, &request.dosage, &request.recipient_name)
        .await?;

    info!(
        medication_id = %medication.id,
        group_id = %group_id,
        user_id = %user.id,
        "Medication created"
    );

    Ok((
        StatusCode::CREATED,
        Json(medication.into_model(Vec::new())),
    ))
}

/// Partial update of a medication's fields.
///
/// PUT /api/medications/:id
pub async fn update_medication(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateMedicationRequest>,
) -> Result<Json<Medication>, ApiError> {
    request.validate()?;

    let user = resolve_caller(&state, user_auth.user_id).await?;
    let repo = MedicationRepository::new(state.pool.clone());

    find_scoped_medication(&repo, id, user.group_id).await?;

    repo.update(
        id,
        request.name.as_deref(),
        request.dosage.as_deref(),
        request.recipient_name.as_deref(),
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Medication not found".to_string()))?;

    let medication = repo
        .fetch_aggregate(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Medication not found".to_string()))?;

    info!(medication_id = %id, user_id = %user.id, "Medication updated");

    Ok(Json(medication))
}

/// Delete a medication and its administration history.
///
/// DELETE /api/medications/:id
pub async fn delete_medication(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let user = resolve_caller(&state, user_auth.user_id).await?;
    let repo = MedicationRepository::new(state.pool.clone());

    find_scoped_medication(&repo, id, user.group_id).await?;

    let rows_affected = repo.delete(id).await?;
    if rows_affected == 0 {
        return Err(ApiError::NotFound("Medication not found".to_string()));
    }

    info!(medication_id = %id, user_id = %user.id, "Medication deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Record that a dose was administered by the caller.
///
/// POST /api/medications/:id/administer
///
/// The event is stamped with the caller's display identity and the current
/// time, and appended to the medication's history.
pub async fn record_administration(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<Medication>, ApiError> {
    let user = resolve_caller(&state, user_auth.user_id).await?;
    let repo = MedicationRepository::new(state.pool.clone());

    find_scoped_medication(&repo, id, user.group_id).await?;

    let caller = domain::models::User::from(user);
    repo.add_administration(id, caller.display_identity())
        .await?;

    let medication = repo
        .fetch_aggregate(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Medication not found".to_string()))?;

    info!(
        medication_id = %id,
        user_id = %caller.id,
        "Administration recorded"
    );

    Ok(Json(medication))
}

/// Update an administration event.
///
/// PUT /api/medications/:med_id/administrations/:admin_id
pub async fn update_administration(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path((med_id, admin_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateAdministrationRequest>,
) -> Result<Json<Medication>, ApiError> {
    request.validate()?;

    let user = resolve_caller(&state, user_auth.user_id).await?;
    let repo = MedicationRepository::new(state.pool.clone());

    find_scoped_medication(&repo, med_id, user.group_id).await?;

    let rows_affected = repo
        .update_administration(med_id, admin_id, &request.administered_by, request.timestamp)
        .await?;
    if rows_affected == 0 {
        return Err(ApiError::NotFound(
            "Administration event not found".to_string(),
        ));
    }

    let medication = repo
        .fetch_aggregate(med_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Medication not found".to_string()))?;

    info!(
        medication_id = %med_id,
        administration_id = %admin_id,
        user_id = %user.id,
        "Administration updated"
    );

    Ok(Json(medication))
}

/// Remove an administration event from a medication's history.
///
/// DELETE /api/medications/:med_id/administrations/:admin_id
pub async fn delete_administration(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path((med_id, admin_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Medication>, ApiError> {
    let user = resolve_caller(&state, user_auth.user_id).await?;
    let repo = MedicationRepository::new(state.pool.clone());

    find_scoped_medication(&repo, med_id, user.group_id).await?;

    let rows_affected = repo.delete_administration(med_id, admin_id).await?;
    if rows_affected == 0 {
        return Err(ApiError::NotFound(
            "Administration event not found".to_string(),
        ));
    }

    let medication = repo
        .fetch_aggregate(med_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Medication not found".to_string()))?;

    info!(
        medication_id = %med_id,
        administration_id = %admin_id,
        user_id = %user.id,
        "Administration removed"
    );

    Ok(Json(medication))
}
