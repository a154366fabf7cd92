//! Appointment routes.
//!
//! Reads and writes are scoped to the caller's group, with the same 404
//! policy as medications for foreign records.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::appointment::{CreateAppointmentRequest, UpdateAppointmentRequest};
use domain::models::Appointment;
use persistence::entities::AppointmentEntity;
use persistence::repositories::appointment::{AppointmentChanges, NewAppointment};
use persistence::repositories::AppointmentRepository;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::routes::resolve_caller;

/// Fetch an appointment and check it belongs to the caller's group.
async fn find_scoped_appointment(
    repo: &AppointmentRepository,
    id: Uuid,
    caller_group: Option<Uuid>,
) -> Result<AppointmentEntity, ApiError> {
    let appointment = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Appointment not found".to_string()))?;

    if caller_group != Some(appointment.group_id) {
        return Err(ApiError::NotFound("Appointment not found".to_string()));
    }

    Ok(appointment)
}

/// List the caller's group's appointments ordered by start time.
///
/// GET /api/appointments
///
/// A caller without a group gets an empty list, not an error.
pub async fn list_appointments(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<Json<Vec<Appointment>>, ApiError> {
    let user = resolve_caller(&state, user_auth.user_id).await?;

    let Some(group_id) = user.group_id else {
        return Ok(Json(Vec::new()));
    };

    let appointments = AppointmentRepository::new(state.pool.clone())
        .list_for_group(group_id)
        .await?;

    Ok(Json(appointments.into_iter().map(Into::into).collect()))
}

/// Create an appointment in the caller's group.
///
/// POST /api/appointments
///
/// The record is stamped with the caller's display identity as creator.
pub async fn create_appointment(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), ApiError> {
    request.validate()?;

    let user = resolve_caller(&state, user_auth.user_id).await?;

    let group_id = user
        .group_id
        .ok_or_else(|| ApiError::Conflict("User does not belong to a group".to_string()))?;

    let caller = domain::models::User::from(user);
    let repo = AppointmentRepository::new(state.pool.clone());

    let appointment = repo
        .create(NewAppointment {
            title: &request.title,
            start_at: request.start,
            end_at: request.end,
            group_id,
            created_by: caller.display_identity(),
            location: request.location.as_deref(),
            doctor_name: request.doctor_name.as_deref(),
            purpose: request.purpose.as_deref(),
            summary: request.summary.as_deref(),
        })
        .await?;

    info!(
        appointment_id = %appointment.id,
        group_id = %group_id,
        user_id = %caller.id,
        "Appointment created"
    );

    Ok((StatusCode::CREATED, Json(appointment.into())))
}

/// Partial update of an appointment's fields.
///
/// PUT /api/appointments/:id
pub async fn update_appointment(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateAppointmentRequest>,
) -> Result<Json<Appointment>, ApiError> {
    request.validate()?;

    let user = resolve_caller(&state, user_auth.user_id).await?;
    let repo = AppointmentRepository::new(state.pool.clone());

    find_scoped_appointment(&repo, id, user.group_id).await?;

    let appointment = repo
        .update(
            id,
            AppointmentChanges {
                title: request.title.as_deref(),
                start_at: request.start,
                end_at: request.end,
                location: request.location.as_deref(),
                doctor_name: request.doctor_name.as_deref(),
                purpose: request.purpose.as_deref(),
                summary: request.summary.as_deref(),
                completed: request.completed,
            },
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Appointment not found".to_string()))?;

    info!(appointment_id = %id, user_id = %user.id, "Appointment updated");

    Ok(Json(appointment.into()))
}

/// Delete an appointment.
///
/// DELETE /api/appointments/:id
pub async fn delete_appointment(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let user = resolve_caller(&state, user_auth.user_id).await?;
    let repo = AppointmentRepository::new(state.pool.clone());

    find_scoped_appointment(&repo, id, user.group_id).await?;

    let rows_affected = repo.delete(id).await?;
    if rows_affected == 0 {
        return Err(ApiError::NotFound("Appointment not found".to_string()));
    }

    info!(appointment_id = %id, user_id = %user.id, "Appointment deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Mark an appointment as completed.
///
/// PATCH /api/appointments/:id/complete
pub async fn mark_complete(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<Appointment>, ApiError> {
    let user = resolve_caller(&state, user_auth.user_id).await?;
    let repo = AppointmentRepository::new(state.pool.clone());

    find_scoped_appointment(&repo, id, user.group_id).await?;

    let appointment = repo
        .mark_complete(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Appointment not found".to_string()))?;

    info!(appointment_id = %id, user_id = %user.id, "Appointment completed");

    Ok(Json(appointment.into()))
}
