//! Appointment domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A medical appointment shared by a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Owning group. Every appointment belongs to exactly one group.
    pub group_id: Uuid,
    /// Display identity of the member who created the appointment.
    pub created_by: String,
    pub location: Option<String>,
    pub doctor_name: Option<String>,
    pub purpose: Option<String>,
    pub summary: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create an appointment.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,

    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,

    #[validate(length(max = 200, message = "Location must be at most 200 characters"))]
    pub location: Option<String>,

    #[validate(length(max = 100, message = "Doctor name must be at most 100 characters"))]
    pub doctor_name: Option<String>,

    #[validate(length(max = 500, message = "Purpose must be at most 500 characters"))]
    pub purpose: Option<String>,

    #[validate(length(max = 2000, message = "Summary must be at most 2000 characters"))]
    pub summary: Option<String>,
}

/// Request for a partial appointment update.
///
/// Explicit fields replace the free-form body of the original API: unknown
/// keys are ignored and absent keys leave the stored value unchanged.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentRequest {
    #[validate(length(min = 1, max = 200, message = "Title cannot be empty"))]
    pub title: Option<String>,

    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,

    #[validate(length(max = 200, message = "Location must be at most 200 characters"))]
    pub location: Option<String>,

    #[validate(length(max = 100, message = "Doctor name must be at most 100 characters"))]
    pub doctor_name: Option<String>,

    #[validate(length(max = 500, message = "Purpose must be at most 500 characters"))]
    pub purpose: Option<String>,

    #[validate(length(max = 2000, message = "Summary must be at most 2000 characters"))]
    pub summary: Option<String>,

    pub completed: Option<bool>,
}
