//! Medication domain models, including administration history.
//!
//! Administrations form an owned, ordered collection on the medication
//! aggregate: each event has a stable generated id and is inserted, updated,
//! and removed only through the parent medication.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A record that a dose of a medication was given, by whom and when.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Administration {
    pub id: Uuid,
    pub administered_by: String,
    pub timestamp: DateTime<Utc>,
}

/// A medication shared by a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub id: Uuid,
    pub name: String,
    pub dosage: String,
    pub recipient_name: String,
    /// Owning group. Every medication belongs to exactly one group.
    pub group_id: Uuid,
    /// Administration events in insertion order.
    pub administrations: Vec<Administration>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a medication.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMedicationRequest {
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,

    #[validate(length(min = 1, max = 100, message = "Dosage is required"))]
    pub dosage: String,

    #[validate(length(min = 1, max = 100, message = "Recipient name is required"))]
    pub recipient_name: String,
}

/// Request for a partial medication update.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMedicationRequest {
    #[validate(length(min = 1, max = 200, message = "Name cannot be empty"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Dosage cannot be empty"))]
    pub dosage: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Recipient name cannot be empty"))]
    pub recipient_name: Option<String>,
}

/// Request to update an administration event.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAdministrationRequest {
    #[validate(length(min = 1, max = 100, message = "administeredBy is required"))]
    pub administered_by: String,

    /// Optional corrected administered-at time.
    pub timestamp: Option<DateTime<Utc>>,
}
