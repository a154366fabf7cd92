//! Appointment entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the appointments table.
#[derive(Debug, Clone, FromRow)]
pub struct AppointmentEntity {
    pub id: Uuid,
    pub title: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub group_id: Uuid,
    pub created_by: String,
    pub location: Option<String>,
    pub doctor_name: Option<String>,
    pub purpose: Option<String>,
    pub summary: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AppointmentEntity> for domain::models::Appointment {
    fn from(entity: AppointmentEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            start: entity.start_at,
            end: entity.end_at,
            group_id: entity.group_id,
            created_by: entity.created_by,
            location: entity.location,
            doctor_name: entity.doctor_name,
            purpose: entity.purpose,
            summary: entity.summary,
            completed: entity.completed,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
