//! Medication and administration entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::{Administration, Medication};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the medications table.
#[derive(Debug, Clone, FromRow)]
pub struct MedicationEntity {
    pub id: Uuid,
    pub name: String,
    pub dosage: String,
    pub recipient_name: String,
    pub group_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database row mapping for the administrations table.
#[derive(Debug, Clone, FromRow)]
pub struct AdministrationEntity {
    pub id: Uuid,
    pub medication_id: Uuid,
    pub administered_by: String,
    pub administered_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<AdministrationEntity> for Administration {
    fn from(entity: AdministrationEntity) -> Self {
        Self {
            id: entity.id,
            administered_by: entity.administered_by,
            timestamp: entity.administered_at,
        }
    }
}

impl MedicationEntity {
    /// Assembles the aggregate from the row and its owned administration
    /// rows (already in insertion order).
    pub fn into_model(self, administrations: Vec<AdministrationEntity>) -> Medication {
        Medication {
            id: self.id,
            name: self.name,
            dosage: self.dosage,
            recipient_name: self.recipient_name,
            group_id: self.group_id,
            administrations: administrations.into_iter().map(Into::into).collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
