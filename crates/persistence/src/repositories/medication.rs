//! Medication repository for database operations.
//!
//! Administrations are an owned collection on the medication aggregate:
//! rows in the administrations table addressed by generated id, mutated
//! only through this repository and returned with the parent.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use domain::models::Medication;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{AdministrationEntity, MedicationEntity};

/// Repository for medication-related database operations.
#[derive(Clone)]
pub struct MedicationRepository {
    pool: PgPool,
}

impl MedicationRepository {
    /// Creates a new MedicationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List a group's medications, newest first, administrations included.
    pub async fn list_for_group(&self, group_id: Uuid) -> Result<Vec<Medication>, sqlx::Error> {
        let medications = sqlx::query_as::<_, MedicationEntity>(
            r#"
            SELECT id, name, dosage, recipient_name, group_id, created_at, updated_at
            FROM medications
            WHERE group_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<Uuid> = medications.iter().map(|m| m.id).collect();
        let administrations = sqlx::query_as::<_, AdministrationEntity>(
            r#"
            SELECT id, medication_id, administered_by, administered_at, created_at
            FROM administrations
            WHERE medication_id = ANY($1)
            ORDER BY created_at ASC
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_medication: HashMap<Uuid, Vec<AdministrationEntity>> = HashMap::new();
        for administration in administrations {
            by_medication
                .entry(administration.medication_id)
                .or_default()
                .push(administration);
        }

        Ok(medications
            .into_iter()
            .map(|m| {
                let events = by_medication.remove(&m.id).unwrap_or_default();
                m.into_model(events)
            })
            .collect())
    }

    /// Find a medication row by ID, without its administrations.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<MedicationEntity>, sqlx::Error> {
        sqlx::query_as::<_, MedicationEntity>(
            r#"
            SELECT id, name, dosage, recipient_name, group_id, created_at, updated_at
            FROM medications
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Fetch the full aggregate: the medication with its administrations in
    /// insertion order.
    pub async fn fetch_aggregate(&self, id: Uuid) -> Result<Option<Medication>, sqlx::Error> {
        let Some(medication) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let administrations = sqlx::query_as::<_, AdministrationEntity>(
            r#"
            SELECT id, medication_id, administered_by, administered_at, created_at
            FROM administrations
            WHERE medication_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(medication.into_model(administrations)))
    }

    /// Create a medication stamped with its owning group.
    pub async fn create(
        &self,
        group_id: Uuid,
        name: &str,
        dosage: &str,
        recipient_name: &str,
    ) -> Result<MedicationEntity, sqlx::Error> {
        sqlx::query_as::<_, MedicationEntity>(
            r#"
            INSERT INTO medications (name, dosage, recipient_name, group_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, dosage, recipient_name, group_id, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(dosage)
        .bind(recipient_name)
        .bind(group_id)
        .fetch_one(&self.pool)
        .await
    }

    /// Partial update of the medication's own fields.
    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        dosage: Option<&str>,
        recipient_name: Option<&str>,
    ) -> Result<Option<MedicationEntity>, sqlx::Error> {
        sqlx::query_as::<_, MedicationEntity>(
            r#"
            UPDATE medications
            SET
                name = COALESCE($2, name),
                dosage = COALESCE($3, dosage),
                recipient_name = COALESCE($4, recipient_name),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, dosage, recipient_name, group_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(dosage)
        .bind(recipient_name)
        .fetch_optional(&self.pool)
        .await
    }

    /// Delete a medication. Its administrations cascade.
    pub async fn delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM medications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Append an administration event to a medication, stamped with the
    /// current time.
    pub async fn add_administration(
        &self,
        medication_id: Uuid,
        administered_by: &str,
    ) -> Result<AdministrationEntity, sqlx::Error> {
        sqlx::query_as::<_, AdministrationEntity>(
            r#"
            INSERT INTO administrations (medication_id, administered_by)
            VALUES ($1, $2)
            RETURNING id, medication_id, administered_by, administered_at, created_at
            "#,
        )
        .bind(medication_id)
        .bind(administered_by)
        .fetch_one(&self.pool)
        .await
    }

    /// Update an administration event by id within its parent medication.
    /// Returns the number of rows updated (0 when the event does not exist
    /// under that medication).
    pub async fn update_administration(
        &self,
        medication_id: Uuid,
        administration_id: Uuid,
        administered_by: &str,
        administered_at: Option<DateTime<Utc>>,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE administrations
            SET
                administered_by = $3,
                administered_at = COALESCE($4, administered_at)
            WHERE id = $2 AND medication_id = $1
            "#,
        )
        .bind(medication_id)
        .bind(administration_id)
        .bind(administered_by)
        .bind(administered_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Remove an administration event by id from its parent medication.
    /// Returns the number of rows deleted.
    pub async fn delete_administration(
        &self,
        medication_id: Uuid,
        administration_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM administrations WHERE id = $2 AND medication_id = $1")
                .bind(medication_id)
                .bind(administration_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    // MedicationRepository requires a database connection; behavior is
    // covered by the medications integration tests.
}
