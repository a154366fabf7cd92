//! Appointment repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::AppointmentEntity;

/// Fields for creating an appointment.
#[derive(Debug, Clone)]
pub struct NewAppointment<'a> {
    pub title: &'a str,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub group_id: Uuid,
    pub created_by: &'a str,
    pub location: Option<&'a str>,
    pub doctor_name: Option<&'a str>,
    pub purpose: Option<&'a str>,
    pub summary: Option<&'a str>,
}

/// Fields for a partial appointment update. `None` leaves the stored value
/// unchanged.
#[derive(Debug, Clone, Default)]
pub struct AppointmentChanges<'a> {
    pub title: Option<&'a str>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub location: Option<&'a str>,
    pub doctor_name: Option<&'a str>,
    pub purpose: Option<&'a str>,
    pub summary: Option<&'a str>,
    pub completed: Option<bool>,
}

/// Repository for appointment-related database operations.
#[derive(Clone)]
pub struct AppointmentRepository {
    pool: PgPool,
}

impl AppointmentRepository {
    /// Creates a new AppointmentRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List a group's appointments ordered by start time ascending.
    pub async fn list_for_group(
        &self,
        group_id: Uuid,
    ) -> Result<Vec<AppointmentEntity>, sqlx::Error> {
        sqlx::query_as::<_, AppointmentEntity>(
            r#"
            SELECT id, title, start_at, end_at, group_id, created_by, location,
                   doctor_name, purpose, summary, completed, created_at, updated_at
            FROM appointments
            WHERE group_id = $1
            ORDER BY start_at ASC
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Find an appointment by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<AppointmentEntity>, sqlx::Error> {
        sqlx::query_as::<_, AppointmentEntity>(
            r#"
            SELECT id, title, start_at, end_at, group_id, created_by, location,
                   doctor_name, purpose, summary, completed, created_at, updated_at
            FROM appointments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Create an appointment stamped with its owning group and creator.
    pub async fn create(
        &self,
        appointment: NewAppointment<'_>,
    ) -> Result<AppointmentEntity, sqlx::Error> {
        sqlx::query_as::<_, AppointmentEntity>(
            r#"
            INSERT INTO appointments
                (title, start_at, end_at, group_id, created_by, location, doctor_name, purpose, summary)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, title, start_at, end_at, group_id, created_by, location,
                      doctor_name, purpose, summary, completed, created_at, updated_at
            "#,
        )
        .bind(appointment.title)
        .bind(appointment.start_at)
        .bind(appointment.end_at)
        .bind(appointment.group_id)
        .bind(appointment.created_by)
        .bind(appointment.location)
        .bind(appointment.doctor_name)
        .bind(appointment.purpose)
        .bind(appointment.summary)
        .fetch_one(&self.pool)
        .await
    }

    /// Partial update of an appointment's fields.
    pub async fn update(
        &self,
        id: Uuid,
        changes: AppointmentChanges<'_>,
    ) -> Result<Option<AppointmentEntity>, sqlx::Error> {
        sqlx::query_as::<_, AppointmentEntity>(
            r#"
            UPDATE appointments
            SET
                title = COALESCE($2, title),
                start_at = COALESCE($3, start_at),
                end_at = COALESCE($4, end_at),
                location = COALESCE($5, location),
                doctor_name = COALESCE($6, doctor_name),
                purpose = COALESCE($7, purpose),
                summary = COALESCE($8, summary),
                completed = COALESCE($9, completed),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, start_at, end_at, group_id, created_by, location,
                      doctor_name, purpose, summary, completed, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.title)
        .bind(changes.start_at)
        .bind(changes.end_at)
        .bind(changes.location)
        .bind(changes.doctor_name)
        .bind(changes.purpose)
        .bind(changes.summary)
        .bind(changes.completed)
        .fetch_optional(&self.pool)
        .await
    }

    /// Delete an appointment.
    pub async fn delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Set the completed flag.
    pub async fn mark_complete(
        &self,
        id: Uuid,
    ) -> Result<Option<AppointmentEntity>, sqlx::Error> {
        sqlx::query_as::<_, AppointmentEntity>(
            r#"
            UPDATE appointments
            SET completed = true, updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, start_at, end_at, group_id, created_by, location,
                      doctor_name, purpose, summary, completed, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }
}
