//! Group repository for database operations.
//!
//! Groups hold an ordered, append-only `member_ids` array whose first
//! element is the owner. Every lifecycle mutation that touches more than one
//! row (create, join, leave, delete) runs in a single transaction so a
//! mid-cascade failure cannot orphan dependent records.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::GroupEntity;

/// Result of removing a member from a group.
#[derive(Debug, Clone)]
pub enum LeaveOutcome {
    /// Other members remain; the updated group is returned.
    Remaining(GroupEntity),
    /// The member list became empty: the group and all its dependent
    /// medications and appointments were deleted.
    Disbanded,
}

/// Repository for group-related database operations.
#[derive(Clone)]
pub struct GroupRepository {
    pool: PgPool,
}

impl GroupRepository {
    /// Creates a new GroupRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new group with the creator as sole member and set the
    /// creator's group reference, atomically.
    pub async fn create_group(
        &self,
        name: &str,
        invite_code: &str,
        creator_id: Uuid,
    ) -> Result<GroupEntity, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let group = sqlx::query_as::<_, GroupEntity>(
            r#"
            INSERT INTO groups (name, member_ids, invite_code)
            VALUES ($1, ARRAY[$2]::uuid[], $3)
            RETURNING id, name, member_ids, invite_code, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(creator_id)
        .bind(invite_code)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE users SET group_id = $1, updated_at = NOW() WHERE id = $2")
            .bind(group.id)
            .bind(creator_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(group)
    }

    /// Find a group by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<GroupEntity>, sqlx::Error> {
        sqlx::query_as::<_, GroupEntity>(
            r#"
            SELECT id, name, member_ids, invite_code, created_at, updated_at
            FROM groups
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Find a group by invite code. The code must already be normalized to
    /// uppercase.
    pub async fn find_by_invite_code(
        &self,
        invite_code: &str,
    ) -> Result<Option<GroupEntity>, sqlx::Error> {
        sqlx::query_as::<_, GroupEntity>(
            r#"
            SELECT id, name, member_ids, invite_code, created_at, updated_at
            FROM groups
            WHERE invite_code = $1
            "#,
        )
        .bind(invite_code)
        .fetch_optional(&self.pool)
        .await
    }

    /// Check if an invite code is already in use.
    pub async fn invite_code_exists(&self, invite_code: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM groups WHERE invite_code = $1)",
        )
        .bind(invite_code)
        .fetch_one(&self.pool)
        .await
    }

    /// Generate an invite code that is unique across all groups, retrying
    /// the generator on collision.
    pub async fn generate_unique_invite_code<F>(&self, generator: F) -> Result<String, sqlx::Error>
    where
        F: Fn() -> String,
    {
        let mut code = generator();
        let mut attempts = 0;

        while self.invite_code_exists(&code).await? {
            code = generator();
            attempts += 1;
            if attempts > 100 {
                return Err(sqlx::Error::Protocol(
                    "Could not generate unique invite code".to_string(),
                ));
            }
        }

        Ok(code)
    }

    /// Append a member to the group's member list and set the member's
    /// group reference, atomically. Membership order is preserved so
    /// ownership (first member) stays well-defined.
    pub async fn join_group(
        &self,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<GroupEntity, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let group = sqlx::query_as::<_, GroupEntity>(
            r#"
            UPDATE groups
            SET member_ids = array_append(member_ids, $2), updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, member_ids, invite_code, created_at, updated_at
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE users SET group_id = $1, updated_at = NOW() WHERE id = $2")
            .bind(group_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(group)
    }

    /// Remove a member from the group and clear their group reference.
    ///
    /// When the member list becomes empty the group is disbanded: all
    /// medications (administrations cascade) and appointments referencing
    /// it are deleted, then the group row itself. One transaction end to
    /// end.
    pub async fn leave_group(
        &self,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<LeaveOutcome, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let group = sqlx::query_as::<_, GroupEntity>(
            r#"
            UPDATE groups
            SET member_ids = array_remove(member_ids, $2), updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, member_ids, invite_code, created_at, updated_at
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE users SET group_id = NULL, updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let outcome = if group.member_ids.is_empty() {
            Self::delete_group_dependents(&mut tx, group_id).await?;

            sqlx::query("DELETE FROM groups WHERE id = $1")
                .bind(group_id)
                .execute(&mut *tx)
                .await?;

            LeaveOutcome::Disbanded
        } else {
            LeaveOutcome::Remaining(group)
        };

        tx.commit().await?;
        Ok(outcome)
    }

    /// Delete a group outright: remove all dependent medications and
    /// appointments, clear the group reference on every member, and delete
    /// the group row. One transaction end to end.
    ///
    /// Ownership is checked by the caller against the group's member order.
    pub async fn delete_group(&self, group_id: Uuid) -> Result<u64, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        Self::delete_group_dependents(&mut tx, group_id).await?;

        sqlx::query("UPDATE users SET group_id = NULL, updated_at = NOW() WHERE group_id = $1")
            .bind(group_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(group_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected())
    }

    /// Delete every medication and appointment referencing the group.
    /// Administrations cascade with their medications.
    async fn delete_group_dependents(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        group_id: Uuid,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM medications WHERE group_id = $1")
            .bind(group_id)
            .execute(&mut **tx)
            .await?;

        sqlx::query("DELETE FROM appointments WHERE group_id = $1")
            .bind(group_id)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}
