//! User repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::UserEntity;

/// Repository for user-related database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user. The email must already be lowercased by the caller.
    ///
    /// A concurrent registration with the same username or email surfaces as
    /// a database error with code 23505.
    pub async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<UserEntity, sqlx::Error> {
        sqlx::query_as::<_, UserEntity>(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash, group_id, created_at, updated_at
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, username, email, password_hash, group_id, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Find a user by (lowercased) email.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, sqlx::Error> {
        sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, username, email, password_hash, group_id, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    /// Check whether a username or email is already taken.
    pub async fn exists_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM users WHERE username = $1 OR email = $2)",
        )
        .bind(username)
        .bind(email)
        .fetch_one(&self.pool)
        .await
    }

    /// Delete a user account and, when the user belongs to a group, all
    /// medications and appointments of that group.
    ///
    /// The group row itself and the other members are left untouched; the
    /// deleted user's id may remain in the group's member list as a stale
    /// referential entry that later group operations tolerate.
    ///
    /// Returns the number of user rows deleted (0 when the user was already
    /// gone). Runs in a single transaction.
    pub async fn delete_account(
        &self,
        user_id: Uuid,
        group_id: Option<Uuid>,
    ) -> Result<u64, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        if let Some(group_id) = group_id {
            // Administrations cascade with their medications.
            sqlx::query("DELETE FROM medications WHERE group_id = $1")
                .bind(group_id)
                .execute(&mut *tx)
                .await?;

            sqlx::query("DELETE FROM appointments WHERE group_id = $1")
                .bind(group_id)
                .execute(&mut *tx)
                .await?;
        }

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    // UserRepository requires a database connection; behavior is covered by
    // the users integration tests.
}
