//! Repository for the `users` table.

use sqlx::PgPool;
use yamdb_core::roles::Role;
use yamdb_core::types::DbId;

use super::contains_pattern;
use crate::models::user::{CreateUser, UpdateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, first_name, last_name, bio, role, is_staff, \
                       is_superuser, confirmation_code_hash, confirmation_code_issued_at, \
                       date_joined";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email, first_name, last_name, bio, role)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.bio)
            .bind(input.role.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List users ordered by username, optionally filtered by a
    /// case-insensitive username substring.
    pub async fn list(
        pool: &PgPool,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users
             WHERE ($1::TEXT IS NULL OR username ILIKE $1)
             ORDER BY username
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(search.map(contains_pattern))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count users matching the same filter as [`UserRepo::list`].
    pub async fn count(pool: &PgPool, search: Option<&str>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM users WHERE ($1::TEXT IS NULL OR username ILIKE $1)",
        )
        .bind(search.map(contains_pattern))
        .fetch_one(pool)
        .await
    }

    /// Update a user. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                username = COALESCE($2, username),
                email = COALESCE($3, email),
                first_name = COALESCE($4, first_name),
                last_name = COALESCE($5, last_name),
                bio = COALESCE($6, bio),
                role = COALESCE($7, role)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.bio)
            .bind(input.role.map(Role::as_str))
            .fetch_optional(pool)
            .await
    }

    /// Delete a user by username. Their reviews and comments cascade.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete_by_username(pool: &PgPool, username: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE username = $1")
            .bind(username)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Store the hash of a freshly issued confirmation code, replacing any
    /// previous one.
    pub async fn set_confirmation_code(
        pool: &PgPool,
        id: DbId,
        code_hash: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET
                confirmation_code_hash = $2,
                confirmation_code_issued_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(code_hash)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Make a user an admin with staff and superuser flags.
    pub async fn grant_superuser(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET role = 'admin', is_staff = true, is_superuser = true
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
