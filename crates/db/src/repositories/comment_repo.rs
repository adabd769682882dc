//! Repository for the `comments` table.

use sqlx::PgPool;
use yamdb_core::types::DbId;

use crate::models::comment::{Comment, CreateComment, UpdateComment};

/// Comment columns plus the author's username, selected from a row source
/// aliased `c` joined to `users u`.
const COLUMNS: &str = "c.id, c.review_id, c.author_id, c.text, u.username AS author, c.pub_date";

/// Provides CRUD operations for comments.
pub struct CommentRepo;

impl CommentRepo {
    /// Insert a new comment, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateComment) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "WITH c AS (
                INSERT INTO comments (review_id, author_id, text)
                VALUES ($1, $2, $3)
                RETURNING *
             )
             SELECT {COLUMNS} FROM c JOIN users u ON u.id = c.author_id"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(input.review_id)
            .bind(input.author_id)
            .bind(&input.text)
            .fetch_one(pool)
            .await
    }

    /// Find a comment by ID, only if it belongs to `review_id`.
    pub async fn find_for_review(
        pool: &PgPool,
        review_id: DbId,
        id: DbId,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM comments c JOIN users u ON u.id = c.author_id
             WHERE c.id = $1 AND c.review_id = $2"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(review_id)
            .fetch_optional(pool)
            .await
    }

    /// List a review's comments, newest first.
    pub async fn list_for_review(
        pool: &PgPool,
        review_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM comments c JOIN users u ON u.id = c.author_id
             WHERE c.review_id = $1
             ORDER BY c.pub_date DESC, c.id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(review_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count a review's comments.
    pub async fn count_for_review(pool: &PgPool, review_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE review_id = $1")
            .bind(review_id)
            .fetch_one(pool)
            .await
    }

    /// Update a comment's text.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateComment,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!(
            "WITH c AS (
                UPDATE comments SET text = COALESCE($2, text)
                WHERE id = $1
                RETURNING *
             )
             SELECT {COLUMNS} FROM c JOIN users u ON u.id = c.author_id"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(&input.text)
            .fetch_optional(pool)
            .await
    }

    /// Delete a comment. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
