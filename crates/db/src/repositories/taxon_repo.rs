//! Repository for the `categories` and `genres` tables.

use sqlx::PgPool;

use super::contains_pattern;
use crate::models::taxon::{CreateTaxon, Taxon, TaxonKind};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, slug";

/// Provides CRUD operations for categories and genres.
///
/// The table is chosen per call by [`TaxonKind`]; table names come from the
/// enum, never from user input.
pub struct TaxonRepo;

impl TaxonRepo {
    /// Insert a new category or genre, returning the created row.
    pub async fn create(
        pool: &PgPool,
        kind: TaxonKind,
        input: &CreateTaxon,
    ) -> Result<Taxon, sqlx::Error> {
        let query = format!(
            "INSERT INTO {table} (name, slug) VALUES ($1, $2) RETURNING {COLUMNS}",
            table = kind.table()
        );
        sqlx::query_as::<_, Taxon>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .fetch_one(pool)
            .await
    }

    /// Find a row by its slug.
    pub async fn find_by_slug(
        pool: &PgPool,
        kind: TaxonKind,
        slug: &str,
    ) -> Result<Option<Taxon>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {table} WHERE slug = $1",
            table = kind.table()
        );
        sqlx::query_as::<_, Taxon>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Fetch every row whose slug is in `slugs`. Unknown slugs are simply
    /// absent from the result.
    pub async fn find_by_slugs(
        pool: &PgPool,
        kind: TaxonKind,
        slugs: &[String],
    ) -> Result<Vec<Taxon>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {table} WHERE slug = ANY($1) ORDER BY name",
            table = kind.table()
        );
        sqlx::query_as::<_, Taxon>(&query)
            .bind(slugs)
            .fetch_all(pool)
            .await
    }

    /// List rows ordered by name, optionally filtered by a case-insensitive
    /// name substring.
    pub async fn list(
        pool: &PgPool,
        kind: TaxonKind,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Taxon>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {table}
             WHERE ($1::TEXT IS NULL OR name ILIKE $1)
             ORDER BY name
             LIMIT $2 OFFSET $3",
            table = kind.table()
        );
        sqlx::query_as::<_, Taxon>(&query)
            .bind(search.map(contains_pattern))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count rows matching the same filter as [`TaxonRepo::list`].
    pub async fn count(
        pool: &PgPool,
        kind: TaxonKind,
        search: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*) FROM {table} WHERE ($1::TEXT IS NULL OR name ILIKE $1)",
            table = kind.table()
        );
        sqlx::query_scalar(&query)
            .bind(search.map(contains_pattern))
            .fetch_one(pool)
            .await
    }

    /// Delete a row by slug. Returns `true` if a row was deleted.
    ///
    /// Deleting a category still used by a title fails with a foreign-key
    /// violation.
    pub async fn delete_by_slug(
        pool: &PgPool,
        kind: TaxonKind,
        slug: &str,
    ) -> Result<bool, sqlx::Error> {
        let query = format!("DELETE FROM {table} WHERE slug = $1", table = kind.table());
        let result = sqlx::query(&query).bind(slug).execute(pool).await?;
        Ok(result.rows_affected() > 0)
    }
}
