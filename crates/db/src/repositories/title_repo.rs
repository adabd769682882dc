//! Repository for the `titles` and `title_genres` tables.

use sqlx::PgPool;
use yamdb_core::types::DbId;

use super::contains_pattern;
use crate::models::title::{CreateTitle, Title, TitleFilter, TitleGenre, UpdateTitle};

/// Title columns joined with the owning category.
const SELECT_TITLES: &str = "SELECT t.id, t.name, t.year, t.description, t.category_id, \
                                    c.name AS category_name, c.slug AS category_slug \
                             FROM titles t \
                             JOIN categories c ON c.id = t.category_id";

/// Filter clause shared by [`TitleRepo::list`] and [`TitleRepo::count`].
/// Binds: `$1` name pattern, `$2` year, `$3` category slug, `$4` genre slug.
const FILTER_WHERE: &str = "WHERE ($1::TEXT IS NULL OR t.name ILIKE $1) \
                              AND ($2::INTEGER IS NULL OR t.year = $2) \
                              AND ($3::TEXT IS NULL OR c.slug = $3) \
                              AND ($4::TEXT IS NULL OR EXISTS ( \
                                  SELECT 1 FROM title_genres tg \
                                  JOIN genres g ON g.id = tg.genre_id \
                                  WHERE tg.title_id = t.id AND g.slug = $4))";

/// Provides CRUD operations for titles and their genre links.
pub struct TitleRepo;

impl TitleRepo {
    /// Insert a title and its genre links in one transaction.
    pub async fn create(pool: &PgPool, input: &CreateTitle) -> Result<Title, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO titles (name, year, description, category_id)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(&input.name)
        .bind(input.year)
        .bind(&input.description)
        .bind(input.category_id)
        .fetch_one(&mut *tx)
        .await?;

        Self::link_genres(&mut tx, id, &input.genre_ids).await?;

        tx.commit().await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Find a title by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Title>, sqlx::Error> {
        let query = format!("{SELECT_TITLES} WHERE t.id = $1");
        sqlx::query_as::<_, Title>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a title with the given ID exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM titles WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// List titles matching `filter`, in the filter's ordering.
    pub async fn list(
        pool: &PgPool,
        filter: &TitleFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Title>, sqlx::Error> {
        let query = format!(
            "{SELECT_TITLES} {FILTER_WHERE} ORDER BY {order} LIMIT $5 OFFSET $6",
            order = filter.ordering.sql()
        );
        sqlx::query_as::<_, Title>(&query)
            .bind(filter.name.as_deref().map(contains_pattern))
            .bind(filter.year)
            .bind(&filter.category)
            .bind(&filter.genre)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count titles matching `filter`.
    pub async fn count(pool: &PgPool, filter: &TitleFilter) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*) FROM titles t \
             JOIN categories c ON c.id = t.category_id \
             {FILTER_WHERE}"
        );
        sqlx::query_scalar(&query)
            .bind(filter.name.as_deref().map(contains_pattern))
            .bind(filter.year)
            .bind(&filter.category)
            .bind(&filter.genre)
            .fetch_one(pool)
            .await
    }

    /// Genres of every title in `title_ids`, ordered by genre name.
    pub async fn genres_for_titles(
        pool: &PgPool,
        title_ids: &[DbId],
    ) -> Result<Vec<TitleGenre>, sqlx::Error> {
        sqlx::query_as::<_, TitleGenre>(
            "SELECT tg.title_id, g.id, g.name, g.slug
             FROM title_genres tg
             JOIN genres g ON g.id = tg.genre_id
             WHERE tg.title_id = ANY($1)
             ORDER BY g.name",
        )
        .bind(title_ids)
        .fetch_all(pool)
        .await
    }

    /// Update a title. Only non-`None` fields are applied; `genre_ids`
    /// replaces the title's genre set.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTitle,
    ) -> Result<Option<Title>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let updated: Option<DbId> = sqlx::query_scalar(
            "UPDATE titles SET
                name = COALESCE($2, name),
                year = COALESCE($3, year),
                description = COALESCE($4, description),
                category_id = COALESCE($5, category_id)
             WHERE id = $1
             RETURNING id",
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.year)
        .bind(&input.description)
        .bind(input.category_id)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            return Ok(None);
        }

        if let Some(ref genre_ids) = input.genre_ids {
            sqlx::query("DELETE FROM title_genres WHERE title_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            Self::link_genres(&mut tx, id, genre_ids).await?;
        }

        tx.commit().await?;
        Self::find_by_id(pool, id).await
    }

    /// Delete a title. Its reviews and their comments cascade.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM titles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn link_genres(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        title_id: DbId,
        genre_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        if genre_ids.is_empty() {
            return Ok(());
        }
        sqlx::query(
            "INSERT INTO title_genres (title_id, genre_id)
             SELECT $1, UNNEST($2::BIGINT[])
             ON CONFLICT DO NOTHING",
        )
        .bind(title_id)
        .bind(genre_ids)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
