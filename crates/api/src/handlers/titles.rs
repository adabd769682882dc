//! Handlers for the `/titles` resource.
//!
//! Reads are public and return titles with their category, genres and the
//! computed average review score. Writes need an administrator and refer to
//! the category and genres by slug.

use std::collections::HashMap;

use axum::extract::{OriginalUri, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;
use yamdb_core::error::CoreError;
use yamdb_core::permissions::{authorize, Action, Resource};
use yamdb_core::rating::average_score;
use yamdb_core::types::DbId;
use yamdb_core::validation::{
    check_year, current_year, field_error, validate_not_blank, MAX_NAME_LENGTH,
};
use yamdb_db::models::taxon::{Taxon, TaxonKind};
use yamdb_db::models::title::{CreateTitle, Title, TitleFilter, TitleOrdering, UpdateTitle};
use yamdb_db::repositories::{ReviewRepo, TaxonRepo, TitleRepo};
use yamdb_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::extract::{JsonBody, Path, Query};
use crate::middleware::auth::OptionalAuth;
use crate::query::{PaginationParams, TitleListParams};
use crate::response::Page;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /titles`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTitleRequest {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH), custom(function = "validate_not_blank"))]
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    /// Genre slugs.
    #[serde(default)]
    pub genre: Vec<String>,
    /// Category slug.
    pub category: String,
}

/// Request body for `PATCH /titles/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTitleRequest {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    pub year: Option<i32>,
    pub description: Option<String>,
    /// Replaces the whole genre set when present.
    pub genre: Option<Vec<String>>,
    pub category: Option<String>,
}

/// A title as returned by every read and write endpoint.
#[derive(Debug, Serialize)]
pub struct TitleResponse {
    pub id: DbId,
    pub name: String,
    pub year: i32,
    /// Mean review score rounded to two decimals; `null` without reviews.
    pub rating: Option<f64>,
    pub description: Option<String>,
    pub genre: Vec<Taxon>,
    pub category: Taxon,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/titles
///
/// Supports `?name=` (substring), `?year=`, `?genre=` and `?category=` (slugs)
/// and `?ordering=` on `name`, `year` or `category` (`-` prefix for
/// descending). Unknown orderings fall back to name.
pub async fn list_titles(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<TitleListParams>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<Page<TitleResponse>>> {
    let filter = TitleFilter {
        name: params.name.filter(|s| !s.trim().is_empty()),
        year: params.year,
        genre: params.genre,
        category: params.category,
        ordering: params
            .ordering
            .as_deref()
            .and_then(TitleOrdering::parse)
            .unwrap_or_default(),
    };

    let window = page.window();
    let titles = TitleRepo::list(&state.pool, &filter, window.limit, window.offset).await?;
    let count = TitleRepo::count(&state.pool, &filter).await?;

    let results = build_title_responses(&state.pool, titles).await?;
    Ok(Json(Page::new(results, count, window, &uri)))
}

/// GET /api/v1/titles/{id}
pub async fn get_title(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<TitleResponse>> {
    let title = find_title(&state.pool, id).await?;
    Ok(Json(build_title_response(&state.pool, title).await?))
}

/// POST /api/v1/titles
pub async fn create_title(
    State(state): State<AppState>,
    auth: OptionalAuth,
    body: JsonBody<CreateTitleRequest>,
) -> AppResult<(StatusCode, Json<TitleResponse>)> {
    authorize(auth.actor(), Action::Create, Resource::Title)?;
    let input = body.validated()?;

    check_year(input.year, current_year()).map_err(|e| field_error("year", e))?;
    let category_id = resolve_category(&state.pool, &input.category).await?;
    let genre_ids = resolve_genres(&state.pool, &input.genre).await?;

    let title = TitleRepo::create(
        &state.pool,
        &CreateTitle {
            name: input.name,
            year: input.year,
            description: input.description,
            category_id,
            genre_ids,
        },
    )
    .await?;

    tracing::info!(title_id = title.id, name = %title.name, "Title created");

    let response = build_title_response(&state.pool, title).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// PATCH /api/v1/titles/{id}
pub async fn update_title(
    State(state): State<AppState>,
    auth: OptionalAuth,
    Path(id): Path<DbId>,
    body: JsonBody<UpdateTitleRequest>,
) -> AppResult<Json<TitleResponse>> {
    authorize(auth.actor(), Action::Update, Resource::Title)?;
    let input = body.validated()?;

    if let Some(year) = input.year {
        check_year(year, current_year()).map_err(|e| field_error("year", e))?;
    }
    let category_id = match &input.category {
        Some(slug) => Some(resolve_category(&state.pool, slug).await?),
        None => None,
    };
    let genre_ids = match &input.genre {
        Some(slugs) => Some(resolve_genres(&state.pool, slugs).await?),
        None => None,
    };

    let title = TitleRepo::update(
        &state.pool,
        id,
        &UpdateTitle {
            name: input.name,
            year: input.year,
            description: input.description,
            category_id,
            genre_ids,
        },
    )
    .await?
    .ok_or(CoreError::NotFound {
        entity: "Title",
        id,
    })?;

    tracing::info!(title_id = id, "Title updated");

    Ok(Json(build_title_response(&state.pool, title).await?))
}

/// DELETE /api/v1/titles/{id}
///
/// Reviews and their comments are removed with the title.
pub async fn delete_title(
    State(state): State<AppState>,
    auth: OptionalAuth,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    authorize(auth.actor(), Action::Delete, Resource::Title)?;

    if !TitleRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Title",
            id,
        }));
    }

    tracing::info!(title_id = id, "Title deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_title(pool: &DbPool, id: DbId) -> AppResult<Title> {
    TitleRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Title",
            id,
        }))
}

async fn resolve_category(pool: &DbPool, slug: &str) -> AppResult<DbId> {
    TaxonRepo::find_by_slug(pool, TaxonKind::Category, slug)
        .await?
        .map(|category| category.id)
        .ok_or_else(|| {
            let err = validator::ValidationError::new("does_not_exist")
                .with_message(format!("Category '{slug}' does not exist").into());
            AppError::Validation(field_error("category", err))
        })
}

async fn resolve_genres(pool: &DbPool, slugs: &[String]) -> AppResult<Vec<DbId>> {
    let genres = TaxonRepo::find_by_slugs(pool, TaxonKind::Genre, slugs).await?;
    if let Some(missing) = slugs
        .iter()
        .find(|slug| !genres.iter().any(|g| &g.slug == *slug))
    {
        let err = validator::ValidationError::new("does_not_exist")
            .with_message(format!("Genre '{missing}' does not exist").into());
        return Err(AppError::Validation(field_error("genre", err)));
    }
    Ok(genres.into_iter().map(|g| g.id).collect())
}

async fn build_title_response(pool: &DbPool, title: Title) -> AppResult<TitleResponse> {
    let mut responses = build_title_responses(pool, vec![title]).await?;
    responses
        .pop()
        .ok_or_else(|| AppError::InternalError("Title response assembly failed".into()))
}

/// Attach genres and ratings to a page of titles with one query each.
async fn build_title_responses(pool: &DbPool, titles: Vec<Title>) -> AppResult<Vec<TitleResponse>> {
    let ids: Vec<DbId> = titles.iter().map(|t| t.id).collect();

    let mut genres: HashMap<DbId, Vec<Taxon>> = HashMap::new();
    for link in TitleRepo::genres_for_titles(pool, &ids).await? {
        genres.entry(link.title_id).or_default().push(link.genre);
    }

    let mut scores: HashMap<DbId, Vec<i16>> = HashMap::new();
    for (title_id, score) in ReviewRepo::scores_for_titles(pool, &ids).await? {
        scores.entry(title_id).or_default().push(score);
    }

    Ok(titles
        .into_iter()
        .map(|title| TitleResponse {
            id: title.id,
            rating: average_score(scores.remove(&title.id).unwrap_or_default()),
            genre: genres.remove(&title.id).unwrap_or_default(),
            category: Taxon {
                id: title.category_id,
                name: title.category_name,
                slug: title.category_slug,
            },
            name: title.name,
            year: title.year,
            description: title.description,
        })
        .collect())
}
