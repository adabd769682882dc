//! Handlers for `/categories` and `/genres`.
//!
//! Both collections support list, create and delete-by-slug only. Reads are
//! public; writes need an administrator.

use axum::extract::{OriginalUri, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;
use yamdb_core::error::CoreError;
use yamdb_core::permissions::{authorize, Action, Resource};
use yamdb_core::validation::{validate_not_blank, validate_slug, MAX_NAME_LENGTH, MAX_SLUG_LENGTH};
use yamdb_db::models::taxon::{CreateTaxon, Taxon, TaxonKind};
use yamdb_db::repositories::TaxonRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{JsonBody, Path, Query};
use crate::middleware::auth::OptionalAuth;
use crate::query::{PaginationParams, SearchParams};
use crate::response::Page;
use crate::state::AppState;

/// Request body for `POST /categories` and `POST /genres`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaxonRequest {
    #[validate(length(min = 1, max = MAX_NAME_LENGTH), custom(function = "validate_not_blank"))]
    pub name: String,
    #[validate(length(min = 1, max = MAX_SLUG_LENGTH), custom(function = "validate_slug"))]
    pub slug: String,
}

fn resource(kind: TaxonKind) -> Resource {
    match kind {
        TaxonKind::Category => Resource::Category,
        TaxonKind::Genre => Resource::Genre,
    }
}

async fn list(
    state: AppState,
    kind: TaxonKind,
    uri: &axum::http::Uri,
    search: SearchParams,
    page: PaginationParams,
) -> AppResult<Json<Page<Taxon>>> {
    let window = page.window();
    let items = TaxonRepo::list(&state.pool, kind, search.term(), window.limit, window.offset)
        .await?;
    let count = TaxonRepo::count(&state.pool, kind, search.term()).await?;
    Ok(Json(Page::new(items, count, window, uri)))
}

async fn create(
    state: AppState,
    kind: TaxonKind,
    auth: OptionalAuth,
    body: JsonBody<CreateTaxonRequest>,
) -> AppResult<(StatusCode, Json<Taxon>)> {
    authorize(auth.actor(), Action::Create, resource(kind))?;
    let input = body.validated()?;

    let taxon = TaxonRepo::create(
        &state.pool,
        kind,
        &CreateTaxon {
            name: input.name.trim().to_string(),
            slug: input.slug,
        },
    )
    .await?;

    tracing::info!(
        entity = kind.entity(),
        id = taxon.id,
        slug = %taxon.slug,
        "Classification created",
    );

    Ok((StatusCode::CREATED, Json(taxon)))
}

async fn delete(
    state: AppState,
    kind: TaxonKind,
    auth: OptionalAuth,
    slug: String,
) -> AppResult<StatusCode> {
    authorize(auth.actor(), Action::Delete, resource(kind))?;

    if !TaxonRepo::delete_by_slug(&state.pool, kind, &slug).await? {
        return Err(AppError::Core(CoreError::NotFoundByKey {
            entity: kind.entity(),
            key: slug,
        }));
    }

    tracing::info!(entity = kind.entity(), slug = %slug, "Classification deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

/// GET /api/v1/categories
pub async fn list_categories(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(search): Query<SearchParams>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<Page<Taxon>>> {
    list(state, TaxonKind::Category, &uri, search, page).await
}

/// POST /api/v1/categories
pub async fn create_category(
    State(state): State<AppState>,
    auth: OptionalAuth,
    body: JsonBody<CreateTaxonRequest>,
) -> AppResult<(StatusCode, Json<Taxon>)> {
    create(state, TaxonKind::Category, auth, body).await
}

/// DELETE /api/v1/categories/{slug}
///
/// Fails with 409 while any title still belongs to the category.
pub async fn delete_category(
    State(state): State<AppState>,
    auth: OptionalAuth,
    Path(slug): Path<String>,
) -> AppResult<StatusCode> {
    delete(state, TaxonKind::Category, auth, slug).await
}

// ---------------------------------------------------------------------------
// Genres
// ---------------------------------------------------------------------------

/// GET /api/v1/genres
pub async fn list_genres(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(search): Query<SearchParams>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<Page<Taxon>>> {
    list(state, TaxonKind::Genre, &uri, search, page).await
}

/// POST /api/v1/genres
pub async fn create_genre(
    State(state): State<AppState>,
    auth: OptionalAuth,
    body: JsonBody<CreateTaxonRequest>,
) -> AppResult<(StatusCode, Json<Taxon>)> {
    create(state, TaxonKind::Genre, auth, body).await
}

/// DELETE /api/v1/genres/{slug}
///
/// Titles keep existing; they just lose this genre.
pub async fn delete_genre(
    State(state): State<AppState>,
    auth: OptionalAuth,
    Path(slug): Path<String>,
) -> AppResult<StatusCode> {
    delete(state, TaxonKind::Genre, auth, slug).await
}
