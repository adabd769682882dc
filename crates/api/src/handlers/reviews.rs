//! Handlers for `/titles/{title_id}/reviews`.
//!
//! Anyone may read. Any authenticated user may post one review per title;
//! editing and deleting is limited to the author, moderators and admins.

use axum::extract::{OriginalUri, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;
use yamdb_core::error::CoreError;
use yamdb_core::permissions::{authorize, Action, Resource};
use yamdb_core::types::DbId;
use yamdb_core::validation::{validate_not_blank, MAX_REVIEW_SCORE, MIN_REVIEW_SCORE};
use yamdb_db::models::review::{CreateReview, Review, UpdateReview};
use yamdb_db::repositories::{ReviewRepo, TitleRepo};
use yamdb_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::extract::{JsonBody, Path, Query, ValidJson};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::Page;
use crate::state::AppState;

/// Request body for `POST /titles/{title_id}/reviews`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub text: String,
    #[validate(range(min = MIN_REVIEW_SCORE, max = MAX_REVIEW_SCORE))]
    pub score: i16,
}

/// Request body for `PATCH /titles/{title_id}/reviews/{review_id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateReviewRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub text: Option<String>,
    #[validate(range(min = MIN_REVIEW_SCORE, max = MAX_REVIEW_SCORE))]
    pub score: Option<i16>,
}

/// GET /api/v1/titles/{title_id}/reviews
pub async fn list_reviews(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(title_id): Path<DbId>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<Page<Review>>> {
    ensure_title_exists(&state.pool, title_id).await?;

    let window = page.window();
    let reviews =
        ReviewRepo::list_for_title(&state.pool, title_id, window.limit, window.offset).await?;
    let count = ReviewRepo::count_for_title(&state.pool, title_id).await?;

    Ok(Json(Page::new(reviews, count, window, &uri)))
}

/// GET /api/v1/titles/{title_id}/reviews/{review_id}
pub async fn get_review(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<Review>> {
    let review = find_review(&state.pool, title_id, review_id).await?;
    Ok(Json(review))
}

/// POST /api/v1/titles/{title_id}/reviews
///
/// The author is always the caller. A second review of the same title by
/// the same user is a 409.
pub async fn create_review(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(title_id): Path<DbId>,
    ValidJson(input): ValidJson<CreateReviewRequest>,
) -> AppResult<(StatusCode, Json<Review>)> {
    authorize(
        Some(&auth.actor),
        Action::Create,
        Resource::Review { author_id: None },
    )?;
    ensure_title_exists(&state.pool, title_id).await?;

    if ReviewRepo::exists_for_author(&state.pool, title_id, auth.id()).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "You have already reviewed this title".into(),
        )));
    }

    let review = ReviewRepo::create(
        &state.pool,
        &CreateReview {
            title_id,
            author_id: auth.id(),
            text: input.text,
            score: input.score,
        },
    )
    .await?;

    tracing::info!(
        review_id = review.id,
        title_id,
        author_id = auth.id(),
        score = review.score,
        "Review created",
    );

    Ok((StatusCode::CREATED, Json(review)))
}

/// PATCH /api/v1/titles/{title_id}/reviews/{review_id}
pub async fn update_review(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
    body: JsonBody<UpdateReviewRequest>,
) -> AppResult<Json<Review>> {
    let review = find_review(&state.pool, title_id, review_id).await?;
    authorize(
        Some(&auth.actor),
        Action::Update,
        Resource::Review {
            author_id: Some(review.author_id),
        },
    )?;
    let input = body.validated()?;

    let updated = ReviewRepo::update(
        &state.pool,
        review_id,
        &UpdateReview {
            text: input.text,
            score: input.score,
        },
    )
    .await?
    .ok_or(CoreError::NotFound {
        entity: "Review",
        id: review_id,
    })?;

    tracing::info!(review_id, updated_by = auth.id(), "Review updated");

    Ok(Json(updated))
}

/// DELETE /api/v1/titles/{title_id}/reviews/{review_id}
pub async fn delete_review(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let review = find_review(&state.pool, title_id, review_id).await?;
    authorize(
        Some(&auth.actor),
        Action::Delete,
        Resource::Review {
            author_id: Some(review.author_id),
        },
    )?;

    ReviewRepo::delete(&state.pool, review_id).await?;

    tracing::info!(review_id, deleted_by = auth.id(), "Review deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) async fn ensure_title_exists(pool: &DbPool, title_id: DbId) -> AppResult<()> {
    if !TitleRepo::exists(pool, title_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Title",
            id: title_id,
        }));
    }
    Ok(())
}

/// Load a review, treating one that belongs to another title as missing.
pub(crate) async fn find_review(
    pool: &DbPool,
    title_id: DbId,
    review_id: DbId,
) -> AppResult<Review> {
    ReviewRepo::find_for_title(pool, title_id, review_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Review",
            id: review_id,
        }))
}
