//! Handlers for `/titles/{title_id}/reviews/{review_id}/comments`.
//!
//! The review must belong to the title in the path. Permissions follow the
//! same author/moderator/admin rule as reviews.

use axum::extract::{OriginalUri, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;
use yamdb_core::error::CoreError;
use yamdb_core::permissions::{authorize, Action, Resource};
use yamdb_core::types::DbId;
use yamdb_core::validation::validate_not_blank;
use yamdb_db::models::comment::{Comment, CreateComment, UpdateComment};
use yamdb_db::repositories::CommentRepo;
use yamdb_db::DbPool;

use super::reviews::find_review;
use crate::error::{AppError, AppResult};
use crate::extract::{JsonBody, Path, Query, ValidJson};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::Page;
use crate::state::AppState;

/// Request body for creating or editing a comment.
#[derive(Debug, Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub text: String,
}

/// GET /api/v1/titles/{title_id}/reviews/{review_id}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<Page<Comment>>> {
    find_review(&state.pool, title_id, review_id).await?;

    let window = page.window();
    let comments =
        CommentRepo::list_for_review(&state.pool, review_id, window.limit, window.offset).await?;
    let count = CommentRepo::count_for_review(&state.pool, review_id).await?;

    Ok(Json(Page::new(comments, count, window, &uri)))
}

/// GET /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}
pub async fn get_comment(
    State(state): State<AppState>,
    Path((title_id, review_id, comment_id)): Path<(DbId, DbId, DbId)>,
) -> AppResult<Json<Comment>> {
    find_review(&state.pool, title_id, review_id).await?;
    let comment = find_comment(&state.pool, review_id, comment_id).await?;
    Ok(Json(comment))
}

/// POST /api/v1/titles/{title_id}/reviews/{review_id}/comments
pub async fn create_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((title_id, review_id)): Path<(DbId, DbId)>,
    ValidJson(input): ValidJson<CommentRequest>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    authorize(
        Some(&auth.actor),
        Action::Create,
        Resource::Comment { author_id: None },
    )?;
    find_review(&state.pool, title_id, review_id).await?;

    let comment = CommentRepo::create(
        &state.pool,
        &CreateComment {
            review_id,
            author_id: auth.id(),
            text: input.text,
        },
    )
    .await?;

    tracing::info!(
        comment_id = comment.id,
        review_id,
        author_id = auth.id(),
        "Comment created",
    );

    Ok((StatusCode::CREATED, Json(comment)))
}

/// PATCH /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}
pub async fn update_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((title_id, review_id, comment_id)): Path<(DbId, DbId, DbId)>,
    body: JsonBody<CommentRequest>,
) -> AppResult<Json<Comment>> {
    find_review(&state.pool, title_id, review_id).await?;
    let comment = find_comment(&state.pool, review_id, comment_id).await?;
    authorize(
        Some(&auth.actor),
        Action::Update,
        Resource::Comment {
            author_id: Some(comment.author_id),
        },
    )?;
    let input = body.validated()?;

    let updated = CommentRepo::update(
        &state.pool,
        comment_id,
        &UpdateComment {
            text: Some(input.text),
        },
    )
    .await?
    .ok_or(CoreError::NotFound {
        entity: "Comment",
        id: comment_id,
    })?;

    tracing::info!(comment_id, updated_by = auth.id(), "Comment updated");

    Ok(Json(updated))
}

/// DELETE /api/v1/titles/{title_id}/reviews/{review_id}/comments/{comment_id}
pub async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((title_id, review_id, comment_id)): Path<(DbId, DbId, DbId)>,
) -> AppResult<StatusCode> {
    find_review(&state.pool, title_id, review_id).await?;
    let comment = find_comment(&state.pool, review_id, comment_id).await?;
    authorize(
        Some(&auth.actor),
        Action::Delete,
        Resource::Comment {
            author_id: Some(comment.author_id),
        },
    )?;

    CommentRepo::delete(&state.pool, comment_id).await?;

    tracing::info!(comment_id, deleted_by = auth.id(), "Comment deleted");

    Ok(StatusCode::NO_CONTENT)
}

async fn find_comment(pool: &DbPool, review_id: DbId, comment_id: DbId) -> AppResult<Comment> {
    CommentRepo::find_for_review(pool, review_id, comment_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Comment",
            id: comment_id,
        }))
}
