//! Comment entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use yamdb_core::types::DbId;

use super::authored::AuthoredText;

/// A comment row joined with its author's username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    #[serde(skip_serializing)]
    pub review_id: DbId,
    #[serde(skip_serializing)]
    pub author_id: DbId,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub body: AuthoredText,
}

/// DTO for creating a comment.
#[derive(Debug, Clone)]
pub struct CreateComment {
    pub review_id: DbId,
    pub author_id: DbId,
    pub text: String,
}

/// DTO for updating a comment.
#[derive(Debug, Clone, Default)]
pub struct UpdateComment {
    pub text: Option<String>,
}
