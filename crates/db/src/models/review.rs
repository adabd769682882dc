//! Review entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use yamdb_core::types::DbId;

use super::authored::AuthoredText;

/// A review row joined with its author's username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Review {
    pub id: DbId,
    #[serde(skip_serializing)]
    pub title_id: DbId,
    #[serde(skip_serializing)]
    pub author_id: DbId,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub body: AuthoredText,
    pub score: i16,
}

/// DTO for creating a review.
#[derive(Debug, Clone)]
pub struct CreateReview {
    pub title_id: DbId,
    pub author_id: DbId,
    pub text: String,
    pub score: i16,
}

/// DTO for updating a review. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateReview {
    pub text: Option<String>,
    pub score: Option<i16>,
}
