//! Fields shared by reviews and comments.

use serde::Serialize;
use sqlx::FromRow;
use yamdb_core::types::Timestamp;

/// A piece of user-written text: body, author's username, publication time.
///
/// Embedded (flattened) into [`Review`](super::review::Review) and
/// [`Comment`](super::comment::Comment) rows and responses.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuthoredText {
    pub text: String,
    /// The author's username, joined from `users`.
    pub author: String,
    pub pub_date: Timestamp,
}
