//! Route definitions for the `/genres` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::taxonomy;
use crate::state::AppState;

/// Routes mounted at `/genres`.
///
/// ```text
/// GET    /         -> list_genres
/// POST   /         -> create_genre
/// DELETE /{slug}   -> delete_genre
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(taxonomy::list_genres).post(taxonomy::create_genre))
        .route("/{slug}", delete(taxonomy::delete_genre))
}
