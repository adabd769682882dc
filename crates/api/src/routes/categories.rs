//! Route definitions for the `/categories` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::taxonomy;
use crate::state::AppState;

/// Routes mounted at `/categories`.
///
/// ```text
/// GET    /         -> list_categories
/// POST   /         -> create_category
/// DELETE /{slug}   -> delete_category
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(taxonomy::list_categories).post(taxonomy::create_category),
        )
        .route("/{slug}", delete(taxonomy::delete_category))
}
