//! Route definitions for the `/users` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// `/me` is a static segment and wins over `/{username}`; it has no DELETE,
/// so deleting yourself answers 405.
///
/// ```text
/// GET    /             -> list_users
/// POST   /             -> create_user
/// GET    /me           -> get_me
/// PATCH  /me           -> update_me
/// GET    /{username}   -> get_user
/// PATCH  /{username}   -> update_user
/// DELETE /{username}   -> delete_user
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route("/me", get(users::get_me).patch(users::update_me))
        .route(
            "/{username}",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
}
