//! Role-based access control (RBAC) extractors.
//!
//! Wraps [`AuthUser`] and rejects requests whose account is not an
//! administrator. Use in route handlers to enforce authorization at the
//! type level.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use yamdb_core::permissions::{authorize, Action, Resource};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires an administrator (`admin` role, staff, or superuser).
/// Rejects with 401 without credentials and 403 otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(admin): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        authorize(Some(&user.actor), Action::Update, Resource::UserAccount)?;
        Ok(RequireAdmin(user))
    }
}
