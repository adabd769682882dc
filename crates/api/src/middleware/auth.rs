//! JWT-based authentication extractors for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use yamdb_core::error::CoreError;
use yamdb_core::permissions::Actor;
use yamdb_db::models::user::User;
use yamdb_db::repositories::UserRepo;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the `Authorization` header.
///
/// The user row is reloaded on every request, so role changes and deletions
/// take effect immediately even for tokens issued earlier.
///
/// ```ignore
/// async fn my_handler(auth: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = auth.user.id, role = %auth.user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
    pub actor: Actor,
}

impl AuthUser {
    pub fn id(&self) -> yamdb_core::types::DbId {
        self.user.id
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        let user = UserRepo::find_by_id(&state.pool, claims.sub)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("User no longer exists".into()))
            })?;
        let actor = user.actor()?;

        Ok(AuthUser { user, actor })
    }
}

/// Like [`AuthUser`], but anonymous requests are let through as `None`.
///
/// A request that does send credentials must send valid ones: a bad token
/// is still rejected with 401.
#[derive(Debug, Clone)]
pub struct OptionalAuth(pub Option<AuthUser>);

impl OptionalAuth {
    /// The caller's authorization view, if authenticated.
    pub fn actor(&self) -> Option<&Actor> {
        self.0.as_ref().map(|auth| &auth.actor)
    }
}

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key(AUTHORIZATION) {
            return Ok(OptionalAuth(None));
        }
        AuthUser::from_request_parts(parts, state)
            .await
            .map(|auth| OptionalAuth(Some(auth)))
    }
}
