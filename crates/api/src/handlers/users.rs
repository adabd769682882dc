//! Handlers for the `/users` resource.
//!
//! Account management by username is admin-only via [`RequireAdmin`];
//! `/users/me` lets any authenticated user read and edit their own profile.

use axum::extract::{OriginalUri, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;
use yamdb_core::error::CoreError;
use yamdb_core::permissions::{authorize, Action, Resource};
use yamdb_core::roles::Role;
use yamdb_core::validation::{
    validate_role, validate_username, MAX_EMAIL_LENGTH, MAX_PERSON_NAME_LENGTH,
    MAX_USERNAME_LENGTH,
};
use yamdb_db::models::user::{CreateUser, UpdateUser, User, UserResponse};
use yamdb_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{Path, Query, ValidJson};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::{PaginationParams, SearchParams};
use crate::response::Page;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(
        length(min = 1, max = MAX_USERNAME_LENGTH),
        custom(function = "validate_username")
    )]
    pub username: String,
    #[validate(email, length(max = MAX_EMAIL_LENGTH))]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = MAX_PERSON_NAME_LENGTH))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = MAX_PERSON_NAME_LENGTH))]
    pub last_name: String,
    #[serde(default)]
    pub bio: String,
    /// Defaults to `user`.
    #[validate(custom(function = "validate_role"))]
    pub role: Option<String>,
}

/// Request body for `PATCH /users/{username}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(
        length(min = 1, max = MAX_USERNAME_LENGTH),
        custom(function = "validate_username")
    )]
    pub username: Option<String>,
    #[validate(email, length(max = MAX_EMAIL_LENGTH))]
    pub email: Option<String>,
    #[validate(length(max = MAX_PERSON_NAME_LENGTH))]
    pub first_name: Option<String>,
    #[validate(length(max = MAX_PERSON_NAME_LENGTH))]
    pub last_name: Option<String>,
    pub bio: Option<String>,
    #[validate(custom(function = "validate_role"))]
    pub role: Option<String>,
}

/// Request body for `PATCH /users/me`. Has no `role`: a `role` key in the
/// body is ignored.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(
        length(min = 1, max = MAX_USERNAME_LENGTH),
        custom(function = "validate_username")
    )]
    pub username: Option<String>,
    #[validate(email, length(max = MAX_EMAIL_LENGTH))]
    pub email: Option<String>,
    #[validate(length(max = MAX_PERSON_NAME_LENGTH))]
    pub first_name: Option<String>,
    #[validate(length(max = MAX_PERSON_NAME_LENGTH))]
    pub last_name: Option<String>,
    pub bio: Option<String>,
}

// ---------------------------------------------------------------------------
// Admin handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/users
///
/// Paginated user list ordered by username, filtered by `?search=`.
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    OriginalUri(uri): OriginalUri,
    Query(search): Query<SearchParams>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<Page<UserResponse>>> {
    let window = page.window();
    let users = UserRepo::list(&state.pool, search.term(), window.limit, window.offset).await?;
    let count = UserRepo::count(&state.pool, search.term()).await?;

    let results = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(Page::new(results, count, window, &uri)))
}

/// POST /api/v1/users
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidJson(input): ValidJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let create_dto = CreateUser {
        username: input.username,
        email: input.email,
        first_name: input.first_name,
        last_name: input.last_name,
        bio: input.bio,
        role: parse_role(input.role.as_deref())?.unwrap_or_default(),
    };

    let user = UserRepo::create(&state.pool, &create_dto).await?;

    tracing::info!(
        user_id = user.id,
        role = %user.role,
        created_by = admin.id(),
        "User created",
    );

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// GET /api/v1/users/{username}
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(username): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let user = find_user(&state, &username).await?;
    Ok(Json(UserResponse::from(user)))
}

/// PATCH /api/v1/users/{username}
///
/// Partial update; admins may change any field including `role`.
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(username): Path<String>,
    ValidJson(input): ValidJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = find_user(&state, &username).await?;

    let update_dto = UpdateUser {
        username: input.username,
        email: input.email,
        first_name: input.first_name,
        last_name: input.last_name,
        bio: input.bio,
        role: parse_role(input.role.as_deref())?,
    };

    let updated = UserRepo::update(&state.pool, user.id, &update_dto)
        .await?
        .ok_or(CoreError::NotFoundByKey {
            entity: "User",
            key: username,
        })?;

    tracing::info!(
        user_id = updated.id,
        role = %updated.role,
        updated_by = admin.id(),
        "User updated",
    );

    Ok(Json(UserResponse::from(updated)))
}

/// DELETE /api/v1/users/{username}
///
/// Removes the account together with its reviews and comments.
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(username): Path<String>,
) -> AppResult<StatusCode> {
    if !UserRepo::delete_by_username(&state.pool, &username).await? {
        return Err(AppError::Core(CoreError::NotFoundByKey {
            entity: "User",
            key: username,
        }));
    }

    tracing::info!(username = %username, deleted_by = admin.id(), "User deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Self-service handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/users/me
pub async fn get_me(auth: AuthUser) -> AppResult<Json<UserResponse>> {
    authorize(Some(&auth.actor), Action::Read, Resource::OwnProfile)?;
    Ok(Json(UserResponse::from(auth.user)))
}

/// PATCH /api/v1/users/me
///
/// Edits the caller's own profile. The role can only be changed by an
/// admin through `/users/{username}`.
pub async fn update_me(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidJson(input): ValidJson<UpdateProfileRequest>,
) -> AppResult<Json<UserResponse>> {
    authorize(Some(&auth.actor), Action::Update, Resource::OwnProfile)?;

    let update_dto = UpdateUser {
        username: input.username,
        email: input.email,
        first_name: input.first_name,
        last_name: input.last_name,
        bio: input.bio,
        role: None,
    };

    let updated = UserRepo::update(&state.pool, auth.id(), &update_dto)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: auth.id(),
        })?;

    tracing::info!(user_id = updated.id, "Profile updated");

    Ok(Json(UserResponse::from(updated)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_user(state: &AppState, username: &str) -> AppResult<User> {
    UserRepo::find_by_username(&state.pool, username)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundByKey {
                entity: "User",
                key: username.to_string(),
            })
        })
}

fn parse_role(role: Option<&str>) -> AppResult<Option<Role>> {
    Ok(role.map(str::parse::<Role>).transpose()?)
}
