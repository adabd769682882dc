//! Handlers for the `/auth` resource (signup and token exchange).
//!
//! There are no passwords: signup emails a one-time confirmation code, and
//! `POST /auth/token` trades username + code for a JWT.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};
use yamdb_core::confirmation::{generate_code, hash_code, is_expired, verify_code};
use yamdb_core::error::CoreError;
use yamdb_core::validation::{
    field_error, validate_username, MAX_EMAIL_LENGTH, MAX_USERNAME_LENGTH,
};
use yamdb_db::models::user::{CreateUser, User};
use yamdb_db::repositories::UserRepo;

use crate::auth::jwt::generate_access_token;
use crate::error::{AppError, AppResult};
use crate::extract::ValidJson;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/signup`.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(
        length(min = 1, max = MAX_USERNAME_LENGTH),
        custom(function = "validate_username")
    )]
    pub username: String,
    #[validate(email, length(max = MAX_EMAIL_LENGTH))]
    pub email: String,
}

/// Response body for `POST /auth/signup`: echoes the registered identity.
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub username: String,
    pub email: String,
}

/// Request body for `POST /auth/token`.
#[derive(Debug, Deserialize, Validate)]
pub struct TokenRequest {
    #[validate(length(min = 1, max = MAX_USERNAME_LENGTH))]
    pub username: String,
    #[validate(length(min = 1))]
    pub confirmation_code: String,
}

/// Response body for `POST /auth/token`.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/signup
///
/// Registers `(username, email)` or, if exactly that pair already exists,
/// reissues the code. Either way a fresh confirmation code is emailed and
/// any previous code stops working.
pub async fn signup(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<SignupRequest>,
) -> AppResult<Json<SignupResponse>> {
    let user = find_or_register(&state, &input).await?;

    let code = generate_code();
    UserRepo::set_confirmation_code(&state.pool, user.id, &hash_code(&code)).await?;

    state
        .mailer
        .send_confirmation_code(&user.email, &user.username, &code)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to send confirmation code: {e}")))?;

    tracing::info!(user_id = user.id, username = %user.username, "Confirmation code issued");

    Ok(Json(SignupResponse {
        username: user.username,
        email: user.email,
    }))
}

/// POST /api/v1/auth/token
///
/// Exchanges a username and its current confirmation code for an access
/// token. Unknown usernames are 404; a wrong or expired code is a 400.
pub async fn obtain_token(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<TokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    let user = UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or_else(|| CoreError::NotFoundByKey {
            entity: "User",
            key: input.username.clone(),
        })?;

    let code_ok = match (&user.confirmation_code_hash, user.confirmation_code_issued_at) {
        (Some(hash), Some(issued_at)) => {
            verify_code(&input.confirmation_code, hash)
                && !is_expired(
                    issued_at,
                    state.config.confirmation_code_ttl_mins,
                    chrono::Utc::now(),
                )
        }
        _ => false,
    };
    if !code_ok {
        tracing::warn!(user_id = user.id, "Rejected confirmation code");
        return Err(AppError::Validation(field_error(
            "confirmation_code",
            message_error("invalid_code", "Invalid or expired confirmation code"),
        )));
    }

    let token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, "Access token issued");

    Ok(Json(TokenResponse { token }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve the signup pair to an account, creating it when both the
/// username and the email are unused.
async fn find_or_register(state: &AppState, input: &SignupRequest) -> AppResult<User> {
    let by_username = UserRepo::find_by_username(&state.pool, &input.username).await?;
    let by_email = UserRepo::find_by_email(&state.pool, &input.email).await?;

    match (by_username, by_email) {
        (Some(user), Some(other)) if user.id == other.id => Ok(user),
        (None, None) => {
            let user =
                UserRepo::create(&state.pool, &CreateUser::signup(&input.username, &input.email))
                    .await?;
            tracing::info!(user_id = user.id, username = %user.username, "User signed up");
            Ok(user)
        }
        (by_username, by_email) => {
            let mut errors = ValidationErrors::new();
            if by_username.is_some() {
                errors.add(
                    "username",
                    message_error("taken", "A user with this username already exists"),
                );
            }
            if by_email.is_some() {
                errors.add(
                    "email",
                    message_error("taken", "A user with this email already exists"),
                );
            }
            Err(AppError::Validation(errors))
        }
    }
}

fn message_error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}
