use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use validator::{ValidationError, ValidationErrors};
use yamdb_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `yamdb_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Per-field input validation failures.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A request path that names no resource.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::NotFoundByKey { entity, key } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} '{key}' not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Field validation ---
            AppError::Validation(errors) => {
                let body = json!({
                    "error": "Invalid input",
                    "code": "VALIDATION_ERROR",
                    "fields": field_messages(errors),
                });
                return (StatusCode::BAD_REQUEST, axum::Json(body)).into_response();
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Flatten [`ValidationErrors`] into `{ field: [message, ...] }`.
fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| (field.to_string(), errs.iter().map(describe).collect()))
        .collect()
}

/// Human-readable text for one failed rule. Custom rules carry their own
/// message; the built-in validators only carry a code and params.
fn describe(err: &ValidationError) -> String {
    if let Some(message) = &err.message {
        return message.to_string();
    }
    let param = |name: &str| {
        err.params.get(name).map(|value| match value.as_f64() {
            Some(n) if n.fract() == 0.0 => (n as i64).to_string(),
            _ => value.to_string(),
        })
    };
    match err.code.as_ref() {
        "length" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => {
                format!("Ensure this field has between {min} and {max} characters")
            }
            (Some(min), None) => format!("Ensure this field has at least {min} characters"),
            (None, Some(max)) => format!("Ensure this field has no more than {max} characters"),
            (None, None) => "Invalid length".to_string(),
        },
        "range" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => format!("Ensure this value is between {min} and {max}"),
            _ => "Value out of range".to_string(),
        },
        "email" => "Enter a valid email address".to_string(),
        other => other.to_string(),
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Foreign key violations map to 409 (the row is still referenced, or the
///   referenced row vanished mid-request).
/// - Check constraint violations map to 400.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            match db_err.code().as_deref() {
                // PostgreSQL unique_violation
                Some("23505") if constraint.starts_with("uq_") => {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
                // foreign_key_violation
                Some("23503") => {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Operation violates reference constraint: {constraint}"),
                    );
                }
                // check_violation
                Some("23514") => {
                    return (
                        StatusCode::BAD_REQUEST,
                        "VALIDATION_ERROR",
                        format!("Value violates check constraint: {constraint}"),
                    );
                }
                _ => {}
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;

    #[derive(Validate)]
    struct Input {
        #[validate(length(max = 3))]
        name: String,
        #[validate(range(min = 1, max = 10))]
        score: i16,
    }

    #[test]
    fn builtin_rules_get_readable_messages() {
        let errors = Input {
            name: "long".into(),
            score: 11,
        }
        .validate()
        .unwrap_err();

        let fields = field_messages(&errors);
        assert_eq!(
            fields["name"],
            vec!["Ensure this field has no more than 3 characters"]
        );
        assert_eq!(fields["score"], vec!["Ensure this value is between 1 and 10"]);
    }

    #[test]
    fn custom_message_wins() {
        let mut err = ValidationError::new("blank");
        err.message = Some("This field may not be blank".into());
        assert_eq!(describe(&err), "This field may not be blank");
    }

    #[test]
    fn validation_errors_respond_400() {
        let mut errors = ValidationErrors::new();
        errors.add("email", ValidationError::new("email"));
        let response = AppError::from(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn core_errors_map_to_statuses() {
        let cases = [
            (CoreError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (CoreError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (CoreError::Conflict("x".into()), StatusCode::CONFLICT),
            (
                CoreError::NotFoundByKey {
                    entity: "User",
                    key: "ghost".into(),
                },
                StatusCode::NOT_FOUND,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).into_response().status(), status);
        }
    }
}
