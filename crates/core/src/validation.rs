//! Field validation rules shared by every write path.
//!
//! The `validate_*` functions plug into `#[validate(custom(function = ...))]`
//! on request DTOs; [`field_error`] and [`check_year`] cover the rules that
//! depend on runtime values.

use std::borrow::Cow;
use std::sync::LazyLock;

use chrono::Datelike;
use regex::Regex;
use validator::{ValidationError, ValidationErrors};

use crate::roles::{Role, VALID_ROLES};

/// Maximum length of a category, genre, or title name.
pub const MAX_NAME_LENGTH: u64 = 256;

/// Maximum length of a category or genre slug.
pub const MAX_SLUG_LENGTH: u64 = 50;

/// Maximum length of a username.
pub const MAX_USERNAME_LENGTH: u64 = 150;

/// Maximum length of an email address.
pub const MAX_EMAIL_LENGTH: u64 = 254;

/// Maximum length of a first or last name.
pub const MAX_PERSON_NAME_LENGTH: u64 = 150;

/// Lowest accepted review score.
pub const MIN_REVIEW_SCORE: i16 = 1;

/// Highest accepted review score.
pub const MAX_REVIEW_SCORE: i16 = 10;

/// Username reserved for the self-service profile endpoint.
pub const RESERVED_USERNAME: &str = "me";

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+\z").expect("valid regex"));

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+\z").expect("valid regex"));

fn error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Letters, digits and `.@+-_` only, and never the reserved `me`.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username == RESERVED_USERNAME {
        return Err(error(
            "reserved_username",
            format!("Username '{RESERVED_USERNAME}' is not allowed"),
        ));
    }
    if !USERNAME_RE.is_match(username) {
        return Err(error(
            "invalid_username",
            "Username may contain only letters, digits and @/./+/-/_ characters",
        ));
    }
    Ok(())
}

/// Latin letters, digits, hyphen and underscore.
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if !SLUG_RE.is_match(slug) {
        return Err(error(
            "invalid_slug",
            "Slug may contain only latin letters, digits, hyphens and underscores",
        ));
    }
    Ok(())
}

/// One of the known role names (`user`, `moderator`, `admin`).
pub fn validate_role(role: &str) -> Result<(), ValidationError> {
    if role.parse::<Role>().is_err() {
        return Err(error(
            "invalid_role",
            format!("'{role}' is not a valid role. Must be one of: {}", VALID_ROLES.join(", ")),
        ));
    }
    Ok(())
}

/// Text bodies (reviews, comments) must contain something besides whitespace.
pub fn validate_not_blank(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(error("blank", "This field may not be blank"));
    }
    Ok(())
}

/// The current calendar year (UTC).
pub fn current_year() -> i32 {
    chrono::Utc::now().year()
}

/// A release year may not lie in the future.
pub fn check_year(year: i32, current_year: i32) -> Result<(), ValidationError> {
    if year > current_year {
        return Err(error(
            "year_in_future",
            format!("Year cannot be greater than the current year ({current_year})"),
        ));
    }
    Ok(())
}

/// Wrap a single field error into a [`ValidationErrors`] collection.
pub fn field_error(field: &'static str, err: ValidationError) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(field, err);
    errors
}
