//! User entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use yamdb_core::error::CoreError;
use yamdb_core::permissions::Actor;
use yamdb_core::roles::Role;
use yamdb_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the confirmation code hash -- NEVER serialize this to API
/// responses directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub role: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub confirmation_code_hash: Option<String>,
    pub confirmation_code_issued_at: Option<Timestamp>,
    pub date_joined: Timestamp,
}

impl User {
    /// Parsed role. The `ck_users_role` constraint makes failure a data bug.
    pub fn role(&self) -> Result<Role, CoreError> {
        self.role
            .parse()
            .map_err(|_| CoreError::Internal(format!("User {} has unknown role", self.id)))
    }

    /// The authorization view of this user.
    pub fn actor(&self) -> Result<Actor, CoreError> {
        Ok(Actor {
            user_id: self.id,
            role: self.role()?,
            is_staff: self.is_staff,
            is_superuser: self.is_superuser,
        })
    }
}

/// Safe user representation for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub role: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            bio: user.bio,
            role: user.role,
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub role: Role,
}

impl CreateUser {
    /// A plain `user`-role account with empty profile fields, as created by
    /// self-service signup.
    pub fn signup(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            first_name: String::new(),
            last_name: String::new(),
            bio: String::new(),
            role: Role::User,
        }
    }
}

/// DTO for updating an existing user. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub role: Option<Role>,
}
