//! User roles.
//!
//! The string forms must match the `ck_users_role` CHECK constraint in
//! `20260301000001_create_users.sql`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_USER: &str = "user";
pub const ROLE_MODERATOR: &str = "moderator";
pub const ROLE_ADMIN: &str = "admin";

/// All valid role values, lowest privilege first.
pub const VALID_ROLES: &[&str] = &[ROLE_USER, ROLE_MODERATOR, ROLE_ADMIN];

/// Authorization tier of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Moderator,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => ROLE_USER,
            Role::Moderator => ROLE_MODERATOR,
            Role::Admin => ROLE_ADMIN,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_USER => Ok(Role::User),
            ROLE_MODERATOR => Ok(Role::Moderator),
            ROLE_ADMIN => Ok(Role::Admin),
            other => Err(CoreError::Validation(format!(
                "Invalid role '{other}'. Must be one of: {}",
                VALID_ROLES.join(", ")
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_valid_role() {
        for name in VALID_ROLES {
            let role: Role = name.parse().unwrap();
            assert_eq!(role.as_str(), *name);
        }
    }

    #[test]
    fn rejects_unknown_role() {
        let err = "superadmin".parse::<Role>().unwrap_err();
        assert!(err.to_string().contains("Invalid role 'superadmin'"));
    }

    #[test]
    fn role_names_are_case_sensitive() {
        assert!("Admin".parse::<Role>().is_err());
    }

    #[test]
    fn default_role_is_user() {
        assert_eq!(Role::default(), Role::User);
    }
}
