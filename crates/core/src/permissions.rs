//! Authorization policy.
//!
//! Every permission decision in the service goes through [`is_permitted`]:
//! handlers describe *who* (an optional [`Actor`]; `None` is an anonymous
//! caller), *what* ([`Action`]) and *on which* ([`Resource`]), and get a
//! yes/no answer. [`authorize`] wraps the answer in the error the HTTP layer
//! expects.

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::DbId;

/// The authenticated caller of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: DbId,
    pub role: Role,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl Actor {
    /// Admin tier: the `admin` role, or any staff/superuser account
    /// regardless of its role.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin || self.is_staff || self.is_superuser
    }

    pub fn is_moderator(&self) -> bool {
        self.role == Role::Moderator
    }

    /// Whether this actor may edit or delete content written by `author_id`.
    pub fn can_moderate(&self, author_id: DbId) -> bool {
        self.user_id == author_id || self.is_moderator() || self.is_admin()
    }
}

/// What the caller wants to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
}

impl Action {
    /// Safe actions never change state.
    pub fn is_safe(self) -> bool {
        matches!(self, Action::Read)
    }
}

/// The resource an action targets.
///
/// For authored content `author_id` is `None` when the action targets the
/// collection (listing or creating) rather than an existing item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Category,
    Genre,
    Title,
    Review { author_id: Option<DbId> },
    Comment { author_id: Option<DbId> },
    /// Any user account managed through `/users/`.
    UserAccount,
    /// The caller's own account, through `/users/me/`.
    OwnProfile,
}

/// Decide whether `actor` may perform `action` on `resource`.
pub fn is_permitted(actor: Option<&Actor>, action: Action, resource: Resource) -> bool {
    match resource {
        Resource::Category | Resource::Genre | Resource::Title => {
            action.is_safe() || actor.is_some_and(Actor::is_admin)
        }
        Resource::Review { author_id } | Resource::Comment { author_id } => {
            if action.is_safe() {
                return true;
            }
            let Some(actor) = actor else {
                return false;
            };
            match (action, author_id) {
                (Action::Create, _) => true,
                (_, Some(author_id)) => actor.can_moderate(author_id),
                (_, None) => actor.is_moderator() || actor.is_admin(),
            }
        }
        Resource::UserAccount => actor.is_some_and(Actor::is_admin),
        Resource::OwnProfile => {
            actor.is_some() && matches!(action, Action::Read | Action::Update)
        }
    }
}

/// Shorthand for "may this actor change this resource".
pub fn can_modify(actor: &Actor, resource: Resource) -> bool {
    is_permitted(Some(actor), Action::Update, resource)
}

/// Like [`is_permitted`], but returns the error to surface on denial:
/// anonymous callers get `Unauthorized`, authenticated ones `Forbidden`.
pub fn authorize(
    actor: Option<&Actor>,
    action: Action,
    resource: Resource,
) -> Result<(), CoreError> {
    if is_permitted(actor, action, resource) {
        return Ok(());
    }
    match actor {
        None => Err(CoreError::Unauthorized(
            "Authentication credentials were not provided".into(),
        )),
        Some(_) => Err(CoreError::Forbidden(
            "You do not have permission to perform this action".into(),
        )),
    }
}
