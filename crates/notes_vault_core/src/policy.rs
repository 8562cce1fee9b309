//! crates/notes_vault_core/src/policy.rs
//!
//! Declarative per-operation authentication policy.
//!
//! The guard only resolves who a request claims to be; what an absent or
//! broken identity means is decided here, once, per operation.

use crate::domain::{Identity, User, UserId};
use crate::error::{ServiceError, ServiceResult};
use crate::token::TokenError;

/// Whether an operation may run for an anonymous caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPolicy {
    /// Any failure to authenticate degrades to `Identity::Anonymous`.
    Optional,
    /// Any failure to authenticate is `ServiceError::Unauthorized`.
    Required,
}

/// Every operation the core exposes to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListNotes,
    CreateNote,
    UpdateNote,
    DeleteNote,
    CurrentUser,
}

impl Operation {
    pub const fn auth_policy(self) -> AuthPolicy {
        match self {
            Operation::ListNotes => AuthPolicy::Optional,
            Operation::CreateNote
            | Operation::UpdateNote
            | Operation::DeleteNote
            | Operation::CurrentUser => AuthPolicy::Required,
        }
    }
}

/// What the guard learned from a request's bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No token was presented.
    Anonymous,
    /// Valid token for a user that still exists.
    Authenticated(User),
    /// A token was presented but did not verify.
    InvalidToken(TokenError),
    /// Valid token whose user no longer exists.
    UnknownUser(UserId),
}

impl Resolution {
    /// Applies the operation's policy and yields the acting identity.
    pub fn identity_for(&self, operation: Operation) -> ServiceResult<Identity> {
        match (self, operation.auth_policy()) {
            (Resolution::Authenticated(user), _) => Ok(Identity::User(user.id)),
            (_, AuthPolicy::Optional) => Ok(Identity::Anonymous),
            (_, AuthPolicy::Required) => Err(ServiceError::Unauthorized),
        }
    }

    /// The authenticated user, for operations that need more than the id.
    pub fn authenticated_user(&self) -> ServiceResult<&User> {
        match self {
            Resolution::Authenticated(user) => Ok(user),
            _ => Err(ServiceError::Unauthorized),
        }
    }
}
