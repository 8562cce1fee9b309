//! crates/notes_vault_core/src/error.rs
//!
//! The error taxonomy every core operation resolves into.

use crate::ports::PortError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A required field is missing or empty.
    #[error("{0}")]
    Validation(String),

    /// Username or email collision at registration.
    #[error("{0}")]
    Duplicate(String),

    /// Login failure. Never says which half of the credentials was wrong.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Authentication required")]
    Unauthorized,

    #[error("You do not own this note")]
    Forbidden,

    #[error("{0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(PortError),
}

impl From<PortError> for ServiceError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound(what) => ServiceError::NotFound(what),
            PortError::Duplicate(what) => ServiceError::Duplicate(what),
            other => ServiceError::Storage(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
