//! crates/notes_vault_core/src/ports.rs
//!
//! Defines the storage contracts (traits) the core depends on.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the concrete persistence engine.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{NewUser, Note, NoteId, User, UserCredentials, UserId};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from the storage backend.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Already exists: {0}")]
    Duplicate(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Storage Ports (Traits)
//=========================================================================================

/// Persists user identities.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Inserts a new user. Fails with `PortError::Duplicate` when the username
    /// or the email is already taken, in which case nothing is stored.
    async fn create_user(&self, new_user: NewUser) -> PortResult<User>;

    async fn get_user(&self, user_id: UserId) -> PortResult<User>;

    /// Looks a user up by email (case-insensitive) when `identifier` contains
    /// an `@`, by username otherwise.
    async fn find_credentials(&self, identifier: &str) -> PortResult<UserCredentials>;
}

/// Persists notes keyed by id. Listing returns creation order.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    async fn insert_note(&self, note: Note) -> PortResult<Note>;

    async fn list_notes(&self) -> PortResult<Vec<Note>>;

    async fn get_note(&self, note_id: NoteId) -> PortResult<Note>;

    /// Overwrites title and description (last write wins). Does not move the
    /// note in listing order.
    async fn update_note(
        &self,
        note_id: NoteId,
        title: &str,
        description: &str,
        updated_at: DateTime<Utc>,
    ) -> PortResult<Note>;

    async fn delete_note(&self, note_id: NoteId) -> PortResult<()>;
}
