//! crates/notes_vault_core/src/lib.rs
//!
//! Core domain for the notes service: types, storage ports and the
//! account, token and note policies built on them.

pub mod accounts;
pub mod domain;
pub mod error;
pub mod guard;
pub mod notes;
pub mod policy;
pub mod ports;
pub mod token;

pub use accounts::{AccountService, Registration, Session};
pub use domain::{Identity, NewUser, Note, NoteId, User, UserCredentials, UserId};
pub use error::{ServiceError, ServiceResult};
pub use guard::AuthorizationGuard;
pub use notes::{NoteDraft, NoteService};
pub use policy::{AuthPolicy, Operation, Resolution};
pub use ports::{CredentialStore, NoteRepository, PortError, PortResult};
pub use token::{TokenError, TokenService};
