//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use chrono::Duration;
use notes_vault_core::{
    AccountService, AuthorizationGuard, CredentialStore, NoteRepository, NoteService,
    TokenService,
};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
///
/// Holds no per-user session data: every request rebuilds its identity from
/// its own bearer token.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub guard: AuthorizationGuard,
    pub accounts: AccountService,
    pub notes: NoteService,
}

impl AppState {
    /// Wires the core services to the given storage adapters.
    pub fn new(
        config: Arc<Config>,
        credentials: Arc<dyn CredentialStore>,
        notes: Arc<dyn NoteRepository>,
    ) -> Self {
        let tokens = TokenService::new(
            config.token_secret.as_bytes(),
            Duration::hours(config.token_ttl_hours),
        );
        Self {
            guard: AuthorizationGuard::new(tokens.clone(), credentials.clone()),
            accounts: AccountService::new(credentials, tokens),
            notes: NoteService::new(notes),
            config,
        }
    }
}
