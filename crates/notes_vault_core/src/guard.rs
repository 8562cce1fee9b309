//! crates/notes_vault_core/src/guard.rs
//!
//! Resolves the acting identity of a request from its optional bearer token.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::ServiceResult;
use crate::policy::Resolution;
use crate::ports::{CredentialStore, PortError};
use crate::token::TokenService;

#[derive(Clone)]
pub struct AuthorizationGuard {
    tokens: TokenService,
    credentials: Arc<dyn CredentialStore>,
}

impl AuthorizationGuard {
    pub fn new(tokens: TokenService, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            tokens,
            credentials,
        }
    }

    /// Verifies the token (pure) and then confirms the user still exists.
    ///
    /// Only storage failures surface as errors; every token problem is
    /// reported through the returned `Resolution`.
    pub async fn resolve(&self, bearer: Option<&str>) -> ServiceResult<Resolution> {
        let Some(token) = bearer else {
            return Ok(Resolution::Anonymous);
        };

        let user_id = match self.tokens.verify(token) {
            Ok(user_id) => user_id,
            Err(reason) => {
                debug!("Rejected bearer token: {}", reason);
                return Ok(Resolution::InvalidToken(reason));
            }
        };

        match self.credentials.get_user(user_id).await {
            Ok(user) => Ok(Resolution::Authenticated(user)),
            Err(PortError::NotFound(_)) => {
                warn!(%user_id, "Valid token for a user that no longer exists");
                Ok(Resolution::UnknownUser(user_id))
            }
            Err(e) => Err(e.into()),
        }
    }
}
