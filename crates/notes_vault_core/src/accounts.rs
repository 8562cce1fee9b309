//! crates/notes_vault_core/src/accounts.rs
//!
//! Registration and login on top of the `CredentialStore` port.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use tracing::{error, info, warn};

use crate::domain::{NewUser, User};
use crate::error::{ServiceError, ServiceResult};
use crate::ports::{CredentialStore, PortError};
use crate::token::TokenService;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Input for `AccountService::register`.
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// A user together with a freshly issued bearer token.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub token: String,
}

#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn CredentialStore>,
    tokens: TokenService,
}

impl AccountService {
    pub fn new(store: Arc<dyn CredentialStore>, tokens: TokenService) -> Self {
        Self { store, tokens }
    }

    /// Creates a user and signs them in.
    pub async fn register(&self, registration: Registration) -> ServiceResult<Session> {
        let username = registration.username.trim();
        let email = registration.email.trim().to_lowercase();

        if username.is_empty() {
            return Err(ServiceError::Validation("username is required".into()));
        }
        if username.contains('@') {
            return Err(ServiceError::Validation("username cannot contain '@'".into()));
        }
        if email.is_empty() {
            return Err(ServiceError::Validation("email is required".into()));
        }
        if !email.contains('@') {
            return Err(ServiceError::Validation("email is not valid".into()));
        }
        if registration.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ServiceError::Validation(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let password_hash = hash_password(&registration.password)?;

        let user = self
            .store
            .create_user(NewUser {
                username: username.to_string(),
                email,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                PortError::Duplicate(what) => {
                    warn!("Registration rejected, duplicate {}", what);
                    ServiceError::Duplicate("username or email already registered".into())
                }
                other => other.into(),
            })?;

        info!(user_id = %user.id, "Registered new user");
        let token = self.tokens.issue(user.id);
        Ok(Session { user, token })
    }

    /// Checks a username-or-email plus password and issues a token.
    ///
    /// Every failure other than storage is the same `InvalidCredentials`.
    pub async fn login(&self, identifier: &str, password: &str) -> ServiceResult<Session> {
        let identifier = identifier.trim();
        if identifier.is_empty() || password.is_empty() {
            return Err(ServiceError::InvalidCredentials);
        }

        let credentials = match self.store.find_credentials(identifier).await {
            Ok(credentials) => credentials,
            Err(PortError::NotFound(_)) => return Err(ServiceError::InvalidCredentials),
            Err(e) => return Err(e.into()),
        };

        if !verify_password(password, &credentials.password_hash)? {
            return Err(ServiceError::InvalidCredentials);
        }

        let user = credentials.user;
        let token = self.tokens.issue(user.id);
        Ok(Session { user, token })
    }
}

fn hash_password(password: &str) -> ServiceResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!("Failed to hash password: {:?}", e);
            ServiceError::Storage(PortError::Unexpected("failed to hash password".into()))
        })
}

/// Constant-time comparison is done inside argon2's verifier.
fn verify_password(password: &str, stored_hash: &str) -> ServiceResult<bool> {
    let parsed_hash = PasswordHash::new(stored_hash).map_err(|e| {
        error!("Failed to parse password hash: {:?}", e);
        ServiceError::Storage(PortError::Unexpected("stored password hash is corrupt".into()))
    })?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_salted_and_verifiable() {
        let first = hash_password("correct horse").unwrap();
        let second = hash_password("correct horse").unwrap();
        assert_ne!(first, second);
        assert!(!first.contains("correct horse"));
        assert!(verify_password("correct horse", &first).unwrap());
        assert!(!verify_password("wrong horse", &first).unwrap());
    }

    #[test]
    fn corrupt_hash_is_an_error_not_a_mismatch() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }
}
