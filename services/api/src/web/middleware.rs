//! services/api/src/web/middleware.rs
//!
//! Identity resolution middleware.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use notes_vault_core::{Resolution, TokenError};
use std::sync::Arc;

use crate::error::ApiError;
use crate::web::state::AppState;

/// What the `Authorization` header carried.
#[derive(Debug, PartialEq, Eq)]
pub enum BearerHeader {
    Absent,
    Token(String),
    /// Present but not of the form `Bearer <token>`.
    Malformed,
}

pub fn bearer_header(headers: &HeaderMap) -> BearerHeader {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return BearerHeader::Absent;
    };
    let token = value.to_str().ok().and_then(|v| {
        let (scheme, token) = v.trim().split_once(' ')?;
        let token = token.trim();
        (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| token.to_string())
    });
    token.map_or(BearerHeader::Malformed, BearerHeader::Token)
}

/// Middleware that resolves the caller's identity from the bearer token.
///
/// Never rejects a request on its own: the `Resolution` is inserted into the
/// request extensions and each operation's policy decides what it means.
/// Only a storage failure while looking the user up ends the request here.
pub async fn resolve_identity(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let resolution = match bearer_header(req.headers()) {
        BearerHeader::Absent => Resolution::Anonymous,
        BearerHeader::Token(token) => state.guard.resolve(Some(&token)).await?,
        BearerHeader::Malformed => Resolution::InvalidToken(TokenError::Malformed),
    };

    req.extensions_mut().insert(resolution);
    Ok(next.run(req).await)
}
