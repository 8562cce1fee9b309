pub mod auth;
pub mod extract;
pub mod middleware;
pub mod rest;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use middleware::resolve_identity;
pub use state::AppState;

pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Builds every API route. CORS and Swagger UI are layered on by the binary.
pub fn router(state: Arc<AppState>) -> Router {
    // Routes that never look at a token.
    let public_routes = Router::new()
        .route("/api/users/register", post(auth::register_handler))
        .route("/api/users/login", post(auth::login_handler));

    // Routes whose handlers receive the caller's `Resolution`.
    let identified_routes = Router::new()
        .route("/api/users/me", get(auth::me_handler))
        .route(
            "/api/notes",
            get(rest::list_notes_handler).post(rest::create_note_handler),
        )
        .route(
            "/api/notes/{id}",
            put(rest::update_note_handler).delete(rest::delete_note_handler),
        )
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            resolve_identity,
        ));

    Router::new()
        .route("/health", get(health_handler))
        .merge(public_routes)
        .merge(identified_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
