//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the note endpoints and the master
//! definition for the OpenAPI specification.

use crate::error::{ApiError, ErrorResponse};
use crate::web::auth::{self, AuthResponse, LoginRequest, RegisterRequest, UserResponse};
use crate::web::extract::{ApiJson, ApiPath};
use crate::web::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use chrono::{DateTime, Utc};
use notes_vault_core::{Note, NoteDraft, Resolution};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    IntoParams, Modify, OpenApi, ToSchema,
};
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register_handler,
        auth::login_handler,
        auth::me_handler,
        list_notes_handler,
        create_note_handler,
        update_note_handler,
        delete_note_handler,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            UserResponse,
            NotePayload,
            NoteResponse,
            ErrorResponse
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "users", description = "Registration, login and the current user."),
        (name = "notes", description = "Publicly readable, owner-mutable notes.")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListNotesQuery {
    /// Case-insensitive substring matched against title and description.
    pub search: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct NotePayload {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl From<NotePayload> for NoteDraft {
    fn from(payload: NotePayload) -> Self {
        NoteDraft {
            title: payload.title,
            description: payload.description,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    pub id: Uuid,
    pub owner_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            owner_id: note.owner_id,
            title: note.title,
            description: note.description,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// List all notes, optionally filtered.
///
/// No authentication required. An invalid or expired token is ignored.
#[utoipa::path(
    get,
    path = "/api/notes",
    params(ListNotesQuery),
    responses(
        (status = 200, description = "Notes in creation order", body = [NoteResponse])
    ),
    tag = "notes"
)]
pub async fn list_notes_handler(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Resolution>,
    Query(query): Query<ListNotesQuery>,
) -> Result<Json<Vec<NoteResponse>>, ApiError> {
    let notes = state.notes.list(&caller, query.search.as_deref()).await?;
    Ok(Json(notes.into_iter().map(NoteResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/notes",
    request_body = NotePayload,
    responses(
        (status = 201, description = "Note created", body = NoteResponse),
        (status = 400, description = "Title missing", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "notes"
)]
pub async fn create_note_handler(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Resolution>,
    ApiJson(payload): ApiJson<NotePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let note = state.notes.create(&caller, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(NoteResponse::from(note))))
}

#[utoipa::path(
    put,
    path = "/api/notes/{id}",
    params(("id" = Uuid, Path, description = "Note id")),
    request_body = NotePayload,
    responses(
        (status = 200, description = "Note updated", body = NoteResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 403, description = "Note belongs to another user", body = ErrorResponse),
        (status = 404, description = "No such note", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "notes"
)]
pub async fn update_note_handler(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Resolution>,
    ApiPath(note_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<NotePayload>,
) -> Result<Json<NoteResponse>, ApiError> {
    let note = state.notes.update(&caller, note_id, payload.into()).await?;
    Ok(Json(NoteResponse::from(note)))
}

#[utoipa::path(
    delete,
    path = "/api/notes/{id}",
    params(("id" = Uuid, Path, description = "Note id")),
    responses(
        (status = 204, description = "Note deleted"),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 403, description = "Note belongs to another user", body = ErrorResponse),
        (status = 404, description = "No such note", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "notes"
)]
pub async fn delete_note_handler(
    State(state): State<Arc<AppState>>,
    Extension(caller): Extension<Resolution>,
    ApiPath(note_id): ApiPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.notes.delete(&caller, note_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
