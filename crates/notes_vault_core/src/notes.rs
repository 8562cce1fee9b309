//! crates/notes_vault_core/src/notes.rs
//!
//! The ownership and visibility policy for notes.
//!
//! Reading is public; every mutation is owner-gated. Existence is checked
//! before ownership, so a missing note is `NotFound` for every caller.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{Identity, Note, NoteId, UserId};
use crate::error::{ServiceError, ServiceResult};
use crate::policy::{Operation, Resolution};
use crate::ports::NoteRepository;

/// Title and description as submitted by a client.
#[derive(Debug, Clone)]
pub struct NoteDraft {
    pub title: String,
    pub description: String,
}

impl NoteDraft {
    fn validated(self) -> ServiceResult<Self> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ServiceError::Validation("title is required".into()));
        }
        Ok(Self {
            title: title.to_string(),
            description: self.description,
        })
    }
}

#[derive(Clone)]
pub struct NoteService {
    repo: Arc<dyn NoteRepository>,
}

impl NoteService {
    pub fn new(repo: Arc<dyn NoteRepository>) -> Self {
        Self { repo }
    }

    /// Lists every note in creation order, optionally filtered by `search`.
    ///
    /// Filtering runs after retrieval and matches the query as given. An
    /// empty or whitespace-only query returns everything.
    pub async fn list(&self, caller: &Resolution, search: Option<&str>) -> ServiceResult<Vec<Note>> {
        caller.identity_for(Operation::ListNotes)?;

        let notes = self.repo.list_notes().await?;
        let notes = match search.filter(|q| !q.trim().is_empty()) {
            Some(query) => notes.into_iter().filter(|n| n.matches(query)).collect(),
            None => notes,
        };
        Ok(notes)
    }

    pub async fn create(&self, caller: &Resolution, draft: NoteDraft) -> ServiceResult<Note> {
        let owner = self.acting_user(caller, Operation::CreateNote)?;
        let draft = draft.validated()?;

        let now = Utc::now();
        let note = self
            .repo
            .insert_note(Note {
                id: Uuid::new_v4(),
                owner_id: Some(owner),
                title: draft.title,
                description: draft.description,
                created_at: now,
                updated_at: now,
            })
            .await?;

        info!(note_id = %note.id, owner_id = %owner, "Created note");
        Ok(note)
    }

    pub async fn update(
        &self,
        caller: &Resolution,
        note_id: NoteId,
        draft: NoteDraft,
    ) -> ServiceResult<Note> {
        let user = self.acting_user(caller, Operation::UpdateNote)?;
        self.owned_note(user, note_id).await?;
        let draft = draft.validated()?;

        let note = self
            .repo
            .update_note(note_id, &draft.title, &draft.description, Utc::now())
            .await?;
        info!(%note_id, "Updated note");
        Ok(note)
    }

    pub async fn delete(&self, caller: &Resolution, note_id: NoteId) -> ServiceResult<()> {
        let user = self.acting_user(caller, Operation::DeleteNote)?;
        self.owned_note(user, note_id).await?;

        self.repo.delete_note(note_id).await?;
        info!(%note_id, "Deleted note");
        Ok(())
    }

    fn acting_user(&self, caller: &Resolution, operation: Operation) -> ServiceResult<UserId> {
        match caller.identity_for(operation)? {
            Identity::User(id) => Ok(id),
            Identity::Anonymous => Err(ServiceError::Unauthorized),
        }
    }

    /// Fetches the note and checks that `user` may mutate it.
    ///
    /// Notes without an owner predate ownership and are open to any
    /// authenticated user. Mutating them never assigns an owner.
    async fn owned_note(&self, user: UserId, note_id: NoteId) -> ServiceResult<Note> {
        let note = self.repo.get_note(note_id).await?;
        match note.owner_id {
            Some(owner) if owner != user => {
                warn!(%note_id, %user, "Rejected mutation of another user's note");
                Err(ServiceError::Forbidden)
            }
            _ => Ok(note),
        }
    }
}
