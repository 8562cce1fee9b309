//! services/api/src/adapters/memory.rs
//!
//! In-process implementation of the storage ports. Used when no
//! `DATABASE_URL` is configured and by the test suites.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use notes_vault_core::domain::{NewUser, Note, NoteId, User, UserCredentials, UserId};
use notes_vault_core::ports::{CredentialStore, NoteRepository, PortError, PortResult};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Users and notes behind one lock each. Notes stay in creation order.
#[derive(Default)]
pub struct InMemoryStore {
    users: RwLock<Vec<UserCredentials>>,
    notes: RwLock<Vec<Note>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes a user without touching their notes.
    pub async fn remove_user(&self, user_id: UserId) -> bool {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|c| c.user.id != user_id);
        users.len() != before
    }
}

#[async_trait]
impl CredentialStore for InMemoryStore {
    async fn create_user(&self, new_user: NewUser) -> PortResult<User> {
        // Held across the check and the push so uniqueness is atomic.
        let mut users = self.users.write().await;

        if users.iter().any(|c| c.user.username == new_user.username) {
            return Err(PortError::Duplicate("username".to_string()));
        }
        let email = new_user.email.to_lowercase();
        if users.iter().any(|c| c.user.email.to_lowercase() == email) {
            return Err(PortError::Duplicate("email".to_string()));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            email: new_user.email,
            created_at: Utc::now(),
        };
        users.push(UserCredentials {
            user: user.clone(),
            password_hash: new_user.password_hash,
        });
        Ok(user)
    }

    async fn get_user(&self, user_id: UserId) -> PortResult<User> {
        self.users
            .read()
            .await
            .iter()
            .find(|c| c.user.id == user_id)
            .map(|c| c.user.clone())
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", user_id)))
    }

    async fn find_credentials(&self, identifier: &str) -> PortResult<UserCredentials> {
        let email = identifier.contains('@').then(|| identifier.to_lowercase());
        self.users
            .read()
            .await
            .iter()
            .find(|c| match &email {
                Some(email) => c.user.email.to_lowercase() == *email,
                None => c.user.username == identifier,
            })
            .cloned()
            .ok_or_else(|| PortError::NotFound("User not found".to_string()))
    }
}

#[async_trait]
impl NoteRepository for InMemoryStore {
    async fn insert_note(&self, note: Note) -> PortResult<Note> {
        let mut notes = self.notes.write().await;
        if notes.iter().any(|n| n.id == note.id) {
            return Err(PortError::Duplicate(format!("Note {}", note.id)));
        }
        notes.push(note.clone());
        Ok(note)
    }

    async fn list_notes(&self) -> PortResult<Vec<Note>> {
        Ok(self.notes.read().await.clone())
    }

    async fn get_note(&self, note_id: NoteId) -> PortResult<Note> {
        self.notes
            .read()
            .await
            .iter()
            .find(|n| n.id == note_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Note {} not found", note_id)))
    }

    async fn update_note(
        &self,
        note_id: NoteId,
        title: &str,
        description: &str,
        updated_at: DateTime<Utc>,
    ) -> PortResult<Note> {
        let mut notes = self.notes.write().await;
        let note = notes
            .iter_mut()
            .find(|n| n.id == note_id)
            .ok_or_else(|| PortError::NotFound(format!("Note {} not found", note_id)))?;
        note.title = title.to_string();
        note.description = description.to_string();
        note.updated_at = updated_at;
        Ok(note.clone())
    }

    async fn delete_note(&self, note_id: NoteId) -> PortResult<()> {
        let mut notes = self.notes.write().await;
        let index = notes
            .iter()
            .position(|n| n.id == note_id)
            .ok_or_else(|| PortError::NotFound(format!("Note {} not found", note_id)))?;
        notes.remove(index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    fn note(title: &str) -> Note {
        let now = Utc::now();
        Note {
            id: Uuid::new_v4(),
            owner_id: None,
            title: title.to_string(),
            description: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn duplicate_username_or_email_stores_nothing() {
        let store = InMemoryStore::new();
        store.create_user(new_user("alice", "alice@example.com")).await.unwrap();

        let err = store
            .create_user(new_user("alice", "other@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::Duplicate(ref f) if f == "username"));

        let err = store
            .create_user(new_user("alicia", "ALICE@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::Duplicate(ref f) if f == "email"));

        assert_eq!(store.users.read().await.len(), 1);
    }

    #[tokio::test]
    async fn credentials_are_found_by_username_or_email() {
        let store = InMemoryStore::new();
        let user = store.create_user(new_user("bob", "bob@example.com")).await.unwrap();

        assert_eq!(store.find_credentials("bob").await.unwrap().user.id, user.id);
        assert_eq!(
            store.find_credentials("Bob@Example.com").await.unwrap().user.id,
            user.id
        );
        assert!(matches!(
            store.find_credentials("robert").await,
            Err(PortError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn non_ascii_emails_compare_case_insensitively() {
        let store = InMemoryStore::new();
        let user = store
            .create_user(new_user("jorg", "jörg@exämple.de"))
            .await
            .unwrap();

        assert_eq!(
            store.find_credentials("JÖRG@EXÄMPLE.DE").await.unwrap().user.id,
            user.id
        );
        let err = store
            .create_user(new_user("joerg", "JÖRG@exämple.de"))
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::Duplicate(ref f) if f == "email"));
    }

    #[tokio::test]
    async fn updates_do_not_reorder_notes() {
        let store = InMemoryStore::new();
        let first = store.insert_note(note("first")).await.unwrap();
        store.insert_note(note("second")).await.unwrap();

        store
            .update_note(first.id, "first, edited", "", Utc::now())
            .await
            .unwrap();

        let titles: Vec<_> = store
            .list_notes()
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, vec!["first, edited", "second"]);
    }

    #[tokio::test]
    async fn missing_notes_are_not_found() {
        let store = InMemoryStore::new();
        let id = Uuid::new_v4();
        assert!(matches!(store.get_note(id).await, Err(PortError::NotFound(_))));
        assert!(matches!(
            store.update_note(id, "t", "d", Utc::now()).await,
            Err(PortError::NotFound(_))
        ));
        assert!(matches!(store.delete_note(id).await, Err(PortError::NotFound(_))));
    }
}
