//! services/api/src/adapters/db.rs
//!
//! This module contains the PostgreSQL adapter, the concrete implementation
//! of the `CredentialStore` and `NoteRepository` ports from the core crate.
//! It handles all interactions with the database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use notes_vault_core::domain::{NewUser, Note, NoteId, User, UserCredentials, UserId};
use notes_vault_core::ports::{CredentialStore, NoteRepository, PortError, PortResult};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the storage ports.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            id: self.id,
            username: self.username,
            email: self.email,
            created_at: self.created_at,
        }
    }

    fn to_credentials(self) -> UserCredentials {
        let UserRecord {
            id,
            username,
            email,
            password_hash,
            created_at,
        } = self;
        UserCredentials {
            user: User {
                id,
                username,
                email,
                created_at,
            },
            password_hash,
        }
    }
}

#[derive(FromRow)]
struct NoteRecord {
    id: Uuid,
    owner_id: Option<Uuid>,
    title: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl NoteRecord {
    fn to_domain(self) -> Note {
        Note {
            id: self.id,
            owner_id: self.owner_id,
            title: self.title,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const USER_COLUMNS: &str = "id, username, email, password_hash, created_at";
const NOTE_COLUMNS: &str = "id, owner_id, title, description, created_at, updated_at";

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

fn not_found(what: String) -> impl FnOnce(sqlx::Error) -> PortError {
    move |e| match e {
        sqlx::Error::RowNotFound => PortError::NotFound(what),
        _ => unexpected(e),
    }
}

//=========================================================================================
// `CredentialStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl CredentialStore for DbAdapter {
    async fn create_user(&self, new_user: NewUser) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "INSERT INTO users (id, username, email, password_hash) VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let constraint = e
                .as_database_error()
                .filter(|db| db.is_unique_violation())
                .map(|db| db.constraint().unwrap_or_default().to_string());
            match constraint {
                Some(c) if c.contains("email") => PortError::Duplicate("email".to_string()),
                Some(_) => PortError::Duplicate("username".to_string()),
                None => unexpected(e),
            }
        })?;
        Ok(record.to_domain())
    }

    async fn get_user(&self, user_id: UserId) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found(format!("User {} not found", user_id)))?;
        Ok(record.to_domain())
    }

    async fn find_credentials(&self, identifier: &str) -> PortResult<UserCredentials> {
        let query = if identifier.contains('@') {
            format!("SELECT {USER_COLUMNS} FROM users WHERE email = lower($1)")
        } else {
            format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1")
        };
        let record = sqlx::query_as::<_, UserRecord>(&query)
            .bind(identifier)
            .fetch_one(&self.pool)
            .await
            .map_err(not_found("User not found".to_string()))?;
        Ok(record.to_credentials())
    }
}

//=========================================================================================
// `NoteRepository` Trait Implementation
//=========================================================================================

#[async_trait]
impl NoteRepository for DbAdapter {
    async fn insert_note(&self, note: Note) -> PortResult<Note> {
        let record = sqlx::query_as::<_, NoteRecord>(&format!(
            "INSERT INTO notes (id, owner_id, title, description, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {NOTE_COLUMNS}"
        ))
        .bind(note.id)
        .bind(note.owner_id)
        .bind(&note.title)
        .bind(&note.description)
        .bind(note.created_at)
        .bind(note.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn list_notes(&self) -> PortResult<Vec<Note>> {
        let records = sqlx::query_as::<_, NoteRecord>(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes ORDER BY seq ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        let notes = records.into_iter().map(|r| r.to_domain()).collect();
        Ok(notes)
    }

    async fn get_note(&self, note_id: NoteId) -> PortResult<Note> {
        let record = sqlx::query_as::<_, NoteRecord>(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes WHERE id = $1"
        ))
        .bind(note_id)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found(format!("Note {} not found", note_id)))?;
        Ok(record.to_domain())
    }

    async fn update_note(
        &self,
        note_id: NoteId,
        title: &str,
        description: &str,
        updated_at: DateTime<Utc>,
    ) -> PortResult<Note> {
        let record = sqlx::query_as::<_, NoteRecord>(&format!(
            "UPDATE notes SET title = $1, description = $2, updated_at = $3 WHERE id = $4 RETURNING {NOTE_COLUMNS}"
        ))
        .bind(title)
        .bind(description)
        .bind(updated_at)
        .bind(note_id)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found(format!("Note {} not found", note_id)))?;
        Ok(record.to_domain())
    }

    async fn delete_note(&self, note_id: NoteId) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(note_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Note {} not found", note_id)));
        }
        Ok(())
    }
}
