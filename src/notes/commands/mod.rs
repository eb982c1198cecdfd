//! Write-side operations on client notes.

pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use super::{domain::NewNote, models::NoteRow};

#[derive(Debug, Error)]
pub enum NoteCommandError {
    /// The referenced client does not exist or belongs to another account
    /// holder.
    #[error("Client not found")]
    ClientNotFound,
    #[error("Note not found")]
    NoteNotFound,
    #[error(transparent)]
    Database(#[from] anyhow::Error),
}

impl From<sqlx::Error> for NoteCommandError {
    fn from(error: sqlx::Error) -> Self {
        Self::Database(error.into())
    }
}

pub type DynNoteCommands = Arc<dyn NoteCommands + Send + Sync>;

#[async_trait]
pub trait NoteCommands {
    /// Persist a new note against one of the account holder's clients.
    async fn create_note(&self, user_id: i64, note: NewNote)
        -> Result<NoteRow, NoteCommandError>;

    /// Replace a note's title, content, category, and pinned flag. Creation
    /// metadata is preserved.
    async fn update_note(
        &self,
        user_id: i64,
        note_id: i64,
        update: NewNote,
    ) -> Result<NoteRow, NoteCommandError>;

    /// Flip a note's pinned flag.
    async fn toggle_note_pinned(
        &self,
        user_id: i64,
        note_id: i64,
    ) -> Result<NoteRow, NoteCommandError>;

    /// Delete a note. Deleting a row that does not exist (or is not visible
    /// to the account holder) is not an error.
    async fn delete_note(&self, user_id: i64, note_id: i64) -> anyhow::Result<()>;
}
