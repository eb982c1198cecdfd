//! Queries for client notes. They never modify data.

pub mod postgres;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use super::{domain::NoteCategory, models::NoteRow};

/// Query parameters for listing a client's notes.
#[derive(Default)]
pub struct NoteQuery {
    /// The account holder whose client's notes are listed.
    pub user_id: i64,
    pub client_id: i64,
    /// Restrict the list to one category.
    pub category: Option<NoteCategory>,
    /// Restrict the list to pinned notes.
    pub pinned_only: bool,
    /// Restrict the list to notes whose title or content contains this text,
    /// case-insensitively.
    pub search: Option<String>,
}

pub type DynNoteQueries = Arc<dyn NoteQueries + Send + Sync>;

#[async_trait]
pub trait NoteQueries {
    /// Get a single note by ID, scoped to its owning account holder.
    async fn get_note(&self, user_id: i64, note_id: i64) -> Result<Option<NoteRow>>;

    /// List the notes matching the provided query, pinned first and newest
    /// first within each group.
    async fn list_notes(&self, query: NoteQuery) -> Result<Vec<NoteRow>>;
}
