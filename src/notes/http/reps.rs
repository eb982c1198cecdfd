use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::notes::{domain::NewNoteData, models::NoteRow};

/// The fields a caller provides to create or replace a note.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePayload {
    pub client_id: i64,
    pub title: String,
    pub content: String,
    pub category: String,
    #[serde(default)]
    pub pinned: bool,
    pub created_by: Option<String>,
}

impl From<NotePayload> for NewNoteData {
    fn from(payload: NotePayload) -> Self {
        Self {
            client_id: payload.client_id,
            title: payload.title,
            content: payload.content,
            category: payload.category,
            pinned: payload.pinned,
            created_by: payload.created_by,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRep {
    pub id: i64,
    pub client_id: i64,
    pub title: String,
    pub content: String,
    pub category: String,
    pub pinned: bool,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&NoteRow> for NoteRep {
    fn from(note: &NoteRow) -> Self {
        Self {
            id: note.id,
            client_id: note.client_id,
            title: note.title.clone(),
            content: note.content.clone(),
            category: note.category.clone(),
            pinned: note.is_pinned,
            created_by: note.created_by.clone(),
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}
