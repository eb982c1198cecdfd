use chrono::{DateTime, Utc};

/// A note row as stored.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct NoteRow {
    pub id: i64,
    pub client_id: i64,
    pub title: String,
    pub content: String,
    pub category: String,
    pub is_pinned: bool,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
