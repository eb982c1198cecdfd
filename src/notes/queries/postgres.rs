use anyhow::Result;
use async_trait::async_trait;
use sqlx::{FromRow, Postgres, QueryBuilder};
use tracing::trace;

use crate::{database::PostgresConnection, notes::models};

use super::{NoteQueries, NoteQuery};

const NOTE_COLUMNS: &str = r#"
    n.id,
    n.client_id,
    n.title,
    n.content,
    n.category,
    n.is_pinned,
    n.created_by,
    n.created_at,
    n.updated_at
"#;

#[async_trait]
impl NoteQueries for PostgresConnection {
    async fn get_note(&self, user_id: i64, note_id: i64) -> Result<Option<models::NoteRow>> {
        trace!(user_id, note_id, "Querying for note by ID.");

        let note = sqlx::query_as::<_, models::NoteRow>(&format!(
            r#"
            SELECT {NOTE_COLUMNS}
            FROM notes n
                JOIN clients c ON c.id = n.client_id
            WHERE c.user_id = $1 AND n.id = $2
            "#,
        ))
        .bind(user_id)
        .bind(note_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(note)
    }

    async fn list_notes(&self, query: NoteQuery) -> Result<Vec<models::NoteRow>> {
        let mut query_builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
            r#"
            SELECT {NOTE_COLUMNS}
            FROM notes n
                JOIN clients c ON c.id = n.client_id
            WHERE c.user_id = "#,
        ));
        query_builder.push_bind(query.user_id);

        query_builder
            .push(" AND n.client_id = ")
            .push_bind(query.client_id);

        if let Some(category) = query.category {
            query_builder
                .push(" AND LOWER(n.category) = ")
                .push_bind(category.as_str().to_ascii_lowercase());
        }

        if query.pinned_only {
            query_builder.push(" AND n.is_pinned");
        }

        if let Some(term) = query.search {
            let pattern = format!("%{term}%");
            query_builder
                .push(" AND (n.title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR n.content ILIKE ")
                .push_bind(pattern)
                .push(")");
        }

        query_builder.push(" ORDER BY n.is_pinned DESC, n.created_at DESC");

        let notes = query_builder
            .build()
            .fetch_all(self.pool())
            .await?
            .iter()
            .map(models::NoteRow::from_row)
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok(notes)
    }
}
