use async_trait::async_trait;
use tracing::info;

use crate::{
    database::PostgresConnection,
    notes::{domain::NewNote, models},
};

use super::{NoteCommandError, NoteCommands};

#[async_trait]
impl NoteCommands for PostgresConnection {
    async fn create_note(
        &self,
        user_id: i64,
        note: NewNote,
    ) -> Result<models::NoteRow, NoteCommandError> {
        // The INSERT selects from clients so the ownership check and the
        // write happen in one statement.
        let row = sqlx::query_as::<_, models::NoteRow>(
            r#"
            INSERT INTO notes (client_id, title, content, category, is_pinned, created_by)
            SELECT c.id, $3, $4, $5, $6, $7
            FROM clients c
            WHERE c.id = $2 AND c.user_id = $1
            RETURNING
                id, client_id, title, content, category, is_pinned,
                created_by, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(note.client_id())
        .bind(note.title())
        .bind(note.content())
        .bind(note.category().as_str())
        .bind(note.pinned())
        .bind(note.created_by())
        .fetch_optional(self.pool())
        .await?
        .ok_or(NoteCommandError::ClientNotFound)?;

        info!(id = row.id, user_id, "Persisted new note.");

        Ok(row)
    }

    async fn update_note(
        &self,
        user_id: i64,
        note_id: i64,
        update: NewNote,
    ) -> Result<models::NoteRow, NoteCommandError> {
        let row = sqlx::query_as::<_, models::NoteRow>(
            r#"
            UPDATE notes n
            SET
                title = $3,
                content = $4,
                category = $5,
                is_pinned = $6,
                updated_at = now()
            FROM clients c
            WHERE n.id = $2 AND n.client_id = c.id AND c.user_id = $1
            RETURNING
                n.id, n.client_id, n.title, n.content, n.category,
                n.is_pinned, n.created_by, n.created_at, n.updated_at
            "#,
        )
        .bind(user_id)
        .bind(note_id)
        .bind(update.title())
        .bind(update.content())
        .bind(update.category().as_str())
        .bind(update.pinned())
        .fetch_optional(self.pool())
        .await?
        .ok_or(NoteCommandError::NoteNotFound)?;

        info!(note_id, user_id, "Updated note.");

        Ok(row)
    }

    async fn toggle_note_pinned(
        &self,
        user_id: i64,
        note_id: i64,
    ) -> Result<models::NoteRow, NoteCommandError> {
        let row = sqlx::query_as::<_, models::NoteRow>(
            r#"
            UPDATE notes n
            SET is_pinned = NOT n.is_pinned, updated_at = now()
            FROM clients c
            WHERE n.id = $2 AND n.client_id = c.id AND c.user_id = $1
            RETURNING
                n.id, n.client_id, n.title, n.content, n.category,
                n.is_pinned, n.created_by, n.created_at, n.updated_at
            "#,
        )
        .bind(user_id)
        .bind(note_id)
        .fetch_optional(self.pool())
        .await?
        .ok_or(NoteCommandError::NoteNotFound)?;

        info!(note_id, user_id, pinned = row.is_pinned, "Toggled note pin.");

        Ok(row)
    }

    async fn delete_note(&self, user_id: i64, note_id: i64) -> anyhow::Result<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM notes n
            USING clients c
            WHERE n.id = $2 AND n.client_id = c.id AND c.user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(note_id)
        .execute(self.pool())
        .await?;

        info!(
            user_id,
            note_id,
            rows = result.rows_affected(),
            "Deleted note."
        );

        Ok(())
    }
}
