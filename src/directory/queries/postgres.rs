use anyhow::Result;
use async_trait::async_trait;
use tracing::trace;

use crate::{
    database::PostgresConnection,
    directory::models::{Client, User},
};

use super::DirectoryQueries;

#[async_trait]
impl DirectoryQueries for PostgresConnection {
    async fn get_user(&self, user_id: i64) -> Result<Option<User>> {
        trace!(user_id, "Querying for user by ID.");

        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, full_name, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(user)
    }

    async fn get_client(&self, user_id: i64, client_id: i64) -> Result<Option<Client>> {
        trace!(user_id, client_id, "Querying for client by ID.");

        let client = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, user_id, name, email, created_at
            FROM clients
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(client_id)
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(client)
    }

    async fn list_clients(&self, user_id: i64) -> Result<Vec<Client>> {
        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, user_id, name, email, created_at
            FROM clients
            WHERE user_id = $1
            ORDER BY name, id
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;

        Ok(clients)
    }
}
