//! Queries for directory information. They never modify data.

pub mod postgres;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use super::models::{Client, User};

pub type DynDirectoryQueries = Arc<dyn DirectoryQueries + Send + Sync>;

#[async_trait]
pub trait DirectoryQueries {
    /// Look up an account holder by ID.
    async fn get_user(&self, user_id: i64) -> Result<Option<User>>;

    /// Look up a client by ID, scoped to its owning account holder. Returns
    /// `None` when the client does not exist or belongs to someone else.
    async fn get_client(&self, user_id: i64, client_id: i64) -> Result<Option<Client>>;

    /// List the clients of an account holder, ordered by name.
    async fn list_clients(&self, user_id: i64) -> Result<Vec<Client>>;
}
