//! Write-side operations on the transaction ledger.

pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use super::domain::transactions::{NewTransaction, Transaction};

#[derive(Debug, Error)]
pub enum TransactionCommandError {
    /// The referenced client does not exist or belongs to another account
    /// holder.
    #[error("Client not found")]
    ClientNotFound,
    #[error("Transaction not found")]
    TransactionNotFound,
    #[error(transparent)]
    Database(#[from] anyhow::Error),
}

impl From<sqlx::Error> for TransactionCommandError {
    fn from(error: sqlx::Error) -> Self {
        Self::Database(error.into())
    }
}

pub type DynTransactionCommands = Arc<dyn TransactionCommands + Send + Sync>;

#[async_trait]
pub trait TransactionCommands {
    /// Persist a new transaction for one of the account holder's clients.
    async fn create_transaction(
        &self,
        user_id: i64,
        transaction: NewTransaction,
    ) -> Result<Transaction, TransactionCommandError>;

    /// Replace the mutable fields of an existing transaction.
    async fn update_transaction(
        &self,
        user_id: i64,
        transaction_id: i64,
        update: NewTransaction,
    ) -> Result<Transaction, TransactionCommandError>;

    /// Delete a transaction. Deleting a row that does not exist (or is not
    /// visible to the account holder) is not an error.
    async fn delete_transaction(&self, user_id: i64, transaction_id: i64) -> anyhow::Result<()>;
}
