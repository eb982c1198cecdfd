//! Queries for ledger information. They never modify data.

pub mod postgres;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use super::domain::transactions::{Transaction, TransactionCursor, TransactionType};

/// Query parameters for listing transactions.
#[derive(Default)]
pub struct TransactionQuery {
    /// The account holder whose clients' transactions are listed.
    pub user_id: i64,
    /// Restrict the list to a single client.
    pub client_id: Option<i64>,
    /// Restrict the list to one transaction type.
    pub kind: Option<TransactionType>,
    /// An optional cursor indicating that only results after the specified
    /// position in the list should be returned.
    pub after: Option<TransactionCursor>,
}

pub struct TransactionCollection {
    pub next: Option<TransactionCursor>,
    pub items: Vec<Transaction>,
}

pub type DynTransactionQueries = Arc<dyn TransactionQueries + Send + Sync>;

#[async_trait]
pub trait TransactionQueries {
    /// Get a single transaction by ID, scoped to its owning account holder.
    async fn get_transaction(
        &self,
        user_id: i64,
        transaction_id: i64,
    ) -> Result<Option<Transaction>>;

    /// List the transactions matching the provided query, newest first.
    async fn list_transactions(&self, query: TransactionQuery)
        -> Result<TransactionCollection>;
}
