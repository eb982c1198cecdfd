use crate::ledger::{
    commands::{DynTransactionCommands, TransactionCommandError},
    domain::transactions::{NewTransaction, Transaction},
    queries::{DynTransactionQueries, TransactionCollection, TransactionQuery},
};

#[derive(Clone)]
pub struct LedgerService {
    queries: DynTransactionQueries,
    commands: DynTransactionCommands,
}

impl LedgerService {
    pub fn new(queries: DynTransactionQueries, commands: DynTransactionCommands) -> Self {
        Self { queries, commands }
    }

    pub async fn get_transaction(
        &self,
        user_id: i64,
        transaction_id: i64,
    ) -> anyhow::Result<Option<Transaction>> {
        self.queries.get_transaction(user_id, transaction_id).await
    }

    pub async fn list_transactions(
        &self,
        query: TransactionQuery,
    ) -> anyhow::Result<TransactionCollection> {
        self.queries.list_transactions(query).await
    }

    pub async fn create_transaction(
        &self,
        user_id: i64,
        transaction: NewTransaction,
    ) -> Result<Transaction, TransactionCommandError> {
        self.commands.create_transaction(user_id, transaction).await
    }

    pub async fn update_transaction(
        &self,
        user_id: i64,
        transaction_id: i64,
        update: NewTransaction,
    ) -> Result<Transaction, TransactionCommandError> {
        self.commands
            .update_transaction(user_id, transaction_id, update)
            .await
    }

    pub async fn delete_transaction(
        &self,
        user_id: i64,
        transaction_id: i64,
    ) -> anyhow::Result<()> {
        self.commands
            .delete_transaction(user_id, transaction_id)
            .await
    }
}
