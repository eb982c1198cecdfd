use async_trait::async_trait;
use tracing::info;

use crate::{
    database::PostgresConnection,
    ledger::{
        domain::transactions::{NewTransaction, Transaction},
        models,
    },
};

use super::{TransactionCommandError, TransactionCommands};

#[async_trait]
impl TransactionCommands for PostgresConnection {
    async fn create_transaction(
        &self,
        user_id: i64,
        transaction: NewTransaction,
    ) -> Result<Transaction, TransactionCommandError> {
        // The INSERT selects from clients so the ownership check and the
        // write happen in one statement.
        let row = sqlx::query_as::<_, models::TransactionRow>(
            r#"
            INSERT INTO transactions (
                client_id, type, amount, transaction_date, status,
                description, frequency, next_transaction_date, start_date,
                end_date, remaining_amount, source_balance, from_fund, to_fund
            )
            SELECT
                c.id, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15
            FROM clients c
            WHERE c.id = $2 AND c.user_id = $1
            RETURNING
                id, client_id, type AS kind, amount, transaction_date, status,
                description, frequency, next_transaction_date, start_date,
                end_date, remaining_amount, source_balance, from_fund, to_fund,
                created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(transaction.client_id())
        .bind(transaction.kind().as_str())
        .bind(transaction.amount())
        .bind(transaction.transaction_date())
        .bind(transaction.status().as_str())
        .bind(transaction.description())
        .bind(transaction.frequency())
        .bind(transaction.next_transaction_date())
        .bind(transaction.start_date())
        .bind(transaction.end_date())
        .bind(transaction.remaining_amount())
        .bind(transaction.source_balance())
        .bind(transaction.from_fund())
        .bind(transaction.to_fund())
        .fetch_optional(self.pool())
        .await?
        .ok_or(TransactionCommandError::ClientNotFound)?;

        info!(id = row.id, user_id, "Persisted new transaction.");

        Ok(row.try_into_domain()?)
    }

    async fn update_transaction(
        &self,
        user_id: i64,
        transaction_id: i64,
        update: NewTransaction,
    ) -> Result<Transaction, TransactionCommandError> {
        let row = sqlx::query_as::<_, models::TransactionRow>(
            r#"
            UPDATE transactions t
            SET
                client_id = $3,
                type = $4,
                amount = $5,
                transaction_date = $6,
                status = $7,
                description = $8,
                frequency = $9,
                next_transaction_date = $10,
                start_date = $11,
                end_date = $12,
                remaining_amount = $13,
                source_balance = $14,
                from_fund = $15,
                to_fund = $16,
                updated_at = now()
            FROM clients c
            WHERE t.id = $2
                AND t.client_id = c.id
                AND c.user_id = $1
                AND $3 IN (SELECT id FROM clients WHERE user_id = $1)
            RETURNING
                t.id, t.client_id, t.type AS kind, t.amount,
                t.transaction_date, t.status, t.description, t.frequency,
                t.next_transaction_date, t.start_date, t.end_date,
                t.remaining_amount, t.source_balance, t.from_fund, t.to_fund,
                t.created_at, t.updated_at
            "#,
        )
        .bind(user_id)
        .bind(transaction_id)
        .bind(update.client_id())
        .bind(update.kind().as_str())
        .bind(update.amount())
        .bind(update.transaction_date())
        .bind(update.status().as_str())
        .bind(update.description())
        .bind(update.frequency())
        .bind(update.next_transaction_date())
        .bind(update.start_date())
        .bind(update.end_date())
        .bind(update.remaining_amount())
        .bind(update.source_balance())
        .bind(update.from_fund())
        .bind(update.to_fund())
        .fetch_optional(self.pool())
        .await?
        .ok_or(TransactionCommandError::TransactionNotFound)?;

        info!(transaction_id, user_id, "Updated transaction.");

        Ok(row.try_into_domain()?)
    }

    async fn delete_transaction(&self, user_id: i64, transaction_id: i64) -> anyhow::Result<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM transactions t
            USING clients c
            WHERE t.id = $2 AND t.client_id = c.id AND c.user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(transaction_id)
        .execute(self.pool())
        .await?;

        info!(
            user_id,
            transaction_id,
            rows = result.rows_affected(),
            "Deleted transaction."
        );

        Ok(())
    }
}
