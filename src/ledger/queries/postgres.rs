use anyhow::Result;
use async_trait::async_trait;
use sqlx::{FromRow, Postgres, QueryBuilder};
use tracing::{debug, trace};

use crate::{
    database::PostgresConnection,
    ledger::{
        domain::transactions::{Transaction, TransactionCursor},
        models,
    },
};

use super::{TransactionCollection, TransactionQueries, TransactionQuery};

const TRANSACTION_PAGE_SIZE: u8 = 50;

const TRANSACTION_COLUMNS: &str = r#"
    t.id,
    t.client_id,
    t.type AS kind,
    t.amount,
    t.transaction_date,
    t.status,
    t.description,
    t.frequency,
    t.next_transaction_date,
    t.start_date,
    t.end_date,
    t.remaining_amount,
    t.source_balance,
    t.from_fund,
    t.to_fund,
    t.created_at,
    t.updated_at
"#;

#[async_trait]
impl TransactionQueries for PostgresConnection {
    async fn get_transaction(
        &self,
        user_id: i64,
        transaction_id: i64,
    ) -> Result<Option<Transaction>> {
        trace!(user_id, transaction_id, "Querying for transaction by ID.");

        let row = sqlx::query_as::<_, models::TransactionRow>(&format!(
            r#"
            SELECT {TRANSACTION_COLUMNS}
            FROM transactions t
                JOIN clients c ON c.id = t.client_id
            WHERE c.user_id = $1 AND t.id = $2
            "#,
        ))
        .bind(user_id)
        .bind(transaction_id)
        .fetch_optional(self.pool())
        .await?;

        let row = match row {
            Some(row) => row,
            None => {
                debug!(user_id, transaction_id, "Transaction does not exist.");

                return Ok(None);
            }
        };

        Ok(Some(row.try_into_domain()?))
    }

    async fn list_transactions(
        &self,
        query: TransactionQuery,
    ) -> Result<TransactionCollection> {
        let mut query_builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
            r#"
            SELECT {TRANSACTION_COLUMNS}
            FROM transactions t
                JOIN clients c ON c.id = t.client_id
            WHERE c.user_id = "#,
        ));
        query_builder.push_bind(query.user_id);

        if let Some(client_id) = query.client_id {
            query_builder
                .push(" AND t.client_id = ")
                .push_bind(client_id);
        }

        if let Some(kind) = query.kind {
            query_builder
                .push(" AND LOWER(t.type) = ")
                .push_bind(kind.as_str().to_ascii_lowercase());
        }

        if let Some(cursor) = query.after {
            query_builder
                .push(" AND (t.transaction_date < ")
                .push_bind(cursor.after_date)
                .push(" OR (t.transaction_date = ")
                .push_bind(cursor.after_date)
                .push(" AND t.created_at < ")
                .push_bind(cursor.after_created_at)
                .push("))");
        }

        query_builder
            .push(" ORDER BY t.transaction_date DESC, t.created_at DESC LIMIT ")
            // Select one more than the page size so we can determine if there
            // is a next page.
            .push_bind(i16::from(TRANSACTION_PAGE_SIZE) + 1);

        let mut rows: Vec<models::TransactionRow> = query_builder
            .build()
            .fetch_all(self.pool())
            .await?
            .iter()
            .map(models::TransactionRow::from_row)
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        let has_next_page = rows.len() > usize::from(TRANSACTION_PAGE_SIZE);
        if has_next_page {
            rows.pop();
        }

        let next = if has_next_page {
            rows.last().map(|last| TransactionCursor {
                after_date: last.transaction_date,
                after_created_at: last.created_at,
            })
        } else {
            None
        };

        let items = rows
            .into_iter()
            .map(models::TransactionRow::try_into_domain)
            .collect::<Result<Vec<_>>>()?;

        Ok(TransactionCollection { next, items })
    }
}
