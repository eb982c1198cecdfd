use anyhow::Result;
use async_trait::async_trait;
use tracing::trace;

use crate::{database::PostgresConnection, funds::models::FundBalance};

use super::FundBalanceQueries;

#[async_trait]
impl FundBalanceQueries for PostgresConnection {
    async fn find_balance(&self, client_id: i64, fund_id: &str) -> Result<Option<FundBalance>> {
        trace!(client_id, fund_id, "Querying for fund balance.");

        let balance = sqlx::query_as::<_, FundBalance>(
            r#"
            SELECT id, fund_id, client_id, balance, as_of_date, last_updated
            FROM fund_balance
            WHERE client_id = $1 AND fund_id = $2
            "#,
        )
        .bind(client_id)
        .bind(fund_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(balance)
    }

    async fn list_for_client(&self, client_id: i64) -> Result<Vec<FundBalance>> {
        let balances = sqlx::query_as::<_, FundBalance>(
            r#"
            SELECT id, fund_id, client_id, balance, as_of_date, last_updated
            FROM fund_balance
            WHERE client_id = $1
            ORDER BY fund_id
            "#,
        )
        .bind(client_id)
        .fetch_all(self.pool())
        .await?;

        Ok(balances)
    }
}
