use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::trace;

use crate::{
    database::PostgresConnection,
    stp::models::{MonthlyTotalRow, StpPlanRow},
};

use super::StpQueries;

#[async_trait]
impl StpQueries for PostgresConnection {
    async fn count_active_plans(&self, user_id: i64, today: NaiveDate) -> Result<i64> {
        trace!(user_id, %today, "Counting active STP plans.");

        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM transactions t
                JOIN clients c ON c.id = t.client_id
            WHERE c.user_id = $1
                AND LOWER(t.type) = 'stp'
                AND LOWER(t.status) = 'active'
                AND t.end_date > $2
            "#,
        )
        .bind(user_id)
        .bind(today)
        .fetch_one(self.pool())
        .await?;

        Ok(count)
    }

    async fn count_executing_on(&self, user_id: i64, today: NaiveDate) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM transactions t
                JOIN clients c ON c.id = t.client_id
            WHERE c.user_id = $1
                AND LOWER(t.type) = 'stp'
                AND LOWER(t.status) = 'active'
                AND t.next_transaction_date = $2
            "#,
        )
        .bind(user_id)
        .bind(today)
        .fetch_one(self.pool())
        .await?;

        Ok(count)
    }

    async fn count_expiring_between(
        &self,
        user_id: i64,
        from: NaiveDate,
        until: NaiveDate,
    ) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM transactions t
                JOIN clients c ON c.id = t.client_id
            WHERE c.user_id = $1
                AND LOWER(t.type) = 'stp'
                AND LOWER(t.status) = 'active'
                AND t.end_date BETWEEN $2 AND $3
            "#,
        )
        .bind(user_id)
        .bind(from)
        .bind(until)
        .fetch_one(self.pool())
        .await?;

        Ok(count)
    }

    async fn count_unfunded_plans(&self, user_id: i64) -> Result<i64> {
        // The balance lookup is scoped to the plan's own client. A missing
        // fund_balance row counts the same as a zero balance.
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM transactions t
                JOIN clients c ON c.id = t.client_id
                LEFT JOIN fund_balance fb
                    ON fb.client_id = t.client_id AND fb.fund_id = t.from_fund
            WHERE c.user_id = $1
                AND LOWER(t.type) = 'stp'
                AND LOWER(t.status) = 'active'
                AND COALESCE(fb.balance, 0) = 0
            "#,
        )
        .bind(user_id)
        .fetch_one(self.pool())
        .await?;

        Ok(count)
    }

    async fn monthly_completed_totals(
        &self,
        user_id: i64,
        window_start: NaiveDate,
    ) -> Result<Vec<MonthlyTotalRow>> {
        trace!(user_id, %window_start, "Fetching monthly STP totals.");

        let buckets = sqlx::query_as::<_, MonthlyTotalRow>(
            r#"
            SELECT
                TO_CHAR(t.transaction_date, 'YYYY-MM') AS month,
                COUNT(*) AS count,
                COALESCE(SUM(t.amount), 0) AS total_amount
            FROM transactions t
                JOIN clients c ON c.id = t.client_id
            WHERE c.user_id = $1
                AND LOWER(t.type) = 'stp'
                AND LOWER(t.status) = 'completed'
                AND t.transaction_date >= $2
            GROUP BY TO_CHAR(t.transaction_date, 'YYYY-MM')
            ORDER BY month
            "#,
        )
        .bind(user_id)
        .bind(window_start)
        .fetch_all(self.pool())
        .await?;

        Ok(buckets)
    }

    async fn list_plans(&self, user_id: i64) -> Result<Vec<StpPlanRow>> {
        let plans = sqlx::query_as::<_, StpPlanRow>(
            r#"
            SELECT
                t.id,
                t.client_id,
                c.name AS client_name,
                t.amount,
                t.from_fund,
                t.to_fund,
                t.frequency,
                t.next_transaction_date,
                t.start_date,
                t.end_date,
                t.remaining_amount,
                t.source_balance,
                t.status
            FROM transactions t
                JOIN clients c ON c.id = t.client_id
            WHERE c.user_id = $1
                AND LOWER(t.type) = 'stp'
            ORDER BY t.next_transaction_date ASC NULLS LAST, t.id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;

        Ok(plans)
    }
}
