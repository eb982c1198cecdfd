use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::{
    database::PostgresConnection,
    stp::{
        domain::{Frequency, StpError, StpTransfer},
        models::StpPlanRow,
    },
};

use super::StpCommands;

#[async_trait]
impl StpCommands for PostgresConnection {
    async fn execute_transfer(
        &self,
        transfer: &StpTransfer,
        frequency: Frequency,
        next_date: NaiveDate,
        today: NaiveDate,
    ) -> Result<StpPlanRow, StpError> {
        let mut tx = self.pool().begin().await.map_err(map_db_error)?;

        // Locking the source row serializes concurrent transfers out of the
        // same fund, and the re-check below keeps the balance non-negative
        // even when the caller's pre-check raced another execution.
        let source = sqlx::query_as::<_, (i64, Decimal)>(
            r#"
            SELECT id, balance
            FROM fund_balance
            WHERE client_id = $1 AND fund_id = $2
            FOR UPDATE
            "#,
        )
        .bind(transfer.client_id())
        .bind(transfer.from_fund())
        .fetch_optional(&mut tx)
        .await
        .map_err(map_db_error)?;

        let (source_id, source_balance) = source
            .ok_or_else(|| StpError::invalid("Source fund balance not found"))?;

        if source_balance < transfer.amount() {
            return Err(StpError::insufficient(
                "Insufficient balance in source fund",
            ));
        }

        let remaining = source_balance - transfer.amount();

        sqlx::query(
            r#"
            UPDATE fund_balance
            SET balance = balance - $1, as_of_date = $2, last_updated = now()
            WHERE id = $3
            "#,
        )
        .bind(transfer.amount())
        .bind(today)
        .bind(source_id)
        .execute(&mut tx)
        .await
        .map_err(map_db_error)?;

        // The target balance is created lazily on the first credit into a
        // previously-unfunded fund.
        sqlx::query(
            r#"
            INSERT INTO fund_balance (fund_id, client_id, balance, as_of_date)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (fund_id, client_id) DO UPDATE
            SET balance = fund_balance.balance + EXCLUDED.balance,
                as_of_date = EXCLUDED.as_of_date,
                last_updated = now()
            "#,
        )
        .bind(transfer.to_fund())
        .bind(transfer.client_id())
        .bind(transfer.amount())
        .bind(today)
        .execute(&mut tx)
        .await
        .map_err(map_db_error)?;

        let plan_id = match transfer.id() {
            Some(id) => {
                let updated = sqlx::query_scalar::<_, i64>(
                    r#"
                    UPDATE transactions
                    SET amount = $3,
                        from_fund = $4,
                        to_fund = $5,
                        frequency = $6,
                        next_transaction_date = $7,
                        start_date = $8,
                        end_date = $9,
                        remaining_amount = $10,
                        source_balance = $10,
                        updated_at = now()
                    WHERE id = $1
                        AND client_id = $2
                        AND LOWER(type) = 'stp'
                        AND LOWER(status) = 'active'
                    RETURNING id
                    "#,
                )
                .bind(id)
                .bind(transfer.client_id())
                .bind(transfer.amount())
                .bind(transfer.from_fund())
                .bind(transfer.to_fund())
                .bind(frequency.as_str())
                .bind(next_date)
                .bind(transfer.start_date())
                .bind(transfer.end_date())
                .bind(remaining)
                .fetch_optional(&mut tx)
                .await
                .map_err(map_db_error)?;

                // The schedule update only ever lands on an ACTIVE STP row;
                // a payload id pointing anywhere else aborts the whole unit.
                updated.ok_or_else(|| {
                    StpError::not_found(format!("Active STP transaction {id} not found"))
                })?
            }
            None => sqlx::query_scalar::<_, i64>(
                r#"
                INSERT INTO transactions (
                    client_id, type, amount, transaction_date, status,
                    description, frequency, next_transaction_date, start_date,
                    end_date, remaining_amount, source_balance, from_fund,
                    to_fund
                )
                VALUES (
                    $1, 'STP', $2, $3, 'ACTIVE', $4, $5, $6, $7, $8, $9, $9,
                    $10, $11
                )
                RETURNING id
                "#,
            )
            .bind(transfer.client_id())
            .bind(transfer.amount())
            .bind(today)
            .bind(transfer.description())
            .bind(frequency.as_str())
            .bind(next_date)
            .bind(transfer.start_date())
            .bind(transfer.end_date())
            .bind(remaining)
            .bind(transfer.from_fund())
            .bind(transfer.to_fund())
            .fetch_one(&mut tx)
            .await
            .map_err(map_db_error)?,
        };

        let plan = sqlx::query_as::<_, StpPlanRow>(
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
            WHERE t.id = $1
            "#,
        )
        .bind(plan_id)
        .fetch_one(&mut tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        info!(
            plan_id,
            client_id = transfer.client_id(),
            from_fund = transfer.from_fund(),
            to_fund = transfer.to_fund(),
            %next_date,
            "Executed STP transfer."
        );
        debug!(%remaining, "Source fund balance after debit.");

        Ok(plan)
    }
}

/// Surface Postgres serialization failures and deadlocks as the retryable
/// conflict error; everything else is an infrastructure failure.
fn map_db_error(error: sqlx::Error) -> StpError {
    if let sqlx::Error::Database(db_error) = &error {
        if let Some(code) = db_error.code() {
            if code == "40001" || code == "40P01" {
                return StpError::Conflict(
                    "Concurrent update on fund balance, retry the transfer".to_owned(),
                );
            }
        }
    }

    StpError::Database(anyhow::Error::from(error).context("STP transfer failed"))
}
