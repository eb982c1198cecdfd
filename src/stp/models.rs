use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::domain;

/// An STP plan row from the ledger, joined with the owning client's name.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct StpPlanRow {
    pub id: i64,
    pub client_id: i64,
    pub client_name: String,
    pub amount: Decimal,
    pub from_fund: Option<String>,
    pub to_fund: Option<String>,
    pub frequency: Option<String>,
    pub next_transaction_date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub remaining_amount: Option<Decimal>,
    pub source_balance: Option<Decimal>,
    pub status: String,
}

impl From<StpPlanRow> for domain::StpPlan {
    fn from(row: StpPlanRow) -> Self {
        Self {
            id: row.id,
            client_id: row.client_id,
            client_name: row.client_name,
            amount: row.amount,
            from_fund: row.from_fund,
            to_fund: row.to_fund,
            frequency: row.frequency,
            next_transaction_date: row.next_transaction_date,
            start_date: row.start_date,
            end_date: row.end_date,
            remaining_amount: row.remaining_amount,
            source_balance: row.source_balance,
            status: row.status,
        }
    }
}

/// One populated month bucket of completed-transfer totals. Months without
/// any completed transfers are absent; the service densifies the window.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct MonthlyTotalRow {
    /// Bucket key formatted as `YYYY-MM`.
    pub month: String,
    pub count: i64,
    pub total_amount: Decimal,
}
