use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

/// A client's running balance in a single fund.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct FundBalance {
    pub id: i64,
    pub fund_id: String,
    pub client_id: i64,
    pub balance: Decimal,
    /// The date the balance was last recomputed.
    pub as_of_date: NaiveDate,
    pub last_updated: DateTime<Utc>,
}
