use anyhow::anyhow;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use super::domain::transactions::{Transaction, TransactionStatus, TransactionType};

/// A transaction row as stored. The `type` column is selected as `kind` so
/// the field name stays a Rust identifier.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct TransactionRow {
    pub id: i64,
    pub client_id: i64,
    pub kind: String,
    pub amount: Decimal,
    pub transaction_date: NaiveDate,
    pub status: String,
    pub description: Option<String>,
    pub frequency: Option<String>,
    pub next_transaction_date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub remaining_amount: Option<Decimal>,
    pub source_balance: Option<Decimal>,
    pub from_fund: Option<String>,
    pub to_fund: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TransactionRow {
    pub fn try_into_domain(self) -> anyhow::Result<Transaction> {
        let kind = TransactionType::parse(&self.kind)
            .ok_or_else(|| anyhow!("unrecognized transaction type: {}", self.kind))?;
        let status = TransactionStatus::parse(&self.status)
            .ok_or_else(|| anyhow!("unrecognized transaction status: {}", self.status))?;

        Ok(Transaction {
            id: self.id,
            client_id: self.client_id,
            kind,
            amount: self.amount,
            transaction_date: self.transaction_date,
            status,
            description: self.description,
            frequency: self.frequency,
            next_transaction_date: self.next_transaction_date,
            start_date: self.start_date,
            end_date: self.end_date,
            remaining_amount: self.remaining_amount,
            source_balance: self.source_balance,
            from_fund: self.from_fund,
            to_fund: self.to_fund,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
