use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::domain::transactions::{
    NewTransactionData, Transaction, TransactionCursor,
};

#[derive(Serialize)]
pub struct ResourceCollection<T: Serialize, C: Serialize> {
    pub next: Option<C>,
    pub items: Vec<T>,
}

/// An opaque, URL-safe encoding of a [`TransactionCursor`]. Clients echo the
/// value back in the `after` query parameter to fetch the next page.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(transparent)]
pub struct EncodedTransactionCursor(pub String);

impl EncodedTransactionCursor {
    pub fn decode(&self) -> Option<TransactionCursor> {
        let (date, created_at) = self.0.split_once('|')?;

        Some(TransactionCursor {
            after_date: date.parse::<NaiveDate>().ok()?,
            after_created_at: DateTime::parse_from_rfc3339(created_at)
                .ok()?
                .with_timezone(&Utc),
        })
    }
}

impl From<TransactionCursor> for EncodedTransactionCursor {
    fn from(cursor: TransactionCursor) -> Self {
        Self(format!(
            "{}|{}",
            cursor.after_date,
            cursor.after_created_at.to_rfc3339(),
        ))
    }
}

/// The fields a caller provides to create or replace a ledger transaction.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPayload {
    pub client_id: i64,
    #[serde(rename = "type")]
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
}

impl From<TransactionPayload> for NewTransactionData {
    fn from(payload: TransactionPayload) -> Self {
        Self {
            client_id: payload.client_id,
            kind: payload.kind,
            amount: payload.amount,
            transaction_date: payload.transaction_date,
            status: payload.status,
            description: payload.description,
            frequency: payload.frequency,
            next_transaction_date: payload.next_transaction_date,
            start_date: payload.start_date,
            end_date: payload.end_date,
            remaining_amount: payload.remaining_amount,
            source_balance: payload.source_balance,
            from_fund: payload.from_fund,
            to_fund: payload.to_fund,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRep {
    pub id: i64,
    pub client_id: i64,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub amount: Decimal,
    pub transaction_date: NaiveDate,
    pub status: &'static str,
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

impl From<&Transaction> for TransactionRep {
    fn from(transaction: &Transaction) -> Self {
        Self {
            id: transaction.id,
            client_id: transaction.client_id,
            kind: transaction.kind.as_str(),
            amount: transaction.amount,
            transaction_date: transaction.transaction_date,
            status: transaction.status.as_str(),
            description: transaction.description.clone(),
            frequency: transaction.frequency.clone(),
            next_transaction_date: transaction.next_transaction_date,
            start_date: transaction.start_date,
            end_date: transaction.end_date,
            remaining_amount: transaction.remaining_amount,
            source_balance: transaction.source_balance,
            from_fund: transaction.from_fund.clone(),
            to_fund: transaction.to_fund.clone(),
            created_at: transaction.created_at,
            updated_at: transaction.updated_at,
        }
    }
}
