use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

/// The kind of fund transaction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TransactionType {
    Sip,
    Stp,
    Swp,
    Lumpsum,
}

impl TransactionType {
    /// Parse from the wire/storage representation, case-insensitively.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "sip" => Some(Self::Sip),
            "stp" => Some(Self::Stp),
            "swp" => Some(Self::Swp),
            "lumpsum" => Some(Self::Lumpsum),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sip => "SIP",
            Self::Stp => "STP",
            Self::Swp => "SWP",
            Self::Lumpsum => "LUMPSUM",
        }
    }
}

/// Lifecycle state of a transaction.
///
/// Stored uppercase; parsed case-insensitively everywhere so rows written by
/// earlier revisions of the system with mixed casing keep working.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TransactionStatus {
    Active,
    Completed,
    Pending,
    Failed,
}

impl TransactionStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            "pending" => Some(Self::Pending),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Completed => "COMPLETED",
            Self::Pending => "PENDING",
            Self::Failed => "FAILED",
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum NewTransactionError {
    #[error("Transaction amount must be positive")]
    NonPositiveAmount,
    #[error("Unrecognized transaction type: {0}")]
    UnknownType(String),
    #[error("Unrecognized transaction status: {0}")]
    UnknownStatus(String),
    #[error("{0} is required for an STP transaction")]
    MissingStpField(&'static str),
}

/// Raw field values for a transaction, before validation.
#[derive(Clone, Debug, Default)]
pub struct NewTransactionData {
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
}

/// A transaction entered by a caller. May only be constructed through
/// [`Self::new()`], which rejects structurally invalid records.
#[derive(Clone, Debug)]
pub struct NewTransaction {
    data: NewTransactionData,
    kind: TransactionType,
    status: TransactionStatus,
}

impl NewTransaction {
    pub fn new(data: NewTransactionData) -> Result<Self, NewTransactionError> {
        let kind = TransactionType::parse(&data.kind)
            .ok_or_else(|| NewTransactionError::UnknownType(data.kind.clone()))?;
        let status = TransactionStatus::parse(&data.status)
            .ok_or_else(|| NewTransactionError::UnknownStatus(data.status.clone()))?;

        if data.amount <= Decimal::ZERO {
            return Err(NewTransactionError::NonPositiveAmount);
        }

        if kind == TransactionType::Stp {
            if data.from_fund.as_deref().map_or(true, str::is_empty) {
                return Err(NewTransactionError::MissingStpField("fromFund"));
            }
            if data.to_fund.as_deref().map_or(true, str::is_empty) {
                return Err(NewTransactionError::MissingStpField("toFund"));
            }
            if data.frequency.as_deref().map_or(true, str::is_empty) {
                return Err(NewTransactionError::MissingStpField("frequency"));
            }
            if data.next_transaction_date.is_none() {
                return Err(NewTransactionError::MissingStpField("nextTransactionDate"));
            }
            if data.end_date.is_none() {
                return Err(NewTransactionError::MissingStpField("endDate"));
            }
        }

        Ok(Self { data, kind, status })
    }

    pub fn client_id(&self) -> i64 {
        self.data.client_id
    }

    pub fn kind(&self) -> TransactionType {
        self.kind
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    pub fn amount(&self) -> Decimal {
        self.data.amount
    }

    pub fn transaction_date(&self) -> NaiveDate {
        self.data.transaction_date
    }

    pub fn description(&self) -> Option<&str> {
        self.data.description.as_deref()
    }

    pub fn frequency(&self) -> Option<&str> {
        self.data.frequency.as_deref()
    }

    pub fn next_transaction_date(&self) -> Option<NaiveDate> {
        self.data.next_transaction_date
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.data.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.data.end_date
    }

    pub fn remaining_amount(&self) -> Option<Decimal> {
        self.data.remaining_amount
    }

    pub fn source_balance(&self) -> Option<Decimal> {
        self.data.source_balance
    }

    pub fn from_fund(&self) -> Option<&str> {
        self.data.from_fund.as_deref()
    }

    pub fn to_fund(&self) -> Option<&str> {
        self.data.to_fund.as_deref()
    }
}

/// A transaction that has been persisted in the ledger.
#[derive(Clone, Debug)]
pub struct Transaction {
    pub id: i64,
    pub client_id: i64,
    pub kind: TransactionType,
    pub amount: Decimal,
    pub transaction_date: NaiveDate,
    pub status: TransactionStatus,
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

/// A position in the transaction list, used for cursor pagination. Lists are
/// ordered by transaction date descending with creation time as the
/// tie-break.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TransactionCursor {
    pub after_date: NaiveDate,
    pub after_created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn lumpsum_data() -> NewTransactionData {
        NewTransactionData {
            client_id: 1,
            kind: "LUMPSUM".to_owned(),
            amount: Decimal::new(5000, 0),
            transaction_date: date(2024, 1, 10),
            status: "COMPLETED".to_owned(),
            ..Default::default()
        }
    }

    fn stp_data() -> NewTransactionData {
        NewTransactionData {
            client_id: 1,
            kind: "STP".to_owned(),
            amount: Decimal::new(400, 0),
            transaction_date: date(2024, 1, 10),
            status: "ACTIVE".to_owned(),
            frequency: Some("MONTHLY".to_owned()),
            next_transaction_date: Some(date(2024, 2, 10)),
            end_date: Some(date(2024, 12, 10)),
            from_fund: Some("F1".to_owned()),
            to_fund: Some("F2".to_owned()),
            ..Default::default()
        }
    }

    #[test]
    fn type_and_status_parse_case_insensitively() {
        assert_eq!(Some(TransactionType::Stp), TransactionType::parse("stp"));
        assert_eq!(Some(TransactionType::Sip), TransactionType::parse("SIP"));
        assert_eq!(None, TransactionType::parse("bonus"));

        assert_eq!(
            Some(TransactionStatus::Active),
            TransactionStatus::parse("Active"),
        );
        assert_eq!(
            Some(TransactionStatus::Completed),
            TransactionStatus::parse("completed"),
        );
        assert_eq!(None, TransactionStatus::parse("archived"));
    }

    #[test]
    fn new_lumpsum_transaction_is_valid() {
        let transaction = NewTransaction::new(lumpsum_data()).expect("should be valid");

        assert_eq!(TransactionType::Lumpsum, transaction.kind());
        assert_eq!(TransactionStatus::Completed, transaction.status());
    }

    #[test]
    fn new_transaction_rejects_non_positive_amount() {
        let mut data = lumpsum_data();
        data.amount = Decimal::ZERO;

        assert_eq!(
            Err(NewTransactionError::NonPositiveAmount),
            NewTransaction::new(data).map(|_| ()),
        );
    }

    #[test]
    fn new_transaction_rejects_unknown_type() {
        let mut data = lumpsum_data();
        data.kind = "dividend".to_owned();

        assert_eq!(
            Err(NewTransactionError::UnknownType("dividend".to_owned())),
            NewTransaction::new(data).map(|_| ()),
        );
    }

    #[test]
    fn new_stp_transaction_is_valid() {
        let transaction = NewTransaction::new(stp_data()).expect("should be valid");

        assert_eq!(TransactionType::Stp, transaction.kind());
        assert_eq!(Some("F1"), transaction.from_fund());
    }

    #[test]
    fn new_stp_transaction_requires_plan_fields() {
        let mut missing_fund = stp_data();
        missing_fund.to_fund = None;
        assert_eq!(
            Err(NewTransactionError::MissingStpField("toFund")),
            NewTransaction::new(missing_fund).map(|_| ()),
        );

        let mut missing_frequency = stp_data();
        missing_frequency.frequency = Some(String::new());
        assert_eq!(
            Err(NewTransactionError::MissingStpField("frequency")),
            NewTransaction::new(missing_frequency).map(|_| ()),
        );

        let mut missing_end = stp_data();
        missing_end.end_date = None;
        assert_eq!(
            Err(NewTransactionError::MissingStpField("endDate")),
            NewTransaction::new(missing_end).map(|_| ()),
        );
    }
}
