use chrono::{Datelike, Days, Months, NaiveDate};
use rust_decimal::Decimal;
use thiserror::Error;

/// How often a recurring transfer executes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
}

impl Frequency {
    /// Parse a frequency from its wire representation. Comparison is
    /// case-insensitive.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            "quarterly" => Some(Self::Quarterly),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Quarterly => "QUARTERLY",
        }
    }

    /// Advance a due date by one period. Calendar months are used for the
    /// monthly and quarterly frequencies, so day-of-month is clamped at
    /// shorter month ends.
    pub fn next_date(&self, from: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Daily => from.checked_add_days(Days::new(1)),
            Self::Weekly => from.checked_add_days(Days::new(7)),
            Self::Monthly => from.checked_add_months(Months::new(1)),
            Self::Quarterly => from.checked_add_months(Months::new(3)),
        }
    }
}

/// Failures raised by the STP engine and aggregator.
#[derive(Debug, Error)]
pub enum StpError {
    /// A structural or business-rule violation. Not retryable; the caller
    /// must fix the input.
    #[error("{0}")]
    InvalidTransaction(String),

    /// The source fund cannot cover the transfer amount. Not retryable
    /// without topping up funds.
    #[error("{0}")]
    InsufficientBalance(String),

    /// A referenced client or account holder does not exist (or is not
    /// visible to the caller).
    #[error("{0}")]
    NotFound(String),

    /// A concurrent debit race was detected. Retryable by the caller.
    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Database(#[from] anyhow::Error),
}

impl StpError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidTransaction(message.into())
    }

    pub fn insufficient(message: impl Into<String>) -> Self {
        Self::InsufficientBalance(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}

/// A validated transfer order submitted to the engine.
///
/// Construction enforces the structural invariants (positive amount, both
/// funds named). The frequency is kept as submitted and parsed by the engine
/// before any mutation takes place.
#[derive(Clone, Debug)]
pub struct StpTransfer {
    id: Option<i64>,
    client_id: i64,
    amount: Decimal,
    from_fund: String,
    to_fund: String,
    frequency: String,
    next_transaction_date: NaiveDate,
    start_date: Option<NaiveDate>,
    end_date: NaiveDate,
    description: Option<String>,
}

impl StpTransfer {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: Option<i64>,
        client_id: i64,
        amount: Decimal,
        from_fund: String,
        to_fund: String,
        frequency: String,
        next_transaction_date: NaiveDate,
        start_date: Option<NaiveDate>,
        end_date: NaiveDate,
        description: Option<String>,
    ) -> Result<Self, StpError> {
        if amount <= Decimal::ZERO {
            return Err(StpError::invalid("Transaction amount must be positive"));
        }

        if from_fund.trim().is_empty() || to_fund.trim().is_empty() {
            return Err(StpError::invalid(
                "Source and target funds are required for an STP",
            ));
        }

        Ok(Self {
            id,
            client_id,
            amount,
            from_fund,
            to_fund,
            frequency,
            next_transaction_date,
            start_date,
            end_date,
            description,
        })
    }

    /// The ledger row to update, when executing an existing plan.
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn client_id(&self) -> i64 {
        self.client_id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn from_fund(&self) -> &str {
        &self.from_fund
    }

    pub fn to_fund(&self) -> &str {
        &self.to_fund
    }

    pub fn frequency(&self) -> &str {
        &self.frequency
    }

    pub fn next_transaction_date(&self) -> NaiveDate {
        self.next_transaction_date
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// An STP plan as stored in the ledger, joined with its client's name for
/// presentation.
#[derive(Clone, Debug)]
pub struct StpPlan {
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

/// Dashboard statistics over an account holder's STP plans.
#[derive(Clone, Debug, PartialEq)]
pub struct StpSummary {
    pub active_stps: i64,
    pub executing_today: i64,
    pub expiring_next_3_months: i64,
    pub zero_balance_count: i64,
    pub monthly_trends: Vec<MonthlyTrend>,
}

/// One calendar month of executed-transfer totals.
#[derive(Clone, Debug, PartialEq)]
pub struct MonthlyTrend {
    /// Month label formatted as `YYYY-MM`.
    pub month: String,
    pub amount: Decimal,
    pub count: i64,
}

/// Longest trend window the aggregator will compute. The `months` request
/// parameter is caller-controlled, so the window must stay bounded.
pub const MAX_TREND_MONTHS: u32 = 120;

/// The first day of each calendar month in a trailing window ending with the
/// month containing `today`, oldest first. The window is clamped to
/// [`MAX_TREND_MONTHS`].
pub fn month_window(today: NaiveDate, months_back: u32) -> Vec<NaiveDate> {
    let current = match NaiveDate::from_ymd_opt(today.year(), today.month(), 1) {
        Some(date) => date,
        None => return Vec::new(),
    };

    (0..months_back.clamp(1, MAX_TREND_MONTHS))
        .rev()
        .filter_map(|offset| current.checked_sub_months(Months::new(offset)))
        .collect()
}

/// Format a month bucket key the way the trend queries do.
pub fn month_label(month_start: NaiveDate) -> String {
    month_start.format("%Y-%m").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn frequency_parse_is_case_insensitive() {
        assert_eq!(Some(Frequency::Daily), Frequency::parse("daily"));
        assert_eq!(Some(Frequency::Weekly), Frequency::parse("WEEKLY"));
        assert_eq!(Some(Frequency::Monthly), Frequency::parse("Monthly"));
        assert_eq!(Some(Frequency::Quarterly), Frequency::parse(" quarterly "));
        assert_eq!(None, Frequency::parse("fortnightly"));
        assert_eq!(None, Frequency::parse(""));
    }

    #[test]
    fn next_date_advances_one_period() {
        let due = date(2024, 1, 15);

        assert_eq!(
            Some(date(2024, 1, 16)),
            Frequency::Daily.next_date(due),
        );
        assert_eq!(
            Some(date(2024, 1, 22)),
            Frequency::Weekly.next_date(due),
        );
        assert_eq!(
            Some(date(2024, 2, 15)),
            Frequency::Monthly.next_date(due),
        );
        assert_eq!(
            Some(date(2024, 4, 15)),
            Frequency::Quarterly.next_date(due),
        );
    }

    #[test]
    fn next_date_clamps_at_short_month_ends() {
        assert_eq!(
            Some(date(2024, 2, 29)),
            Frequency::Monthly.next_date(date(2024, 1, 31)),
        );
    }

    #[test]
    fn next_date_crosses_year_boundaries() {
        assert_eq!(
            Some(date(2024, 2, 15)),
            Frequency::Quarterly.next_date(date(2023, 11, 15)),
        );
        assert_eq!(
            Some(date(2024, 1, 1)),
            Frequency::Daily.next_date(date(2023, 12, 31)),
        );
    }

    #[test]
    fn transfer_requires_positive_amount() {
        let error = StpTransfer::new(
            None,
            1,
            Decimal::ZERO,
            "F1".to_owned(),
            "F2".to_owned(),
            "MONTHLY".to_owned(),
            date(2024, 1, 15),
            None,
            date(2024, 6, 15),
            None,
        )
        .expect_err("zero amount should be rejected");

        assert!(matches!(error, StpError::InvalidTransaction(_)));
    }

    #[test]
    fn transfer_requires_both_funds() {
        let error = StpTransfer::new(
            None,
            1,
            Decimal::new(400, 0),
            "F1".to_owned(),
            "  ".to_owned(),
            "MONTHLY".to_owned(),
            date(2024, 1, 15),
            None,
            date(2024, 6, 15),
            None,
        )
        .expect_err("blank target fund should be rejected");

        assert!(matches!(error, StpError::InvalidTransaction(_)));
    }

    #[test]
    fn month_window_is_chronological() {
        let window = month_window(date(2024, 3, 10), 6);

        let labels: Vec<String> = window.into_iter().map(month_label).collect();
        assert_eq!(
            vec!["2023-10", "2023-11", "2023-12", "2024-01", "2024-02", "2024-03"],
            labels,
        );
    }

    #[test]
    fn month_window_never_empty() {
        let window = month_window(date(2024, 3, 10), 0);

        assert_eq!(1, window.len());
        assert_eq!("2024-03", month_label(window[0]));
    }

    #[test]
    fn month_window_clamps_oversized_requests() {
        let window = month_window(date(2024, 3, 10), u32::MAX);

        assert_eq!(MAX_TREND_MONTHS as usize, window.len());
        assert_eq!("2024-03", month_label(*window.last().unwrap()));
    }
}
