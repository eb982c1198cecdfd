use std::collections::HashMap;

use chrono::{Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::{directory::queries::DynDirectoryQueries, funds::queries::DynFundBalanceQueries};

use super::{
    commands::DynStpCommands,
    domain::{month_label, month_window, Frequency, MonthlyTrend, StpError, StpPlan, StpSummary, StpTransfer},
    queries::DynStpQueries,
};

/// Trailing months covered by the summary trend when the caller does not ask
/// for a specific window.
pub const DEFAULT_TREND_MONTHS: u32 = 12;

/// The STP validation/execution engine and its read-side aggregator.
///
/// Every operation takes the calling account holder's ID explicitly; there is
/// no ambient "current caller" state. The `_on` variants take the business
/// date as an argument, the public methods use today's date.
#[derive(Clone)]
pub struct StpService {
    directory: DynDirectoryQueries,
    funds: DynFundBalanceQueries,
    queries: DynStpQueries,
    commands: DynStpCommands,
}

impl StpService {
    pub fn new(
        directory: DynDirectoryQueries,
        funds: DynFundBalanceQueries,
        queries: DynStpQueries,
        commands: DynStpCommands,
    ) -> Self {
        Self {
            directory,
            funds,
            queries,
            commands,
        }
    }

    /// Check a proposed transfer against current balances and dates without
    /// performing any writes. Safe to call repeatedly.
    pub async fn validate(&self, user_id: i64, transfer: &StpTransfer) -> Result<(), StpError> {
        self.validate_on(user_id, transfer, Utc::now().date_naive())
            .await
    }

    pub async fn validate_on(
        &self,
        user_id: i64,
        transfer: &StpTransfer,
        today: NaiveDate,
    ) -> Result<(), StpError> {
        let client = self
            .directory
            .get_client(user_id, transfer.client_id())
            .await?
            .ok_or_else(|| {
                StpError::not_found(format!("Client {} not found", transfer.client_id()))
            })?;

        let source = self
            .funds
            .find_balance(client.id, transfer.from_fund())
            .await?
            .ok_or_else(|| StpError::invalid("Source fund balance not found"))?;

        if source.balance < transfer.amount() {
            return Err(StpError::insufficient(
                "Insufficient balance in source fund",
            ));
        }

        if transfer.end_date() < today {
            return Err(StpError::invalid("STP end date cannot be in the past"));
        }

        Ok(())
    }

    /// Execute a transfer: validate it, then atomically move the amount
    /// between the two fund balances and advance the plan's schedule. Any
    /// failure leaves every balance and the ledger untouched.
    pub async fn execute(&self, user_id: i64, transfer: &StpTransfer) -> Result<StpPlan, StpError> {
        self.execute_on(user_id, transfer, Utc::now().date_naive())
            .await
    }

    pub async fn execute_on(
        &self,
        user_id: i64,
        transfer: &StpTransfer,
        today: NaiveDate,
    ) -> Result<StpPlan, StpError> {
        // The frequency must be checked before anything is written, so a bad
        // value can never surface after balances have already moved.
        let frequency = Frequency::parse(transfer.frequency())
            .ok_or_else(|| StpError::invalid("Invalid STP frequency"))?;

        self.validate_on(user_id, transfer, today).await?;

        let next_date = frequency
            .next_date(transfer.next_transaction_date())
            .ok_or_else(|| StpError::invalid("Next execution date out of range"))?;

        let plan = self
            .commands
            .execute_transfer(transfer, frequency, next_date, today)
            .await?;

        // Expired plans stay ACTIVE; the engine's refusal to run them is what
        // makes them inert.
        info!(
            user_id,
            plan_id = plan.id,
            amount = %transfer.amount(),
            %next_date,
            "STP transfer executed."
        );

        Ok(plan.into())
    }

    /// Dashboard statistics for an account holder: plan counts and a
    /// trailing monthly trend of completed transfers.
    pub async fn summary(
        &self,
        user_id: i64,
        months_back: u32,
    ) -> Result<StpSummary, StpError> {
        self.summary_on(user_id, months_back, Utc::now().date_naive())
            .await
    }

    pub async fn summary_on(
        &self,
        user_id: i64,
        months_back: u32,
        today: NaiveDate,
    ) -> Result<StpSummary, StpError> {
        debug!(user_id, months_back, %today, "Computing STP summary.");

        self.directory
            .get_user(user_id)
            .await?
            .ok_or_else(|| StpError::not_found(format!("Account holder {user_id} not found")))?;

        let horizon = today
            .checked_add_months(Months::new(3))
            .ok_or_else(|| StpError::invalid("Expiry horizon out of range"))?;

        let active_stps = self.queries.count_active_plans(user_id, today).await?;
        let executing_today = self.queries.count_executing_on(user_id, today).await?;
        let expiring_next_3_months = self
            .queries
            .count_expiring_between(user_id, today, horizon)
            .await?;
        let zero_balance_count = self.queries.count_unfunded_plans(user_id).await?;

        let window = month_window(today, months_back);
        let window_start = window.first().copied().unwrap_or(today);

        let buckets = self
            .queries
            .monthly_completed_totals(user_id, window_start)
            .await?;
        let by_month: HashMap<&str, (i64, Decimal)> = buckets
            .iter()
            .map(|bucket| (bucket.month.as_str(), (bucket.count, bucket.total_amount)))
            .collect();

        // Months with no completed transfers still appear, zeroed, so the
        // trend always has one entry per month in chronological order.
        let monthly_trends = window
            .iter()
            .map(|month_start| {
                let label = month_label(*month_start);
                let (count, amount) = by_month
                    .get(label.as_str())
                    .copied()
                    .unwrap_or((0, Decimal::ZERO));

                MonthlyTrend {
                    month: label,
                    amount,
                    count,
                }
            })
            .collect();

        debug!(
            user_id,
            active_stps, executing_today, expiring_next_3_months, zero_balance_count,
            "Computed STP summary counts."
        );

        Ok(StpSummary {
            active_stps,
            executing_today,
            expiring_next_3_months,
            zero_balance_count,
            monthly_trends,
        })
    }

    /// All STP plans belonging to the account holder, for list views.
    pub async fn list_plans(&self, user_id: i64) -> Result<Vec<StpPlan>, StpError> {
        self.directory
            .get_user(user_id)
            .await?
            .ok_or_else(|| StpError::not_found(format!("Account holder {user_id} not found")))?;

        let plans = self.queries.list_plans(user_id).await?;

        Ok(plans.into_iter().map(StpPlan::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::{NaiveDate, Utc};

    use crate::{
        directory::{
            models::{Client, User},
            queries::DirectoryQueries,
        },
        funds::{models::FundBalance, queries::FundBalanceQueries},
        stp::{
            commands::StpCommands,
            domain::MAX_TREND_MONTHS,
            models::{MonthlyTotalRow, StpPlanRow},
            queries::StpQueries,
        },
    };

    use super::*;

    const USER: i64 = 7;
    const CLIENT: i64 = 21;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn dec(value: i64) -> Decimal {
        Decimal::new(value, 0)
    }

    struct FakeDirectory {
        users: Vec<i64>,
        clients: Vec<(i64, i64)>,
    }

    impl FakeDirectory {
        fn with_holder() -> Self {
            Self {
                users: vec![USER],
                clients: vec![(USER, CLIENT)],
            }
        }
    }

    #[async_trait]
    impl DirectoryQueries for FakeDirectory {
        async fn get_user(&self, user_id: i64) -> Result<Option<User>> {
            Ok(self.users.contains(&user_id).then(|| User {
                id: user_id,
                email: format!("holder-{user_id}@example.com"),
                full_name: None,
                created_at: Utc::now(),
            }))
        }

        async fn get_client(&self, user_id: i64, client_id: i64) -> Result<Option<Client>> {
            Ok(self
                .clients
                .contains(&(user_id, client_id))
                .then(|| Client {
                    id: client_id,
                    user_id,
                    name: "Asha Mehta".to_owned(),
                    email: None,
                    created_at: Utc::now(),
                }))
        }

        async fn list_clients(&self, _user_id: i64) -> Result<Vec<Client>> {
            Ok(Vec::new())
        }
    }

    /// In-memory fund balances and plan rows with the same all-or-nothing
    /// transfer semantics as the storage layer.
    #[derive(Default)]
    struct FakeLedger {
        balances: Mutex<std::collections::HashMap<(i64, String), Decimal>>,
        plans: Mutex<Vec<StpPlanRow>>,
    }

    impl FakeLedger {
        fn with_balance(client_id: i64, fund: &str, balance: Decimal) -> Self {
            let ledger = Self::default();
            ledger
                .balances
                .lock()
                .unwrap()
                .insert((client_id, fund.to_owned()), balance);
            ledger
        }

        fn balance(&self, client_id: i64, fund: &str) -> Option<Decimal> {
            self.balances
                .lock()
                .unwrap()
                .get(&(client_id, fund.to_owned()))
                .copied()
        }

        fn plan_count(&self) -> usize {
            self.plans.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl FundBalanceQueries for FakeLedger {
        async fn find_balance(
            &self,
            client_id: i64,
            fund_id: &str,
        ) -> Result<Option<FundBalance>> {
            Ok(self.balance(client_id, fund_id).map(|balance| FundBalance {
                id: 1,
                fund_id: fund_id.to_owned(),
                client_id,
                balance,
                as_of_date: date(2024, 1, 1),
                last_updated: Utc::now(),
            }))
        }

        async fn list_for_client(&self, _client_id: i64) -> Result<Vec<FundBalance>> {
            Ok(Vec::new())
        }
    }

    #[async_trait]
    impl StpCommands for FakeLedger {
        async fn execute_transfer(
            &self,
            transfer: &StpTransfer,
            frequency: Frequency,
            next_date: NaiveDate,
            today: NaiveDate,
        ) -> Result<StpPlanRow, StpError> {
            let mut plans = self.plans.lock().unwrap();

            let existing = match transfer.id() {
                Some(id) => Some(
                    plans
                        .iter()
                        .position(|plan| {
                            plan.id == id && plan.status.eq_ignore_ascii_case("active")
                        })
                        .ok_or_else(|| {
                            StpError::not_found(format!(
                                "Active STP transaction {id} not found"
                            ))
                        })?,
                ),
                None => None,
            };

            let mut balances = self.balances.lock().unwrap();

            let source_key = (transfer.client_id(), transfer.from_fund().to_owned());
            let source = balances
                .get(&source_key)
                .copied()
                .ok_or_else(|| StpError::invalid("Source fund balance not found"))?;

            if source < transfer.amount() {
                return Err(StpError::insufficient(
                    "Insufficient balance in source fund",
                ));
            }

            let remaining = source - transfer.amount();
            balances.insert(source_key, remaining);

            let target_key = (transfer.client_id(), transfer.to_fund().to_owned());
            let target = balances.get(&target_key).copied().unwrap_or(Decimal::ZERO);
            balances.insert(target_key, target + transfer.amount());

            let row = StpPlanRow {
                id: transfer.id().unwrap_or(plans.len() as i64 + 1),
                client_id: transfer.client_id(),
                client_name: "Asha Mehta".to_owned(),
                amount: transfer.amount(),
                from_fund: Some(transfer.from_fund().to_owned()),
                to_fund: Some(transfer.to_fund().to_owned()),
                frequency: Some(frequency.as_str().to_owned()),
                next_transaction_date: Some(next_date),
                start_date: transfer.start_date().or(Some(today)),
                end_date: Some(transfer.end_date()),
                remaining_amount: Some(remaining),
                source_balance: Some(remaining),
                status: "ACTIVE".to_owned(),
            };
            match existing {
                Some(index) => plans[index] = row.clone(),
                None => plans.push(row.clone()),
            }

            Ok(row)
        }
    }

    /// Canned read-side results for summary tests.
    #[derive(Default)]
    struct CannedQueries {
        active: i64,
        executing: i64,
        expiring: i64,
        unfunded: i64,
        buckets: Vec<MonthlyTotalRow>,
    }

    #[async_trait]
    impl StpQueries for CannedQueries {
        async fn count_active_plans(&self, _user_id: i64, _today: NaiveDate) -> Result<i64> {
            Ok(self.active)
        }

        async fn count_executing_on(&self, _user_id: i64, _today: NaiveDate) -> Result<i64> {
            Ok(self.executing)
        }

        async fn count_expiring_between(
            &self,
            _user_id: i64,
            _from: NaiveDate,
            _until: NaiveDate,
        ) -> Result<i64> {
            Ok(self.expiring)
        }

        async fn count_unfunded_plans(&self, _user_id: i64) -> Result<i64> {
            Ok(self.unfunded)
        }

        async fn monthly_completed_totals(
            &self,
            _user_id: i64,
            _window_start: NaiveDate,
        ) -> Result<Vec<MonthlyTotalRow>> {
            Ok(self.buckets.clone())
        }

        async fn list_plans(&self, _user_id: i64) -> Result<Vec<StpPlanRow>> {
            Ok(Vec::new())
        }
    }

    fn service(ledger: Arc<FakeLedger>, queries: CannedQueries) -> StpService {
        StpService::new(
            Arc::new(FakeDirectory::with_holder()),
            ledger.clone(),
            Arc::new(queries),
            ledger,
        )
    }

    fn monthly_transfer(amount: Decimal, end_date: NaiveDate) -> StpTransfer {
        StpTransfer::new(
            None,
            CLIENT,
            amount,
            "F1".to_owned(),
            "F2".to_owned(),
            "MONTHLY".to_owned(),
            date(2024, 1, 15),
            None,
            end_date,
            None,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn execute_moves_amount_and_advances_schedule() {
        let ledger = Arc::new(FakeLedger::with_balance(CLIENT, "F1", dec(1000)));
        let service = service(ledger.clone(), CannedQueries::default());
        let transfer = monthly_transfer(dec(400), date(2024, 2, 14));

        let plan = service
            .execute_on(USER, &transfer, date(2024, 1, 15))
            .await
            .expect("transfer should succeed");

        assert_eq!(Some(dec(600)), ledger.balance(CLIENT, "F1"));
        assert_eq!(Some(dec(400)), ledger.balance(CLIENT, "F2"));
        assert_eq!(Some(date(2024, 2, 15)), plan.next_transaction_date);
        assert_eq!(Some(dec(600)), plan.source_balance);
        assert_eq!("ACTIVE", plan.status);
    }

    #[tokio::test]
    async fn execute_rejects_insufficient_balance_without_mutation() {
        let ledger = Arc::new(FakeLedger::with_balance(CLIENT, "F1", dec(100)));
        let service = service(ledger.clone(), CannedQueries::default());
        let transfer = monthly_transfer(dec(400), date(2024, 2, 14));

        let error = service
            .execute_on(USER, &transfer, date(2024, 1, 15))
            .await
            .expect_err("underfunded transfer should fail");

        assert!(matches!(error, StpError::InsufficientBalance(_)));
        assert_eq!(Some(dec(100)), ledger.balance(CLIENT, "F1"));
        assert_eq!(None, ledger.balance(CLIENT, "F2"));
        assert_eq!(0, ledger.plan_count());
    }

    #[tokio::test]
    async fn execute_rejects_expired_plan_without_mutation() {
        let ledger = Arc::new(FakeLedger::with_balance(CLIENT, "F1", dec(1000)));
        let service = service(ledger.clone(), CannedQueries::default());
        let transfer = monthly_transfer(dec(400), date(2023, 1, 1));

        let error = service
            .execute_on(USER, &transfer, date(2024, 1, 1))
            .await
            .expect_err("expired plan should fail");

        assert!(matches!(error, StpError::InvalidTransaction(_)));
        assert_eq!(Some(dec(1000)), ledger.balance(CLIENT, "F1"));
        assert_eq!(0, ledger.plan_count());
    }

    #[tokio::test]
    async fn execute_rejects_unknown_frequency_before_any_mutation() {
        let ledger = Arc::new(FakeLedger::with_balance(CLIENT, "F1", dec(1000)));
        let service = service(ledger.clone(), CannedQueries::default());
        let transfer = StpTransfer::new(
            None,
            CLIENT,
            dec(400),
            "F1".to_owned(),
            "F2".to_owned(),
            "fortnightly".to_owned(),
            date(2024, 1, 15),
            None,
            date(2024, 6, 15),
            None,
        )
        .unwrap();

        let error = service
            .execute_on(USER, &transfer, date(2024, 1, 15))
            .await
            .expect_err("unknown frequency should fail");

        assert!(matches!(error, StpError::InvalidTransaction(_)));
        assert_eq!(Some(dec(1000)), ledger.balance(CLIENT, "F1"));
        assert_eq!(None, ledger.balance(CLIENT, "F2"));
        assert_eq!(0, ledger.plan_count());
    }

    #[tokio::test]
    async fn execute_rejects_plan_id_of_inactive_row() {
        let ledger = Arc::new(FakeLedger::with_balance(CLIENT, "F1", dec(1000)));
        ledger.plans.lock().unwrap().push(StpPlanRow {
            id: 5,
            client_id: CLIENT,
            client_name: "Asha Mehta".to_owned(),
            amount: dec(400),
            from_fund: Some("F1".to_owned()),
            to_fund: Some("F2".to_owned()),
            frequency: Some("MONTHLY".to_owned()),
            next_transaction_date: Some(date(2024, 1, 15)),
            start_date: None,
            end_date: Some(date(2024, 6, 15)),
            remaining_amount: Some(dec(600)),
            source_balance: Some(dec(600)),
            status: "COMPLETED".to_owned(),
        });
        let service = service(ledger.clone(), CannedQueries::default());
        let transfer = StpTransfer::new(
            Some(5),
            CLIENT,
            dec(400),
            "F1".to_owned(),
            "F2".to_owned(),
            "MONTHLY".to_owned(),
            date(2024, 1, 15),
            None,
            date(2024, 6, 15),
            None,
        )
        .unwrap();

        let error = service
            .execute_on(USER, &transfer, date(2024, 1, 15))
            .await
            .expect_err("completed plan row should not be executable");

        assert!(matches!(error, StpError::NotFound(_)));
        assert_eq!(Some(dec(1000)), ledger.balance(CLIENT, "F1"));
        assert_eq!(None, ledger.balance(CLIENT, "F2"));
        assert_eq!(
            "COMPLETED",
            ledger.plans.lock().unwrap()[0].status,
        );
    }

    #[tokio::test]
    async fn execute_rejects_missing_source_balance() {
        let ledger = Arc::new(FakeLedger::default());
        let service = service(ledger.clone(), CannedQueries::default());
        let transfer = monthly_transfer(dec(400), date(2024, 6, 15));

        let error = service
            .execute_on(USER, &transfer, date(2024, 1, 15))
            .await
            .expect_err("missing source balance should fail");

        assert!(matches!(error, StpError::InvalidTransaction(_)));
        assert_eq!(0, ledger.plan_count());
    }

    #[tokio::test]
    async fn validate_is_repeatable_and_read_only() {
        let ledger = Arc::new(FakeLedger::with_balance(CLIENT, "F1", dec(1000)));
        let service = service(ledger.clone(), CannedQueries::default());
        let transfer = monthly_transfer(dec(400), date(2024, 6, 15));

        for _ in 0..3 {
            service
                .validate_on(USER, &transfer, date(2024, 1, 15))
                .await
                .expect("validation should pass");
        }

        assert_eq!(Some(dec(1000)), ledger.balance(CLIENT, "F1"));
        assert_eq!(None, ledger.balance(CLIENT, "F2"));
        assert_eq!(0, ledger.plan_count());
    }

    #[tokio::test]
    async fn validate_rejects_unknown_client() {
        let ledger = Arc::new(FakeLedger::with_balance(CLIENT, "F1", dec(1000)));
        let service = service(ledger, CannedQueries::default());
        let transfer = StpTransfer::new(
            None,
            99,
            dec(400),
            "F1".to_owned(),
            "F2".to_owned(),
            "MONTHLY".to_owned(),
            date(2024, 1, 15),
            None,
            date(2024, 6, 15),
            None,
        )
        .unwrap();

        let error = service
            .validate_on(USER, &transfer, date(2024, 1, 15))
            .await
            .expect_err("unknown client should fail");

        assert!(matches!(error, StpError::NotFound(_)));
    }

    #[tokio::test]
    async fn summary_rejects_unknown_account_holder() {
        let ledger = Arc::new(FakeLedger::default());
        let service = service(ledger, CannedQueries::default());

        let error = service
            .summary_on(42, 6, date(2024, 6, 15))
            .await
            .expect_err("unknown holder should fail");

        assert!(matches!(error, StpError::NotFound(_)));
    }

    #[tokio::test]
    async fn summary_clamps_oversized_trend_windows() {
        let ledger = Arc::new(FakeLedger::default());
        let service = service(ledger, CannedQueries::default());

        let summary = service
            .summary_on(USER, u32::MAX, date(2024, 6, 15))
            .await
            .expect("summary should succeed");

        assert_eq!(MAX_TREND_MONTHS as usize, summary.monthly_trends.len());
        assert_eq!("2024-06", summary.monthly_trends.last().unwrap().month);
    }

    #[tokio::test]
    async fn summary_densifies_the_trend_window() {
        let queries = CannedQueries {
            active: 3,
            executing: 1,
            expiring: 2,
            unfunded: 1,
            buckets: vec![
                MonthlyTotalRow {
                    month: "2024-02".to_owned(),
                    count: 2,
                    total_amount: dec(800),
                },
                MonthlyTotalRow {
                    month: "2024-05".to_owned(),
                    count: 1,
                    total_amount: dec(400),
                },
            ],
        };
        let ledger = Arc::new(FakeLedger::default());
        let service = service(ledger, queries);

        let summary = service
            .summary_on(USER, 6, date(2024, 6, 15))
            .await
            .expect("summary should succeed");

        assert_eq!(3, summary.active_stps);
        assert_eq!(1, summary.executing_today);
        assert_eq!(2, summary.expiring_next_3_months);
        assert_eq!(1, summary.zero_balance_count);

        let months: Vec<&str> = summary
            .monthly_trends
            .iter()
            .map(|trend| trend.month.as_str())
            .collect();
        assert_eq!(
            vec!["2024-01", "2024-02", "2024-03", "2024-04", "2024-05", "2024-06"],
            months,
        );

        assert_eq!(
            vec![
                (0, Decimal::ZERO),
                (2, dec(800)),
                (0, Decimal::ZERO),
                (0, Decimal::ZERO),
                (1, dec(400)),
                (0, Decimal::ZERO),
            ],
            summary
                .monthly_trends
                .iter()
                .map(|trend| (trend.count, trend.amount))
                .collect::<Vec<_>>(),
        );
    }
}
