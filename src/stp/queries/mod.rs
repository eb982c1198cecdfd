//! Read-side queries over an account holder's STP plans.
//!
//! Queries never modify data. All of them scope through the client -> user
//! ownership chain of the account holder.

pub mod postgres;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use super::models::{MonthlyTotalRow, StpPlanRow};

pub type DynStpQueries = Arc<dyn StpQueries + Send + Sync>;

#[async_trait]
pub trait StpQueries {
    /// Count ACTIVE STP plans that have not yet expired (end date strictly
    /// after `today`).
    async fn count_active_plans(&self, user_id: i64, today: NaiveDate) -> Result<i64>;

    /// Count ACTIVE STP plans due to execute on `today`.
    async fn count_executing_on(&self, user_id: i64, today: NaiveDate) -> Result<i64>;

    /// Count ACTIVE STP plans whose end date falls within `[from, until]`.
    async fn count_expiring_between(
        &self,
        user_id: i64,
        from: NaiveDate,
        until: NaiveDate,
    ) -> Result<i64>;

    /// Count ACTIVE STP plans whose source fund balance is zero. A plan
    /// whose source fund has no balance row at all also counts.
    async fn count_unfunded_plans(&self, user_id: i64) -> Result<i64>;

    /// Per-month totals of COMPLETED STP transactions on or after
    /// `window_start`, sparse and keyed by `YYYY-MM`.
    async fn monthly_completed_totals(
        &self,
        user_id: i64,
        window_start: NaiveDate,
    ) -> Result<Vec<MonthlyTotalRow>>;

    /// All STP plans belonging to the account holder's clients.
    async fn list_plans(&self, user_id: i64) -> Result<Vec<StpPlanRow>>;
}
