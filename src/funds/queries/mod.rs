//! Read-only access to fund balances.

pub mod postgres;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use super::models::FundBalance;

pub type DynFundBalanceQueries = Arc<dyn FundBalanceQueries + Send + Sync>;

#[async_trait]
pub trait FundBalanceQueries {
    /// Fetch the balance a client holds in a specific fund, if any.
    async fn find_balance(&self, client_id: i64, fund_id: &str) -> Result<Option<FundBalance>>;

    /// All fund balances held by a client.
    async fn list_for_client(&self, client_id: i64) -> Result<Vec<FundBalance>>;
}
