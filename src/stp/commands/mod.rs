//! Write-side operations of the STP engine.

pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use super::{
    domain::{Frequency, StpError, StpTransfer},
    models::StpPlanRow,
};

pub type DynStpCommands = Arc<dyn StpCommands + Send + Sync>;

#[async_trait]
pub trait StpCommands {
    /// Apply a validated transfer as a single atomic unit: debit the source
    /// fund balance, credit (or lazily create) the target fund balance, stamp
    /// both balances with `today`, and persist the plan's advanced schedule.
    ///
    /// Implementations must guarantee all-or-nothing semantics for the three
    /// writes, serialize concurrent transfers against the same source balance
    /// row, and re-check sufficiency of the source balance while holding that
    /// serialization so the balance can never go negative. When the transfer
    /// carries an existing plan id, only an ACTIVE STP row may be updated;
    /// any other row fails the transfer with NotFound.
    async fn execute_transfer(
        &self,
        transfer: &StpTransfer,
        frequency: Frequency,
        next_date: NaiveDate,
        today: NaiveDate,
    ) -> Result<StpPlanRow, StpError>;
}
