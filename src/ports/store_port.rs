//! Persistence port trait for tagged records.

use crate::domain::account::Account;
use crate::domain::error::TradeTaggerError;
use crate::domain::records::{TaggedExecution, TaggedStopOrder};
use crate::domain::trade_summary::TradeSummary;

/// Idempotent store keyed by the broker's natural ids.
///
/// Upserts return how many rows were newly inserted; rows already present
/// have their trade id refreshed from the latest derivation.
pub trait TradeStore {
    fn initialize_schema(&self) -> Result<(), TradeTaggerError>;

    fn upsert_account(&self, account: &Account) -> Result<(), TradeTaggerError>;

    fn upsert_executions(
        &self,
        executions: &[TaggedExecution],
        account_number: &str,
    ) -> Result<usize, TradeTaggerError>;

    fn upsert_stop_orders(
        &self,
        stops: &[TaggedStopOrder],
        account_number: &str,
    ) -> Result<usize, TradeTaggerError>;

    fn trade_summaries(&self, account_number: &str) -> Result<Vec<TradeSummary>, TradeTaggerError>;
}
