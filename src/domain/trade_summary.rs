//! Per-trade rollup of tagged executions and stops.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use super::records::{TaggedExecution, TaggedStopOrder, TradeId};

#[derive(Debug, Clone, PartialEq)]
pub struct TradeSummary {
    pub trade_id: TradeId,
    pub symbol: String,
    pub entry_qty: f64,
    pub close_qty: f64,
    pub executions: usize,
    pub stops: usize,
    pub opened_at: Option<DateTime<Utc>>,
    pub last_fill_at: Option<DateTime<Utc>>,
}

impl TradeSummary {
    fn new(trade_id: TradeId, symbol: &str) -> Self {
        TradeSummary {
            trade_id,
            symbol: symbol.to_string(),
            entry_qty: 0.0,
            close_qty: 0.0,
            executions: 0,
            stops: 0,
            opened_at: None,
            last_fill_at: None,
        }
    }

    /// Entry quantity not yet offset by closes, floored at zero.
    pub fn open_qty(&self) -> f64 {
        (self.entry_qty - self.close_qty).max(0.0)
    }

    pub fn is_flat(&self) -> bool {
        self.open_qty() == 0.0
    }
}

/// Summaries ordered by trade id. Executions without a trade id are skipped.
pub fn summarize(executions: &[TaggedExecution], stops: &[TaggedStopOrder]) -> Vec<TradeSummary> {
    let mut trades: BTreeMap<TradeId, TradeSummary> = BTreeMap::new();

    for tagged in executions {
        let Some(trade_id) = tagged.trade_id else {
            continue;
        };
        let summary = trades
            .entry(trade_id)
            .or_insert_with(|| TradeSummary::new(trade_id, tagged.symbol()));

        summary.executions += 1;
        if tagged.position_intent().is_entry() {
            summary.entry_qty += tagged.filled_qty;
        } else {
            summary.close_qty += tagged.filled_qty;
        }

        let filled_at = tagged.execution.filled_at;
        if summary.opened_at.is_none() {
            summary.opened_at = filled_at;
        }
        if filled_at > summary.last_fill_at {
            summary.last_fill_at = filled_at;
        }
    }

    for tagged in stops {
        trades
            .entry(tagged.trade_id)
            .or_insert_with(|| TradeSummary::new(tagged.trade_id, &tagged.stop.symbol))
            .stops += 1;
    }

    trades.into_values().collect()
}
