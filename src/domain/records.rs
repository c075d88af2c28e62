//! Execution and stop-order records, raw and tagged.

use chrono::{DateTime, Utc};
use std::fmt;

use super::intent::PositionIntent;

/// Identifier of one open-to-flat position lifecycle on a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TradeId(pub u64);

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A filled order (or leg) as reported by the broker.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionRecord {
    pub id: String,
    pub order_id: Option<String>,
    pub parent_order_id: Option<String>,
    pub symbol: String,
    pub side: Option<String>,
    pub status: Option<String>,
    pub position_intent: PositionIntent,
    pub filled_qty: Option<f64>,
    pub filled_avg_price: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
    /// `None` sorts before every timestamp.
    pub filled_at: Option<DateTime<Utc>>,
}

impl ExecutionRecord {
    /// Filled quantity, with a missing value counted as zero.
    pub fn quantity(&self) -> f64 {
        self.filled_qty.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaggedExecution {
    pub execution: ExecutionRecord,
    pub filled_qty: f64,
    pub trade_id: Option<TradeId>,
}

impl TaggedExecution {
    pub fn symbol(&self) -> &str {
        &self.execution.symbol
    }

    pub fn position_intent(&self) -> &PositionIntent {
        &self.execution.position_intent
    }
}

/// A protective stop order as reported by the broker.
#[derive(Debug, Clone, PartialEq)]
pub struct StopOrderRecord {
    pub id: String,
    pub symbol: String,
    pub side: Option<String>,
    pub order_type: Option<String>,
    pub qty: Option<f64>,
    pub stop_price: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
}

impl StopOrderRecord {
    /// Order quantity, with a missing value counted as zero.
    pub fn quantity(&self) -> f64 {
        self.qty.unwrap_or(0.0)
    }
}

/// A stop order attributed to the entry lot it protects.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedStopOrder {
    pub stop: StopOrderRecord,
    pub qty: f64,
    pub trade_id: TradeId,
}
