//! Per-symbol position scoreboard.
//!
//! Tracks the currently open quantity of each symbol together with the trade
//! id of the position it belongs to. A new trade id is minted whenever an
//! entry arrives on a symbol that is flat.

use std::collections::HashMap;

use super::records::TradeId;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreboardEntry {
    pub trade_id: TradeId,
    pub open_qty: f64,
}

#[derive(Debug, Clone)]
pub struct Scoreboard {
    entries: HashMap<String, ScoreboardEntry>,
    next_trade_id: u64,
}

impl Default for Scoreboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Scoreboard {
    pub fn new() -> Self {
        Scoreboard {
            entries: HashMap::new(),
            next_trade_id: 1,
        }
    }

    /// Add an entry fill and return the trade id it belongs to. Negative or
    /// NaN quantities count as zero.
    pub fn apply_entry(&mut self, symbol: &str, qty: f64) -> TradeId {
        let qty = non_negative(qty);
        let entry = self
            .entries
            .entry(symbol.to_string())
            .or_insert(ScoreboardEntry {
                trade_id: TradeId(0),
                open_qty: 0.0,
            });

        if entry.open_qty == 0.0 {
            entry.trade_id = TradeId(self.next_trade_id);
            self.next_trade_id += 1;
        }

        entry.open_qty += qty;
        entry.trade_id
    }

    /// Reduce the open quantity of a symbol, flooring at zero. A close on a
    /// symbol that was never opened is ignored.
    pub fn apply_close(&mut self, symbol: &str, qty: f64) {
        let qty = non_negative(qty);
        if let Some(entry) = self.entries.get_mut(symbol) {
            entry.open_qty = (entry.open_qty - qty).max(0.0);
        }
    }

    pub fn trade_id(&self, symbol: &str) -> Option<TradeId> {
        self.entries.get(symbol).map(|entry| entry.trade_id)
    }

    pub fn open_qty(&self, symbol: &str) -> f64 {
        self.entries.get(symbol).map_or(0.0, |entry| entry.open_qty)
    }

    pub fn get(&self, symbol: &str) -> Option<&ScoreboardEntry> {
        self.entries.get(symbol)
    }
}

/// `f64::max` drops NaN in favour of the other operand.
fn non_negative(qty: f64) -> f64 {
    qty.max(0.0)
}
