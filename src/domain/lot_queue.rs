//! FIFO queue of entry lots per symbol.

use std::collections::{BTreeMap, HashMap, VecDeque};

use super::records::{TaggedExecution, TradeId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntryLot {
    pub trade_id: TradeId,
    pub remaining: f64,
}

#[derive(Debug, Clone, Default)]
pub struct EntryLots {
    queues: HashMap<String, VecDeque<EntryLot>>,
}

impl EntryLots {
    /// Build one lot per `(symbol, trade_id)` from the entry executions,
    /// summing their quantities. Lots are queued in trade id order.
    pub fn from_executions(executions: &[TaggedExecution]) -> Self {
        let mut sums: BTreeMap<(&str, TradeId), f64> = BTreeMap::new();
        for tagged in executions {
            if !tagged.position_intent().is_entry() {
                continue;
            }
            if let Some(trade_id) = tagged.trade_id {
                *sums.entry((tagged.symbol(), trade_id)).or_insert(0.0) += tagged.filled_qty;
            }
        }

        let mut queues: HashMap<String, VecDeque<EntryLot>> = HashMap::new();
        for ((symbol, trade_id), entry_qty) in sums {
            queues.entry(symbol.to_string()).or_default().push_back(EntryLot {
                trade_id,
                remaining: entry_qty,
            });
        }

        EntryLots { queues }
    }

    /// Charge `qty` against the oldest open lot on `symbol` and return its
    /// trade id. The lot is removed once nothing remains; any excess is
    /// discarded rather than carried into the next lot.
    pub fn consume(&mut self, symbol: &str, qty: f64) -> Option<TradeId> {
        let queue = self.queues.get_mut(symbol)?;
        let head = queue.front_mut()?;
        let trade_id = head.trade_id;

        head.remaining -= qty;
        if head.remaining <= 0.0 {
            queue.pop_front();
        }

        Some(trade_id)
    }

    pub fn lots(&self, symbol: &str) -> Vec<EntryLot> {
        self.queues
            .get(symbol)
            .map(|queue| queue.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn is_empty(&self, symbol: &str) -> bool {
        self.queues.get(symbol).is_none_or(VecDeque::is_empty)
    }
}
