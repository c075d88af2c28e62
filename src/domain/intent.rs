//! Position intent of an execution.

use std::fmt;

/// Whether an execution opens or reduces a position, and on which side.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PositionIntent {
    EntryBuy,
    EntrySell,
    CloseBuy,
    CloseSell,
    /// Any intent the matcher does not account for; carried verbatim.
    Other(String),
}

impl PositionIntent {
    /// Parse an intent string. Accepts both the canonical names and the
    /// broker wire names (`buy_to_open`, `sell_to_close`, ...).
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "entry_buy" | "buy_to_open" => PositionIntent::EntryBuy,
            "entry_sell" | "sell_to_open" => PositionIntent::EntrySell,
            "close_buy" | "buy_to_close" => PositionIntent::CloseBuy,
            "close_sell" | "sell_to_close" => PositionIntent::CloseSell,
            _ => PositionIntent::Other(raw.to_string()),
        }
    }

    pub fn is_entry(&self) -> bool {
        matches!(self, PositionIntent::EntryBuy | PositionIntent::EntrySell)
    }

    pub fn is_close(&self) -> bool {
        matches!(self, PositionIntent::CloseBuy | PositionIntent::CloseSell)
    }

    pub fn is_recognized(&self) -> bool {
        self.is_entry() || self.is_close()
    }

    pub fn as_str(&self) -> &str {
        match self {
            PositionIntent::EntryBuy => "entry_buy",
            PositionIntent::EntrySell => "entry_sell",
            PositionIntent::CloseBuy => "close_buy",
            PositionIntent::CloseSell => "close_sell",
            PositionIntent::Other(raw) => raw,
        }
    }
}

impl fmt::Display for PositionIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
