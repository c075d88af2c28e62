//! Broker JSON order dump adapter.
//!
//! Reads a file holding the broker's order list as a JSON array, with
//! multi-leg orders nesting their legs.

use crate::domain::error::TradeTaggerError;
use crate::domain::order::BrokerOrder;
use crate::ports::order_port::OrderSource;
use std::fs;
use std::path::PathBuf;

pub struct JsonOrderAdapter {
    path: PathBuf,
}

impl JsonOrderAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl OrderSource for JsonOrderAdapter {
    fn fetch_orders(&self) -> Result<Vec<BrokerOrder>, TradeTaggerError> {
        let content = fs::read_to_string(&self.path).map_err(|e| TradeTaggerError::Input {
            file: self.path.display().to_string(),
            reason: format!("failed to read: {e}"),
        })?;

        serde_json::from_str(&content).map_err(|e| TradeTaggerError::Input {
            file: self.path.display().to_string(),
            reason: format!("JSON parse error: {e}"),
        })
    }
}
