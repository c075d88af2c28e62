//! Flat CSV order file adapter.
//!
//! One row per order or leg. Columns are matched by header name; a
//! `parent_order_id` column links legs to their multi-leg parent. Unknown
//! columns are ignored and empty cells read as missing.

use crate::domain::error::TradeTaggerError;
use crate::domain::order::BrokerOrder;
use crate::ports::order_port::OrderSource;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    path: PathBuf,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn input_error(&self, reason: String) -> TradeTaggerError {
        TradeTaggerError::Input {
            file: self.path.display().to_string(),
            reason,
        }
    }
}

impl OrderSource for CsvAdapter {
    fn fetch_orders(&self) -> Result<Vec<BrokerOrder>, TradeTaggerError> {
        let content = fs::read_to_string(&self.path)
            .map_err(|e| self.input_error(format!("failed to read: {e}")))?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let mut orders = Vec::new();
        for (index, result) in rdr.deserialize::<BrokerOrder>().enumerate() {
            let order = result
                .map_err(|e| self.input_error(format!("CSV parse error at row {}: {e}", index + 1)))?;
            orders.push(order);
        }

        Ok(orders)
    }
}
