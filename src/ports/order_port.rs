//! Order source port trait.

use crate::domain::error::TradeTaggerError;
use crate::domain::order::BrokerOrder;

/// Supplies the brokerage's full order history, legs nested or flat.
pub trait OrderSource {
    fn fetch_orders(&self) -> Result<Vec<BrokerOrder>, TradeTaggerError>;
}
