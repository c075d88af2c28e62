#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use std::cell::Cell;
use tradetagger::domain::error::TradeTaggerError;
use tradetagger::domain::intent::PositionIntent;
use tradetagger::domain::order::BrokerOrder;
use tradetagger::domain::records::{ExecutionRecord, StopOrderRecord, TaggedExecution};
use tradetagger::ports::order_port::OrderSource;

pub fn ts(minute: u32) -> Option<DateTime<Utc>> {
    Some(Utc.with_ymd_and_hms(2026, 3, 2, 14, 0, 0).unwrap() + chrono::Duration::minutes(minute as i64))
}

pub fn exec(id: &str, symbol: &str, intent: &str, qty: f64, minute: u32) -> ExecutionRecord {
    ExecutionRecord {
        id: id.to_string(),
        order_id: Some(format!("client-{id}")),
        parent_order_id: None,
        symbol: symbol.to_string(),
        side: None,
        status: Some("filled".to_string()),
        position_intent: PositionIntent::parse(intent),
        filled_qty: Some(qty),
        filled_avg_price: Some(100.0),
        created_at: ts(minute),
        filled_at: ts(minute),
    }
}

pub fn leg(id: &str, parent: &str, symbol: &str, intent: &str, qty: f64, minute: u32) -> ExecutionRecord {
    let mut record = exec(id, symbol, intent, qty, minute);
    record.parent_order_id = Some(parent.to_string());
    record
}

pub fn stop(id: &str, symbol: &str, qty: f64, minute: u32) -> StopOrderRecord {
    StopOrderRecord {
        id: id.to_string(),
        symbol: symbol.to_string(),
        side: Some("sell".to_string()),
        order_type: Some("stop".to_string()),
        qty: Some(qty),
        stop_price: Some(95.0),
        created_at: ts(minute),
    }
}

pub fn trade_ids(tagged: &[TaggedExecution]) -> Vec<Option<u64>> {
    tagged.iter().map(|t| t.trade_id.map(|id| id.0)).collect()
}

/// Broker-shaped JSON for a small history on AAPL and SPY:
/// an AAPL round trip with a protective stop, a re-entry still open, and a
/// two-leg SPY order.
pub const ORDERS_JSON: &str = r#"[
    {"id": "a1", "client_order_id": "c-a1", "symbol": "AAPL", "status": "filled",
     "order_type": "market", "side": "buy", "position_intent": "buy_to_open",
     "qty": "10", "filled_qty": "10", "filled_avg_price": "187.10",
     "created_at": "2026-03-02T14:30:00Z", "filled_at": "2026-03-02T14:30:01Z"},
    {"id": "a-stop", "symbol": "AAPL", "status": "canceled", "order_type": "stop",
     "side": "sell", "qty": "10", "filled_qty": "0", "stop_price": "180.00",
     "created_at": "2026-03-02T14:31:00Z"},
    {"id": "a2", "client_order_id": "c-a2", "symbol": "AAPL", "status": "filled",
     "order_type": "market", "side": "sell", "position_intent": "sell_to_close",
     "qty": "10", "filled_qty": "10", "filled_avg_price": "190.00",
     "created_at": "2026-03-03T15:00:00Z", "filled_at": "2026-03-03T15:00:02Z"},
    {"id": "a3", "client_order_id": "c-a3", "symbol": "AAPL", "status": "filled",
     "order_type": "market", "side": "buy", "position_intent": "buy_to_open",
     "qty": "5", "filled_qty": "5", "filled_avg_price": "189.00",
     "created_at": "2026-03-04T14:35:00Z", "filled_at": "2026-03-04T14:35:01Z"},
    {"id": "spread", "client_order_id": "c-spread", "symbol": "SPY", "status": "filled",
     "order_type": "limit", "side": "buy", "qty": "1", "filled_qty": "1",
     "created_at": "2026-03-04T16:00:00Z", "filled_at": "2026-03-04T16:00:03Z",
     "legs": [
        {"id": "spread-l1", "symbol": "SPY", "status": "filled", "order_type": "limit",
         "side": "buy", "position_intent": "buy_to_open", "qty": "3", "filled_qty": "3",
         "created_at": "2026-03-04T16:00:00Z", "filled_at": "2026-03-04T16:00:03Z"},
        {"id": "spread-l2", "symbol": "SPY", "status": "filled", "order_type": "limit",
         "side": "buy", "position_intent": "buy_to_open", "qty": "2", "filled_qty": "2",
         "created_at": "2026-03-04T16:00:00Z", "filled_at": "2026-03-04T16:00:03Z"}
     ]},
    {"id": "m-stop", "symbol": "MSFT", "status": "new", "order_type": "stop",
     "side": "sell", "qty": "4", "stop_price": "400",
     "created_at": "2026-03-04T17:00:00Z"},
    {"id": "ancient", "symbol": "AAPL", "status": "filled", "position_intent": "buy_to_open",
     "filled_qty": "100", "created_at": "2025-12-01T14:30:00Z",
     "filled_at": "2025-12-01T14:30:01Z"}
]"#;

pub fn sample_orders() -> Vec<BrokerOrder> {
    serde_json::from_str(ORDERS_JSON).unwrap()
}

pub struct MockOrderSource {
    pub orders: Vec<BrokerOrder>,
    pub fail_on: Vec<u64>,
    pub calls: Cell<u64>,
}

impl MockOrderSource {
    pub fn new(orders: Vec<BrokerOrder>) -> Self {
        Self {
            orders,
            fail_on: Vec::new(),
            calls: Cell::new(0),
        }
    }

    /// Fail the given (1-based) fetch attempts.
    pub fn failing_on(mut self, attempts: &[u64]) -> Self {
        self.fail_on = attempts.to_vec();
        self
    }
}

impl OrderSource for MockOrderSource {
    fn fetch_orders(&self) -> Result<Vec<BrokerOrder>, TradeTaggerError> {
        let attempt = self.calls.get() + 1;
        self.calls.set(attempt);
        if self.fail_on.contains(&attempt) {
            return Err(TradeTaggerError::Input {
                file: "mock".to_string(),
                reason: format!("fetch {attempt} failed"),
            });
        }
        Ok(self.orders.clone())
    }
}
