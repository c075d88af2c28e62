//! Broker orders and the selection of executions and stops from them.
//!
//! Orders arrive in the broker's shape: multi-leg orders nest their legs.
//! [`flatten_orders`] unpacks them, stamping each leg with its parent id, and
//! the `select_*` functions turn the flat list into matcher input.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

use super::intent::PositionIntent;
use super::records::{ExecutionRecord, StopOrderRecord};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BrokerOrder {
    pub id: String,
    #[serde(default)]
    pub client_order_id: Option<String>,
    /// Set on legs once flattened; may also come straight from a flat source.
    #[serde(default)]
    pub parent_order_id: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub order_type: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub side: Option<String>,
    #[serde(default)]
    pub position_intent: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub qty: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub filled_qty: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub filled_avg_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub stop_price: Option<f64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub filled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub legs: Option<Vec<BrokerOrder>>,
}

impl BrokerOrder {
    /// Order type, preferring `order_type` over the older `type` field.
    pub fn order_type(&self) -> Option<&str> {
        self.order_type.as_deref().or(self.kind.as_deref())
    }

    pub fn is_filled(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("filled"))
    }

    pub fn is_stop(&self) -> bool {
        self.order_type()
            .is_some_and(|t| t.eq_ignore_ascii_case("stop"))
    }

    fn created_on_or_after(&self, from_date: NaiveDate) -> bool {
        self.created_at
            .is_some_and(|ts| ts.date_naive() >= from_date)
    }
}

/// Broker payloads encode numbers as strings; accept either, plus null and "".
/// Quantities and prices are finite and non-negative.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    let value = match Option::<Raw>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(Raw::Number(n)) => n,
        Some(Raw::Text(s)) if s.trim().is_empty() => return Ok(None),
        Some(Raw::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid number {s:?}: {e}")))?,
    };

    if !value.is_finite() || value < 0.0 {
        return Err(serde::de::Error::custom(format!(
            "expected a finite non-negative number, got {value}"
        )));
    }
    Ok(Some(value))
}

/// Each order followed by its legs, legs carrying `parent_order_id`.
pub fn flatten_orders(orders: &[BrokerOrder]) -> Vec<BrokerOrder> {
    let mut flat = Vec::with_capacity(orders.len());
    for order in orders {
        let mut top = order.clone();
        let legs = top.legs.take().unwrap_or_default();
        flat.push(top);

        for mut leg in legs {
            leg.legs = None;
            leg.parent_order_id = Some(order.id.clone());
            flat.push(leg);
        }
    }
    flat
}

/// Filled orders (and legs) with a symbol, created on or after `from_date`.
pub fn select_executions(orders: &[BrokerOrder], from_date: NaiveDate) -> Vec<ExecutionRecord> {
    flatten_orders(orders)
        .into_iter()
        .filter(|o| o.is_filled() && o.created_on_or_after(from_date))
        .filter_map(|o| {
            let symbol = o.symbol.clone()?;
            Some(ExecutionRecord {
                position_intent: PositionIntent::parse(o.position_intent.as_deref().unwrap_or("")),
                id: o.id,
                order_id: o.client_order_id,
                parent_order_id: o.parent_order_id,
                symbol,
                side: o.side,
                status: o.status,
                filled_qty: o.filled_qty,
                filled_avg_price: o.filled_avg_price,
                created_at: o.created_at,
                filled_at: o.filled_at,
            })
        })
        .collect()
}

/// Stop orders (and legs) with a symbol, created on or after `from_date`.
pub fn select_stop_orders(orders: &[BrokerOrder], from_date: NaiveDate) -> Vec<StopOrderRecord> {
    flatten_orders(orders)
        .into_iter()
        .filter(|o| o.is_stop() && o.created_on_or_after(from_date))
        .filter_map(|o| {
            let symbol = o.symbol.clone()?;
            let order_type = o.order_type().map(str::to_string);
            Some(StopOrderRecord {
                id: o.id,
                symbol,
                side: o.side,
                order_type,
                qty: o.qty,
                stop_price: o.stop_price,
                created_at: o.created_at,
            })
        })
        .collect()
}
