//! Attributes stop orders to the entry lots they protect.

use super::lot_queue::EntryLots;
use super::records::{StopOrderRecord, TaggedExecution, TaggedStopOrder};

/// Match each stop, oldest first, to the earliest entry lot on its symbol
/// that is not yet covered. Stops with no lot left are omitted.
pub fn match_stops(
    stops: Vec<StopOrderRecord>,
    tagged_executions: &[TaggedExecution],
) -> Vec<TaggedStopOrder> {
    let mut lots = EntryLots::from_executions(tagged_executions);

    let mut rows = stops;
    rows.sort_by_key(|s| s.created_at);

    rows.into_iter()
        .filter_map(|stop| {
            let qty = stop.quantity();
            lots.consume(&stop.symbol, qty)
                .map(|trade_id| TaggedStopOrder { stop, qty, trade_id })
        })
        .collect()
}
