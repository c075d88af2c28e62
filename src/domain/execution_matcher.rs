//! Assigns trade ids to executions.
//!
//! Executions with an entry or close intent are replayed in fill order
//! against a fresh [`Scoreboard`]. Legs of a multi-leg order inherit the
//! trade id of the first leg seen for their parent and leave the scoreboard
//! untouched.

use std::collections::HashMap;

use super::records::{ExecutionRecord, TaggedExecution, TradeId};
use super::scoreboard::Scoreboard;

/// Tag every recognized execution with the trade it belongs to.
///
/// Records with an unrecognized intent are dropped. The output is sorted by
/// `filled_at` (missing timestamps first), ties kept in input order.
pub fn match_executions(executions: Vec<ExecutionRecord>) -> Vec<TaggedExecution> {
    let mut rows: Vec<ExecutionRecord> = executions
        .into_iter()
        .filter(|e| e.position_intent.is_recognized())
        .collect();
    rows.sort_by_key(|e| e.filled_at);

    let mut scoreboard = Scoreboard::new();
    let mut parents: HashMap<String, TradeId> = HashMap::new();
    let mut tagged = Vec::with_capacity(rows.len());

    for execution in rows {
        let filled_qty = execution.quantity();

        if let Some(&trade_id) = execution
            .parent_order_id
            .as_ref()
            .and_then(|parent| parents.get(parent))
        {
            tagged.push(TaggedExecution {
                execution,
                filled_qty,
                trade_id: Some(trade_id),
            });
            continue;
        }

        if execution.position_intent.is_entry() {
            scoreboard.apply_entry(&execution.symbol, filled_qty);
        } else {
            scoreboard.apply_close(&execution.symbol, filled_qty);
        }

        let trade_id = scoreboard.trade_id(&execution.symbol);

        if let (Some(parent), Some(id)) = (&execution.parent_order_id, trade_id) {
            parents.insert(parent.clone(), id);
        }

        tagged.push(TaggedExecution {
            execution,
            filled_qty,
            trade_id,
        });
    }

    tagged
}
