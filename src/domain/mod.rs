//! Core domain types and logic.

pub mod account;
pub mod config_validation;
pub mod error;
pub mod execution_matcher;
pub mod intent;
pub mod lot_queue;
pub mod order;
pub mod records;
pub mod scoreboard;
pub mod stop_matcher;
pub mod trade_summary;
