//! Port traits (interfaces) for hexagonal architecture.

pub mod config_port;
pub mod order_port;
pub mod store_port;
