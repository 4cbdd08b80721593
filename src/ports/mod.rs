//! Port traits the domain is driven through.

pub mod config_port;
pub mod market_data_port;
pub mod store_port;
