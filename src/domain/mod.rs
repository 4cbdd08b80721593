//! Core domain types and logic.

pub mod ohlcv;
pub mod period;
pub mod indicator;
pub mod indicator_helpers;
pub mod metrics;
pub mod format;
pub mod fundamentals;
pub mod chart;
pub mod config_validation;
pub mod error;
