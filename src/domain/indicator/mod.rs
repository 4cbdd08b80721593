//! Technical indicator implementations.
//!
//! This module provides types for representing derived indicator columns:
//! - `IndicatorPoint`: one position of a column, `None` inside the warm-up prefix
//! - `IndicatorType`: column identity + parameters (serves as map key)
//! - `IndicatorColumn`: a column aligned 1:1 with the source bars
//!
//! Every calculation reads `&[OhlcvBar]` and returns a freshly built column;
//! the input bars are never modified.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub(crate) mod stddev;

pub use bollinger::{calculate_bollinger, BollingerBands};
pub use ema::calculate_ema;
pub use macd::{calculate_macd, MacdColumns};
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;

use crate::domain::ohlcv::OhlcvBar;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    BollingerUpper(usize),
    BollingerMiddle(usize),
    BollingerLower(usize),
    Rsi(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    MacdSignal {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    MacdHistogram {
        fast: usize,
        slow: usize,
        signal: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorColumn {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorColumn {
    /// Zip raw values with the bar dates. `values` must have one entry per bar.
    pub(crate) fn from_values(
        indicator_type: IndicatorType,
        bars: &[OhlcvBar],
        values: Vec<Option<f64>>,
    ) -> Self {
        debug_assert_eq!(bars.len(), values.len());
        let values = bars
            .iter()
            .zip(values)
            .map(|(bar, value)| IndicatorPoint {
                date: bar.date,
                value,
            })
            .collect();
        Self {
            indicator_type,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn value_at(&self, index: usize) -> Option<f64> {
        self.values.get(index).and_then(|p| p.value)
    }

    /// Number of leading positions without a value.
    pub fn warmup_len(&self) -> usize {
        self.values.iter().take_while(|p| p.value.is_none()).count()
    }

    pub fn raw_values(&self) -> Vec<Option<f64>> {
        self.values.iter().map(|p| p.value).collect()
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA_{}", period),
            IndicatorType::Ema(period) => write!(f, "EMA_{}", period),
            IndicatorType::BollingerUpper(period) => write!(f, "BB_upper_{}", period),
            IndicatorType::BollingerMiddle(period) => write!(f, "BB_middle_{}", period),
            IndicatorType::BollingerLower(period) => write!(f, "BB_lower_{}", period),
            IndicatorType::Rsi(period) => write!(f, "RSI_{}", period),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD_{}_{}_{}", fast, slow, signal)
            }
            IndicatorType::MacdSignal { fast, slow, signal } => {
                write!(f, "MACD_Signal_{}_{}_{}", fast, slow, signal)
            }
            IndicatorType::MacdHistogram { fast, slow, signal } => {
                write!(f, "MACD_Hist_{}_{}_{}", fast, slow, signal)
            }
        }
    }
}
