//! OHLCV bar and validated price series.

use crate::domain::error::StockdashError;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// Ordered bars for one symbol. Dates are strictly increasing, prices are
/// positive and finite, and there is at least one bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    symbol: String,
    bars: Vec<OhlcvBar>,
}

impl Series {
    pub fn new(symbol: impl Into<String>, bars: Vec<OhlcvBar>) -> Result<Self, StockdashError> {
        let symbol = symbol.into();
        if bars.is_empty() {
            return Err(StockdashError::NoData { symbol });
        }

        if let Some(pair) = bars.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(StockdashError::InvalidSeries {
                reason: format!(
                    "dates must be strictly increasing ({} followed by {})",
                    pair[0].date, pair[1].date
                ),
            });
        }

        if let Some(bar) = bars
            .iter()
            .find(|b| [b.open, b.high, b.low, b.close].iter().any(|p| !p.is_finite() || *p <= 0.0))
        {
            return Err(StockdashError::InvalidSeries {
                reason: format!("prices on {} must be positive and finite", bar.date),
            });
        }

        if let Some(bar) = bars.iter().find(|b| b.volume < 0) {
            return Err(StockdashError::InvalidSeries {
                reason: format!("negative volume on {}", bar.date),
            });
        }

        Ok(Self { symbol, bars })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[OhlcvBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always false: a `Series` cannot be built from zero bars.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.bars[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.bars[self.bars.len() - 1].date
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }
}
