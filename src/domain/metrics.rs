//! Summary statistics for a price series.

use crate::domain::indicator::stddev::sample_stddev;
use crate::domain::ohlcv::OhlcvBar;
use serde::Serialize;

/// Fixed set of scalar statistics over one series. `None` marks a metric the
/// series is too short to define.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSummary {
    /// Mean step-to-step close change, in percent.
    pub daily_returns: Option<f64>,
    /// Sample standard deviation of the same changes, in percent.
    pub volatility: Option<f64>,
    pub highest_price: Option<f64>,
    pub lowest_price: Option<f64>,
    pub average_volume: Option<f64>,
}

impl MetricsSummary {
    pub fn compute(bars: &[OhlcvBar]) -> Self {
        let changes = pct_changes(bars);

        let daily_returns = if changes.is_empty() {
            None
        } else {
            Some(changes.iter().sum::<f64>() / changes.len() as f64 * 100.0)
        };
        let volatility = sample_stddev(&changes).map(|s| s * 100.0);

        let highest_price = bars.iter().map(|b| b.high).reduce(f64::max);
        let lowest_price = bars.iter().map(|b| b.low).reduce(f64::min);
        let average_volume = if bars.is_empty() {
            None
        } else {
            Some(bars.iter().map(|b| b.volume as f64).sum::<f64>() / bars.len() as f64)
        };

        MetricsSummary {
            daily_returns,
            volatility,
            highest_price,
            lowest_price,
            average_volume,
        }
    }

    /// Label/value pairs in display order.
    pub fn rows(&self) -> Vec<(&'static str, Option<f64>)> {
        vec![
            ("Daily Returns", self.daily_returns),
            ("Volatility", self.volatility),
            ("Highest Price", self.highest_price),
            ("Lowest Price", self.lowest_price),
            ("Average Volume", self.average_volume),
        ]
    }
}

/// Fractional close-to-close changes. Steps from a zero close are skipped.
fn pct_changes(bars: &[OhlcvBar]) -> Vec<f64> {
    bars.windows(2)
        .filter_map(|w| {
            let prev = w[0].close;
            if prev == 0.0 {
                None
            } else {
                Some((w[1].close - prev) / prev)
            }
        })
        .collect()
}

/// Latest price and its change against the previous close.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceQuote {
    pub current_price: f64,
    pub change: Option<f64>,
    pub change_pct: Option<f64>,
}

impl PriceQuote {
    pub fn from_bars(bars: &[OhlcvBar]) -> Option<Self> {
        let last = bars.last()?;
        let previous = bars.len().checked_sub(2).map(|i| bars[i].close);

        let change = previous.map(|p| last.close - p);
        let change_pct = match (change, previous) {
            (Some(c), Some(p)) if p != 0.0 => Some(c / p * 100.0),
            _ => None,
        };

        Some(PriceQuote {
            current_price: last.close,
            change,
            change_pct,
        })
    }
}
