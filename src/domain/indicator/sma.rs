//! Simple Moving Average indicator.
//!
//! SMA(n)[i] = sum(C[i-n+1..=i]) / n
//! Warmup: first (n-1) bars have no value.

use crate::domain::indicator::{IndicatorColumn, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_sma(bars: &[OhlcvBar], period: usize) -> IndicatorColumn {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    IndicatorColumn::from_values(IndicatorType::Sma(period), bars, sma_values(&closes, period))
}

/// Trailing mean of `values`. A period of 0 yields no values at all.
pub(crate) fn sma_values(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|i| {
            if i + 1 < period {
                None
            } else {
                let window = &values[i + 1 - period..=i];
                Some(window.iter().sum::<f64>() / period as f64)
            }
        })
        .collect()
}
