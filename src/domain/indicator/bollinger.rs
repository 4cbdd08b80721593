//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! Where StdDev is the sample standard deviation (divides by N-1).
//!
//! Default parameters: period=20, multiplier=2.0
//! Warmup: first (period-1) bars have no value.

use crate::domain::indicator::sma::sma_values;
use crate::domain::indicator::stddev::rolling_sample_stddev;
use crate::domain::indicator::{IndicatorColumn, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_STDDEV_MULT_X100: u32 = 200;

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub upper: IndicatorColumn,
    pub middle: IndicatorColumn,
    pub lower: IndicatorColumn,
}

pub fn calculate_bollinger(
    bars: &[OhlcvBar],
    period: usize,
    stddev_mult_x100: u32,
) -> BollingerBands {
    let mult = stddev_mult_x100 as f64 / 100.0;
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

    let middle = sma_values(&closes, period);
    let stddev = rolling_sample_stddev(&closes, period);

    let mut upper = Vec::with_capacity(bars.len());
    let mut lower = Vec::with_capacity(bars.len());
    for (m, s) in middle.iter().zip(&stddev) {
        match (m, s) {
            (Some(m), Some(s)) => {
                let width = mult * s;
                upper.push(Some(m + width));
                lower.push(Some(m - width));
            }
            _ => {
                upper.push(None);
                lower.push(None);
            }
        }
    }

    BollingerBands {
        upper: IndicatorColumn::from_values(IndicatorType::BollingerUpper(period), bars, upper),
        middle: IndicatorColumn::from_values(IndicatorType::BollingerMiddle(period), bars, middle),
        lower: IndicatorColumn::from_values(IndicatorType::BollingerLower(period), bars, lower),
    }
}
