//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seeded with the first close, then EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//! No warmup: EMA[0] == C[0].

use crate::domain::indicator::{IndicatorColumn, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_ema(bars: &[OhlcvBar], period: usize) -> IndicatorColumn {
    let values = if period == 0 {
        vec![None; bars.len()]
    } else {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        ema_values(&closes, period).into_iter().map(Some).collect()
    };

    IndicatorColumn::from_values(IndicatorType::Ema(period), bars, values)
}

/// Recursive EMA of `values` seeded with `values[0]`. `span` must be non-zero.
pub(crate) fn ema_values(values: &[f64], span: usize) -> Vec<f64> {
    let k = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;

    for &value in values {
        let ema = match prev {
            None => value,
            Some(p) => value * k + p * (1.0 - k),
        };
        out.push(ema);
        prev = Some(ema);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_bars(prices: &[f64]) -> Vec<OhlcvBar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar {
                date: NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32).unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect()
    }

    #[test]
    fn ema_has_no_warmup() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let column = calculate_ema(&bars, 20);

        assert_eq!(column.warmup_len(), 0);
        assert!((column.value_at(0).unwrap() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_recursive_calculation() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0]);
        let column = calculate_ema(&bars, 3);

        let k = 2.0 / 4.0;
        let e1 = 20.0 * k + 10.0 * (1.0 - k);
        let e2 = 30.0 * k + e1 * (1.0 - k);
        let e3 = 40.0 * k + e2 * (1.0 - k);

        assert!((column.value_at(1).unwrap() - e1).abs() < f64::EPSILON);
        assert!((column.value_at(2).unwrap() - e2).abs() < f64::EPSILON);
        assert!((column.value_at(3).unwrap() - e3).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_equal_prices() {
        let bars = make_bars(&[100.0; 6]);
        let column = calculate_ema(&bars, 20);

        for point in &column.values {
            assert!((point.value.unwrap() - 100.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn ema_period_1_tracks_close() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let column = calculate_ema(&bars, 1);
        assert_eq!(column.raw_values(), vec![Some(10.0), Some(20.0), Some(30.0)]);
    }

    #[test]
    fn ema_is_repeatable() {
        let bars = make_bars(&[10.0, 12.5, 11.0, 14.0, 13.0]);
        assert_eq!(calculate_ema(&bars, 20), calculate_ema(&bars, 20));
    }

    #[test]
    fn ema_period_0() {
        let bars = make_bars(&[10.0, 20.0]);
        let column = calculate_ema(&bars, 0);
        assert_eq!(column.raw_values(), vec![None, None]);
    }

    #[test]
    fn ema_empty_bars() {
        assert!(calculate_ema(&[], 20).is_empty());
    }

    #[test]
    fn ema_indicator_type() {
        let bars = make_bars(&[10.0]);
        assert_eq!(calculate_ema(&bars, 20).indicator_type, IndicatorType::Ema(20));
    }
}
