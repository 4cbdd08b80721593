//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! Every EMA is seeded with its first input, so all three columns are defined
//! from the first bar onward.
//!
//! Default parameters: fast=12, slow=26, signal=9

use crate::domain::indicator::ema::ema_values;
use crate::domain::indicator::{IndicatorColumn, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub struct MacdColumns {
    pub line: IndicatorColumn,
    pub signal: IndicatorColumn,
    pub histogram: IndicatorColumn,
}

pub fn calculate_macd(
    bars: &[OhlcvBar],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> MacdColumns {
    let (line, signal, histogram) = if fast == 0 || slow == 0 || signal_period == 0 {
        let empty = vec![None; bars.len()];
        (empty.clone(), empty.clone(), empty)
    } else {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let ema_fast = ema_values(&closes, fast);
        let ema_slow = ema_values(&closes, slow);

        let line: Vec<f64> = ema_fast
            .iter()
            .zip(&ema_slow)
            .map(|(f, s)| f - s)
            .collect();
        let signal = ema_values(&line, signal_period);
        let histogram: Vec<f64> = line.iter().zip(&signal).map(|(l, s)| l - s).collect();

        (
            line.into_iter().map(Some).collect(),
            signal.into_iter().map(Some).collect(),
            histogram.into_iter().map(Some).collect(),
        )
    };

    MacdColumns {
        line: IndicatorColumn::from_values(
            IndicatorType::Macd {
                fast,
                slow,
                signal: signal_period,
            },
            bars,
            line,
        ),
        signal: IndicatorColumn::from_values(
            IndicatorType::MacdSignal {
                fast,
                slow,
                signal: signal_period,
            },
            bars,
            signal,
        ),
        histogram: IndicatorColumn::from_values(
            IndicatorType::MacdHistogram {
                fast,
                slow,
                signal: signal_period,
            },
            bars,
            histogram,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::calculate_ema;
    use chrono::NaiveDate;

    fn make_bars(prices: &[f64]) -> Vec<OhlcvBar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar {
                date: start + chrono::Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect()
    }

    fn trending(n: usize) -> Vec<OhlcvBar> {
        let prices: Vec<f64> = (0..n).map(|i| 100.0 + i as f64 + (i % 3) as f64).collect();
        make_bars(&prices)
    }

    #[test]
    fn macd_defined_from_first_bar() {
        let columns = calculate_macd(&trending(40), DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL);

        assert_eq!(columns.line.warmup_len(), 0);
        assert_eq!(columns.signal.warmup_len(), 0);
        assert_eq!(columns.histogram.warmup_len(), 0);
        assert_eq!(columns.line.value_at(0), Some(0.0));
    }

    #[test]
    fn macd_histogram_equals_line_minus_signal() {
        let columns = calculate_macd(&trending(40), DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL);

        for i in 0..40 {
            let line = columns.line.value_at(i).unwrap();
            let signal = columns.signal.value_at(i).unwrap();
            let histogram = columns.histogram.value_at(i).unwrap();
            assert_eq!(histogram, line - signal);
        }
    }

    #[test]
    fn macd_line_is_ema_fast_minus_ema_slow() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0]);
        let columns = calculate_macd(&bars, 3, 5, 2);

        let ema_fast = calculate_ema(&bars, 3);
        let ema_slow = calculate_ema(&bars, 5);

        for i in 0..bars.len() {
            let expected = ema_fast.value_at(i).unwrap() - ema_slow.value_at(i).unwrap();
            assert!(
                (columns.line.value_at(i).unwrap() - expected).abs() < f64::EPSILON,
                "MACD line mismatch at index {}",
                i
            );
        }
    }

    #[test]
    fn macd_signal_is_ema_of_line() {
        let bars = make_bars(&[10.0, 12.0, 11.0, 15.0]);
        let columns = calculate_macd(&bars, 2, 3, 2);

        let line = columns.line.raw_values();
        let k = 2.0 / 3.0;
        let mut expected = line[0].unwrap();
        assert_eq!(columns.signal.value_at(0), Some(expected));
        for i in 1..line.len() {
            expected = line[i].unwrap() * k + expected * (1.0 - k);
            assert!((columns.signal.value_at(i).unwrap() - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn macd_indicator_types() {
        let bars = make_bars(&[100.0, 101.0, 102.0]);
        let columns = calculate_macd(&bars, 5, 10, 3);

        assert_eq!(
            columns.line.indicator_type,
            IndicatorType::Macd {
                fast: 5,
                slow: 10,
                signal: 3
            }
        );
        assert_eq!(
            columns.histogram.indicator_type,
            IndicatorType::MacdHistogram {
                fast: 5,
                slow: 10,
                signal: 3
            }
        );
    }

    #[test]
    fn macd_empty_bars() {
        let columns = calculate_macd(&[], DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL);
        assert!(columns.line.is_empty());
        assert!(columns.signal.is_empty());
        assert!(columns.histogram.is_empty());
    }

    #[test]
    fn macd_zero_period() {
        let bars = make_bars(&[100.0, 101.0, 102.0]);

        for columns in [
            calculate_macd(&bars, 0, 26, 9),
            calculate_macd(&bars, 12, 0, 9),
            calculate_macd(&bars, 12, 26, 0),
        ] {
            assert_eq!(columns.line.len(), 3);
            assert_eq!(columns.line.warmup_len(), 3);
            assert_eq!(columns.histogram.warmup_len(), 3);
        }
    }

    #[test]
    fn macd_default_constants() {
        assert_eq!(DEFAULT_FAST, 12);
        assert_eq!(DEFAULT_SLOW, 26);
        assert_eq!(DEFAULT_SIGNAL, 9);
    }
}
