//! RSI (Relative Strength Index) indicator.
//!
//! Average gain/loss are trailing simple means over n positions:
//! - gain[i] = max(C[i] - C[i-1], 0), loss[i] = max(C[i-1] - C[i], 0)
//! - the first bar has no predecessor and counts as zero gain and zero loss
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100 (gain-only or flat window)
//!
//! Warmup: first (n-1) bars have no value.

use crate::domain::indicator::sma::sma_values;
use crate::domain::indicator::{IndicatorColumn, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_rsi(bars: &[OhlcvBar], period: usize) -> IndicatorColumn {
    let mut gains = Vec::with_capacity(bars.len());
    let mut losses = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        let change = if i == 0 {
            0.0
        } else {
            bar.close - bars[i - 1].close
        };
        gains.push(if change > 0.0 { change } else { 0.0 });
        losses.push(if change < 0.0 { -change } else { 0.0 });
    }

    let avg_gains = sma_values(&gains, period);
    let avg_losses = sma_values(&losses, period);

    let values = avg_gains
        .iter()
        .zip(&avg_losses)
        .map(|(gain, loss)| match (gain, loss) {
            (Some(gain), Some(loss)) => Some(rsi_from_averages(*gain, *loss)),
            _ => None,
        })
        .collect();

    IndicatorColumn::from_values(IndicatorType::Rsi(period), bars, values)
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_bar(date: &str, close: f64) -> OhlcvBar {
        OhlcvBar {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1000,
        }
    }

    fn bars_from(closes: &[f64]) -> Vec<OhlcvBar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| make_bar(&format!("2024-01-{:02}", i + 1), c))
            .collect()
    }

    #[test]
    fn rsi_empty_bars() {
        let column = calculate_rsi(&[], 14);
        assert!(column.is_empty());
    }

    #[test]
    fn rsi_single_bar() {
        let bars = vec![make_bar("2024-01-01", 100.0)];
        let column = calculate_rsi(&bars, 14);
        assert_eq!(column.len(), 1);
        assert_eq!(column.value_at(0), None);
    }

    #[test]
    fn rsi_warmup_period() {
        let closes: Vec<f64> = (1..=15).map(|i| 100.0 + (i as f64 % 5.0) * 2.0).collect();
        let column = calculate_rsi(&bars_from(&closes), 14);

        assert_eq!(column.len(), 15);
        assert_eq!(column.warmup_len(), 13);
        assert!(column.value_at(13).is_some());
    }

    #[test]
    fn rsi_all_gains_no_losses() {
        let closes: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        let column = calculate_rsi(&bars_from(&closes), 14);

        let rsi = column.value_at(14).unwrap();
        assert!((rsi - 100.0).abs() < f64::EPSILON, "RSI should be 100 when all gains");
    }

    #[test]
    fn rsi_flat_window_saturates() {
        let column = calculate_rsi(&bars_from(&[50.0; 14]), 14);
        assert_eq!(column.value_at(13), Some(100.0));
    }

    #[test]
    fn rsi_all_losses_no_gains() {
        let closes: Vec<f64> = (0..15).map(|i| 100.0 - i as f64).collect();
        let column = calculate_rsi(&bars_from(&closes), 14);

        let rsi = column.value_at(14).unwrap();
        assert!((rsi - 0.0).abs() < f64::EPSILON, "RSI should be 0 when all losses");
    }

    #[test]
    fn rsi_known_value() {
        // Changes: +2, -1, +2 over a 3-bar window ending at index 3.
        let column = calculate_rsi(&bars_from(&[10.0, 12.0, 11.0, 13.0]), 3);

        let avg_gain = (2.0 + 0.0 + 2.0) / 3.0;
        let avg_loss = (0.0 + 1.0 + 0.0) / 3.0;
        let expected = 100.0 - 100.0 / (1.0 + avg_gain / avg_loss);
        assert!((column.value_at(3).unwrap() - expected).abs() < 1e-10);
    }

    #[test]
    fn rsi_first_window_counts_first_bar_as_unchanged() {
        // Window [0..=2] holds gains 0, 2, 0 and losses 0, 0, 1.
        let column = calculate_rsi(&bars_from(&[10.0, 12.0, 11.0]), 3);

        let expected = 100.0 - 100.0 / (1.0 + (2.0 / 3.0) / (1.0 / 3.0));
        assert!((column.value_at(2).unwrap() - expected).abs() < 1e-10);
    }

    #[test]
    fn rsi_in_range() {
        let closes: Vec<f64> = (1..=30)
            .map(|i| 100.0 + (i as f64 % 7.0 - 3.0) * 2.0)
            .collect();
        let column = calculate_rsi(&bars_from(&closes), 14);

        for rsi in column.values.iter().filter_map(|p| p.value) {
            assert!((0.0..=100.0).contains(&rsi), "RSI {} out of range", rsi);
        }
    }

    #[test]
    fn rsi_zero_period() {
        let bars = vec![make_bar("2024-01-01", 100.0), make_bar("2024-01-02", 101.0)];
        let column = calculate_rsi(&bars, 0);
        assert_eq!(column.raw_values(), vec![None, None]);
    }

    #[test]
    fn rsi_indicator_type() {
        let bars = vec![make_bar("2024-01-01", 100.0)];
        assert_eq!(calculate_rsi(&bars, 14).indicator_type, IndicatorType::Rsi(14));
    }
}
