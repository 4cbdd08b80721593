//! Indicator groups and the per-series indicator set.

use crate::domain::indicator::{
    bollinger, calculate_bollinger, calculate_ema, calculate_macd, calculate_rsi, calculate_sma,
    macd, rsi, IndicatorColumn, IndicatorType,
};
use crate::domain::ohlcv::OhlcvBar;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

pub const SMA_SHORT_PERIOD: usize = 20;
pub const SMA_LONG_PERIOD: usize = 50;
pub const EMA_PERIOD: usize = 20;

/// Indicator families the dashboard can overlay, one toggle each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorGroup {
    Sma,
    Ema,
    Bollinger,
    Rsi,
    Macd,
}

impl IndicatorGroup {
    pub const ALL: [IndicatorGroup; 5] = [
        IndicatorGroup::Sma,
        IndicatorGroup::Ema,
        IndicatorGroup::Bollinger,
        IndicatorGroup::Rsi,
        IndicatorGroup::Macd,
    ];

    /// Column keys this group contributes to an [`IndicatorSet`].
    pub fn column_types(self) -> Vec<IndicatorType> {
        let (fast, slow, signal) = (macd::DEFAULT_FAST, macd::DEFAULT_SLOW, macd::DEFAULT_SIGNAL);
        match self {
            IndicatorGroup::Sma => vec![
                IndicatorType::Sma(SMA_SHORT_PERIOD),
                IndicatorType::Sma(SMA_LONG_PERIOD),
            ],
            IndicatorGroup::Ema => vec![IndicatorType::Ema(EMA_PERIOD)],
            IndicatorGroup::Bollinger => vec![
                IndicatorType::BollingerUpper(bollinger::DEFAULT_PERIOD),
                IndicatorType::BollingerMiddle(bollinger::DEFAULT_PERIOD),
                IndicatorType::BollingerLower(bollinger::DEFAULT_PERIOD),
            ],
            IndicatorGroup::Rsi => vec![IndicatorType::Rsi(rsi::DEFAULT_PERIOD)],
            IndicatorGroup::Macd => vec![
                IndicatorType::Macd { fast, slow, signal },
                IndicatorType::MacdSignal { fast, slow, signal },
                IndicatorType::MacdHistogram { fast, slow, signal },
            ],
        }
    }
}

impl fmt::Display for IndicatorGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IndicatorGroup::Sma => "sma",
            IndicatorGroup::Ema => "ema",
            IndicatorGroup::Bollinger => "bollinger",
            IndicatorGroup::Rsi => "rsi",
            IndicatorGroup::Macd => "macd",
        };
        f.write_str(name)
    }
}

/// Derived columns for one series. Built alongside the bars, never from them
/// in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorSet {
    columns: BTreeMap<IndicatorType, IndicatorColumn>,
}

impl IndicatorSet {
    /// Every dashboard indicator group.
    pub fn compute(bars: &[OhlcvBar]) -> Self {
        Self::compute_groups(bars, &IndicatorGroup::ALL)
    }

    pub fn compute_groups(bars: &[OhlcvBar], groups: &[IndicatorGroup]) -> Self {
        let mut set = Self::default();
        for group in groups {
            match group {
                IndicatorGroup::Sma => {
                    set.insert(calculate_sma(bars, SMA_SHORT_PERIOD));
                    set.insert(calculate_sma(bars, SMA_LONG_PERIOD));
                }
                IndicatorGroup::Ema => set.insert(calculate_ema(bars, EMA_PERIOD)),
                IndicatorGroup::Bollinger => {
                    let bands = calculate_bollinger(
                        bars,
                        bollinger::DEFAULT_PERIOD,
                        bollinger::DEFAULT_STDDEV_MULT_X100,
                    );
                    set.insert(bands.upper);
                    set.insert(bands.middle);
                    set.insert(bands.lower);
                }
                IndicatorGroup::Rsi => set.insert(calculate_rsi(bars, rsi::DEFAULT_PERIOD)),
                IndicatorGroup::Macd => {
                    let columns = calculate_macd(
                        bars,
                        macd::DEFAULT_FAST,
                        macd::DEFAULT_SLOW,
                        macd::DEFAULT_SIGNAL,
                    );
                    set.insert(columns.line);
                    set.insert(columns.signal);
                    set.insert(columns.histogram);
                }
            }
        }
        set
    }

    pub fn insert(&mut self, column: IndicatorColumn) {
        self.columns.insert(column.indicator_type, column);
    }

    pub fn get(&self, indicator_type: &IndicatorType) -> Option<&IndicatorColumn> {
        self.columns.get(indicator_type)
    }

    pub fn contains(&self, indicator_type: &IndicatorType) -> bool {
        self.columns.contains_key(indicator_type)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&IndicatorType, &IndicatorColumn)> {
        self.columns.iter()
    }

    /// Latest defined value of a column, with its position.
    pub fn latest(&self, indicator_type: &IndicatorType) -> Option<(usize, f64)> {
        let column = self.get(indicator_type)?;
        column
            .values
            .iter()
            .enumerate()
            .rev()
            .find_map(|(i, p)| p.value.map(|v| (i, v)))
    }
}
