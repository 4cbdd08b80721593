//! Declarative three-panel chart description built from a series and its
//! precomputed indicators.
//!
//! Panel 1 holds the candlesticks and the price overlays, panel 2 the volume
//! bars and RSI, panel 3 the MACD family. Groups switched off in the toggle
//! config leave no trace (or reference line) behind.

use crate::domain::error::StockdashError;
use crate::domain::indicator::{bollinger, macd, rsi, IndicatorPoint, IndicatorType};
use crate::domain::indicator_helpers::{
    IndicatorGroup, IndicatorSet, EMA_PERIOD, SMA_LONG_PERIOD, SMA_SHORT_PERIOD,
};
use crate::domain::ohlcv::Series;
use chrono::NaiveDate;
use serde::Serialize;

pub const CHART_HEIGHT: u32 = 800;
pub const ROW_HEIGHTS: [f64; 3] = [0.5, 0.25, 0.25];
pub const VERTICAL_SPACING: f64 = 0.05;
pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const RSI_OVERSOLD: f64 = 30.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndicatorToggleConfig {
    pub sma: bool,
    pub ema: bool,
    pub bollinger: bool,
    pub rsi: bool,
    pub macd: bool,
}

impl IndicatorToggleConfig {
    pub fn all() -> Self {
        Self {
            sma: true,
            ema: true,
            bollinger: true,
            rsi: true,
            macd: true,
        }
    }

    pub fn is_enabled(&self, group: IndicatorGroup) -> bool {
        match group {
            IndicatorGroup::Sma => self.sma,
            IndicatorGroup::Ema => self.ema,
            IndicatorGroup::Bollinger => self.bollinger,
            IndicatorGroup::Rsi => self.rsi,
            IndicatorGroup::Macd => self.macd,
        }
    }

    pub fn enabled_groups(&self) -> Vec<IndicatorGroup> {
        IndicatorGroup::ALL
            .into_iter()
            .filter(|g| self.is_enabled(*g))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineDash {
    Solid,
    Dash,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    pub color: String,
    pub dash: LineDash,
}

impl LineStyle {
    fn solid(color: &str) -> Self {
        Self {
            color: color.to_string(),
            dash: LineDash::Solid,
        }
    }

    fn dashed(color: &str) -> Self {
        Self {
            color: color.to_string(),
            dash: LineDash::Dash,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandlePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Trace {
    Candlestick {
        name: String,
        points: Vec<CandlePoint>,
    },
    Line {
        name: String,
        group: IndicatorGroup,
        style: LineStyle,
        points: Vec<IndicatorPoint>,
    },
    Bar {
        name: String,
        group: Option<IndicatorGroup>,
        points: Vec<IndicatorPoint>,
    },
}

impl Trace {
    pub fn name(&self) -> &str {
        match self {
            Trace::Candlestick { name, .. } | Trace::Line { name, .. } | Trace::Bar { name, .. } => {
                name
            }
        }
    }

    /// Indicator group the trace belongs to; `None` for raw price and volume.
    pub fn group(&self) -> Option<IndicatorGroup> {
        match self {
            Trace::Candlestick { .. } => None,
            Trace::Line { group, .. } => Some(*group),
            Trace::Bar { group, .. } => *group,
        }
    }
}

/// Horizontal guide line across a panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceLine {
    pub y: f64,
    pub group: IndicatorGroup,
    pub style: LineStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelKind {
    Price,
    Volume,
    Oscillator,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub kind: PanelKind,
    pub height_ratio: f64,
    pub traces: Vec<Trace>,
    pub reference_lines: Vec<ReferenceLine>,
}

impl Panel {
    fn new(kind: PanelKind, height_ratio: f64) -> Self {
        Self {
            kind,
            height_ratio,
            traces: Vec::new(),
            reference_lines: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartLayout {
    pub height: u32,
    pub vertical_spacing: f64,
    pub shared_x_axes: bool,
    pub show_legend: bool,
    pub range_slider: bool,
    pub theme: Theme,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub symbol: String,
    pub layout: ChartLayout,
    pub panels: Vec<Panel>,
}

impl ChartSpec {
    pub fn panel(&self, kind: PanelKind) -> Option<&Panel> {
        self.panels.iter().find(|p| p.kind == kind)
    }

    pub fn traces(&self) -> impl Iterator<Item = &Trace> {
        self.panels.iter().flat_map(|p| p.traces.iter())
    }

    pub fn trace_names(&self) -> Vec<&str> {
        self.traces().map(Trace::name).collect()
    }

    pub fn has_group(&self, group: IndicatorGroup) -> bool {
        self.traces().any(|t| t.group() == Some(group))
            || self
                .panels
                .iter()
                .flat_map(|p| p.reference_lines.iter())
                .any(|r| r.group == group)
    }

    pub fn to_json(&self) -> Result<String, StockdashError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Assemble the chart from already computed indicators. Nothing is
/// recomputed here: an enabled group whose columns are missing from
/// `indicators` is an error.
pub fn build_chart(
    series: &Series,
    indicators: &IndicatorSet,
    toggles: &IndicatorToggleConfig,
    theme: Theme,
) -> Result<ChartSpec, StockdashError> {
    let bars = series.bars();
    let mut price = Panel::new(PanelKind::Price, ROW_HEIGHTS[0]);
    let mut volume = Panel::new(PanelKind::Volume, ROW_HEIGHTS[1]);
    let mut oscillator = Panel::new(PanelKind::Oscillator, ROW_HEIGHTS[2]);

    price.traces.push(Trace::Candlestick {
        name: "OHLC".to_string(),
        points: bars
            .iter()
            .map(|b| CandlePoint {
                date: b.date,
                open: b.open,
                high: b.high,
                low: b.low,
                close: b.close,
            })
            .collect(),
    });

    let lines = LineSource { series, indicators };

    if toggles.sma {
        price.traces.push(lines.line(
            IndicatorType::Sma(SMA_SHORT_PERIOD),
            "SMA 20",
            IndicatorGroup::Sma,
            LineStyle::solid("orange"),
        )?);
        price.traces.push(lines.line(
            IndicatorType::Sma(SMA_LONG_PERIOD),
            "SMA 50",
            IndicatorGroup::Sma,
            LineStyle::solid("blue"),
        )?);
    }

    if toggles.ema {
        price.traces.push(lines.line(
            IndicatorType::Ema(EMA_PERIOD),
            "EMA 20",
            IndicatorGroup::Ema,
            LineStyle::solid("purple"),
        )?);
    }

    if toggles.bollinger {
        price.traces.push(lines.line(
            IndicatorType::BollingerUpper(bollinger::DEFAULT_PERIOD),
            "BB Upper",
            IndicatorGroup::Bollinger,
            LineStyle::dashed("gray"),
        )?);
        price.traces.push(lines.line(
            IndicatorType::BollingerMiddle(bollinger::DEFAULT_PERIOD),
            "BB Middle",
            IndicatorGroup::Bollinger,
            LineStyle::solid("gray"),
        )?);
        price.traces.push(lines.line(
            IndicatorType::BollingerLower(bollinger::DEFAULT_PERIOD),
            "BB Lower",
            IndicatorGroup::Bollinger,
            LineStyle::dashed("gray"),
        )?);
    }

    volume.traces.push(Trace::Bar {
        name: "Volume".to_string(),
        group: None,
        points: bars
            .iter()
            .map(|b| IndicatorPoint {
                date: b.date,
                value: Some(b.volume as f64),
            })
            .collect(),
    });

    if toggles.rsi {
        volume.traces.push(lines.line(
            IndicatorType::Rsi(rsi::DEFAULT_PERIOD),
            "RSI",
            IndicatorGroup::Rsi,
            LineStyle::solid("orange"),
        )?);
        volume.reference_lines.push(ReferenceLine {
            y: RSI_OVERBOUGHT,
            group: IndicatorGroup::Rsi,
            style: LineStyle::dashed("red"),
        });
        volume.reference_lines.push(ReferenceLine {
            y: RSI_OVERSOLD,
            group: IndicatorGroup::Rsi,
            style: LineStyle::dashed("green"),
        });
    }

    if toggles.macd {
        let (fast, slow, signal) = (macd::DEFAULT_FAST, macd::DEFAULT_SLOW, macd::DEFAULT_SIGNAL);
        oscillator.traces.push(lines.line(
            IndicatorType::Macd { fast, slow, signal },
            "MACD",
            IndicatorGroup::Macd,
            LineStyle::solid("blue"),
        )?);
        oscillator.traces.push(lines.line(
            IndicatorType::MacdSignal { fast, slow, signal },
            "Signal",
            IndicatorGroup::Macd,
            LineStyle::solid("orange"),
        )?);
        oscillator.traces.push(Trace::Bar {
            name: "MACD Histogram".to_string(),
            group: Some(IndicatorGroup::Macd),
            points: lines.points(IndicatorType::MacdHistogram { fast, slow, signal })?,
        });
    }

    Ok(ChartSpec {
        symbol: series.symbol().to_string(),
        layout: ChartLayout {
            height: CHART_HEIGHT,
            vertical_spacing: VERTICAL_SPACING,
            shared_x_axes: true,
            show_legend: true,
            range_slider: false,
            theme,
        },
        panels: vec![price, volume, oscillator],
    })
}

struct LineSource<'a> {
    series: &'a Series,
    indicators: &'a IndicatorSet,
}

impl LineSource<'_> {
    fn points(&self, indicator_type: IndicatorType) -> Result<Vec<IndicatorPoint>, StockdashError> {
        let column =
            self.indicators
                .get(&indicator_type)
                .ok_or_else(|| StockdashError::MissingIndicator {
                    column: indicator_type.to_string(),
                })?;

        if column.len() != self.series.len() {
            return Err(StockdashError::InvalidSeries {
                reason: format!(
                    "{} has {} points but the series has {} bars",
                    indicator_type,
                    column.len(),
                    self.series.len()
                ),
            });
        }

        if let Some((point, bar)) = column
            .values
            .iter()
            .zip(self.series.bars())
            .find(|(point, bar)| point.date != bar.date)
        {
            return Err(StockdashError::InvalidSeries {
                reason: format!(
                    "{} point dated {} does not line up with bar dated {}",
                    indicator_type, point.date, bar.date
                ),
            });
        }

        Ok(column.values.clone())
    }

    fn line(
        &self,
        indicator_type: IndicatorType,
        name: &str,
        group: IndicatorGroup,
        style: LineStyle,
    ) -> Result<Trace, StockdashError> {
        Ok(Trace::Line {
            name: name.to_string(),
            group,
            style,
            points: self.points(indicator_type)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::OhlcvBar;

    fn make_series(n: usize) -> Series {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = (0..n)
            .map(|i| {
                let close = 50.0 + (i as f64 * 0.3).cos() * 4.0 + i as f64 * 0.1;
                OhlcvBar {
                    date: start + chrono::Duration::days(i as i64),
                    open: close - 0.5,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 10_000 + i as i64,
                }
            })
            .collect();
        Series::new("TEST", bars).unwrap()
    }

    #[test]
    fn toggles_off_keeps_only_price_and_volume() {
        let series = make_series(30);
        let set = IndicatorSet::compute(series.bars());
        let chart =
            build_chart(&series, &set, &IndicatorToggleConfig::default(), Theme::Dark).unwrap();

        assert_eq!(chart.trace_names(), vec!["OHLC", "Volume"]);
        assert!(chart.panels.iter().all(|p| p.reference_lines.is_empty()));
        assert!(chart.panel(PanelKind::Oscillator).unwrap().traces.is_empty());
    }

    #[test]
    fn all_toggles_on_places_traces_per_panel() {
        let series = make_series(60);
        let set = IndicatorSet::compute(series.bars());
        let chart = build_chart(&series, &set, &IndicatorToggleConfig::all(), Theme::Light).unwrap();

        let names = |kind| -> Vec<String> {
            chart
                .panel(kind)
                .unwrap()
                .traces
                .iter()
                .map(|t| t.name().to_string())
                .collect()
        };
        assert_eq!(
            names(PanelKind::Price),
            vec!["OHLC", "SMA 20", "SMA 50", "EMA 20", "BB Upper", "BB Middle", "BB Lower"]
        );
        assert_eq!(names(PanelKind::Volume), vec!["Volume", "RSI"]);
        assert_eq!(names(PanelKind::Oscillator), vec!["MACD", "Signal", "MACD Histogram"]);

        let refs: Vec<f64> = chart
            .panel(PanelKind::Volume)
            .unwrap()
            .reference_lines
            .iter()
            .map(|r| r.y)
            .collect();
        assert_eq!(refs, vec![70.0, 30.0]);
    }

    #[test]
    fn layout_is_fixed() {
        let series = make_series(5);
        let set = IndicatorSet::compute(series.bars());
        let chart =
            build_chart(&series, &set, &IndicatorToggleConfig::default(), Theme::Dark).unwrap();

        let ratios: Vec<f64> = chart.panels.iter().map(|p| p.height_ratio).collect();
        assert_eq!(ratios, vec![0.5, 0.25, 0.25]);
        assert_eq!(chart.layout.height, 800);
        assert!(!chart.layout.range_slider);
        assert_eq!(chart.layout.theme, Theme::Dark);
    }

    #[test]
    fn rsi_off_drops_reference_lines() {
        let series = make_series(30);
        let set = IndicatorSet::compute(series.bars());
        let toggles = IndicatorToggleConfig {
            rsi: false,
            ..IndicatorToggleConfig::all()
        };
        let chart = build_chart(&series, &set, &toggles, Theme::Dark).unwrap();

        assert!(!chart.has_group(IndicatorGroup::Rsi));
        assert!(chart.panel(PanelKind::Volume).unwrap().reference_lines.is_empty());
    }

    #[test]
    fn enabled_group_missing_from_set_is_an_error() {
        let series = make_series(30);
        let set = IndicatorSet::compute_groups(series.bars(), &[IndicatorGroup::Sma]);
        let toggles = IndicatorToggleConfig {
            macd: true,
            ..Default::default()
        };

        match build_chart(&series, &set, &toggles, Theme::Dark) {
            Err(StockdashError::MissingIndicator { column }) => assert_eq!(column, "MACD_12_26_9"),
            other => panic!("expected MissingIndicator, got {other:?}"),
        }
    }

    #[test]
    fn misaligned_column_is_rejected() {
        let series = make_series(30);
        let shorter = make_series(20);
        let set = IndicatorSet::compute(shorter.bars());
        let toggles = IndicatorToggleConfig {
            ema: true,
            ..Default::default()
        };

        let result = build_chart(&series, &set, &toggles, Theme::Dark);
        assert!(matches!(result, Err(StockdashError::InvalidSeries { .. })));
    }

    #[test]
    fn column_from_other_dates_is_rejected() {
        let series = make_series(30);
        let shifted_bars: Vec<OhlcvBar> = series
            .bars()
            .iter()
            .map(|b| OhlcvBar {
                date: b.date + chrono::Duration::days(1),
                ..b.clone()
            })
            .collect();
        let set = IndicatorSet::compute(&shifted_bars);
        let toggles = IndicatorToggleConfig {
            sma: true,
            ..Default::default()
        };

        let result = build_chart(&series, &set, &toggles, Theme::Dark);
        assert!(matches!(result, Err(StockdashError::InvalidSeries { .. })));
    }

    #[test]
    fn enabled_groups_follow_toggle_order() {
        let toggles = IndicatorToggleConfig {
            macd: true,
            sma: true,
            ..Default::default()
        };
        assert_eq!(
            toggles.enabled_groups(),
            vec![IndicatorGroup::Sma, IndicatorGroup::Macd]
        );
    }

    #[test]
    fn json_tags_trace_types() {
        let series = make_series(3);
        let set = IndicatorSet::compute(series.bars());
        let toggles = IndicatorToggleConfig {
            rsi: true,
            ..Default::default()
        };
        let json = build_chart(&series, &set, &toggles, Theme::Light)
            .unwrap()
            .to_json()
            .unwrap();

        assert!(json.contains("\"type\": \"candlestick\""));
        assert!(json.contains("\"type\": \"bar\""));
        assert!(json.contains("\"theme\": \"light\""));
        assert!(json.contains("\"value\": null"));
    }
}
