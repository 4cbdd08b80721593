#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::HashMap;
use stockdash::domain::error::StockdashError;
use stockdash::domain::fundamentals::Fundamentals;
pub use stockdash::domain::ohlcv::OhlcvBar;
use stockdash::domain::ohlcv::Series;
use stockdash::domain::period::Period;
use stockdash::ports::market_data_port::MarketDataPort;

pub struct MockMarketData {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub fundamentals: HashMap<String, Fundamentals>,
    pub errors: HashMap<String, String>,
}

impl MockMarketData {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            fundamentals: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_fundamentals(mut self, symbol: &str, fundamentals: Fundamentals) -> Self {
        self.fundamentals.insert(symbol.to_string(), fundamentals);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl MarketDataPort for MockMarketData {
    fn fetch_history(&self, symbol: &str, period: Period) -> Result<Series, StockdashError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(StockdashError::Database {
                reason: reason.clone(),
            });
        }
        let bars = self.data.get(symbol).cloned().unwrap_or_default();
        let bars = match bars.last() {
            Some(last) => {
                let start = period.window_start(last.date);
                bars.into_iter().filter(|b| b.date >= start).collect()
            }
            None => bars,
        };
        Series::new(symbol, bars)
    }

    fn fetch_fundamentals(&self, symbol: &str) -> Result<Fundamentals, StockdashError> {
        Ok(self.fundamentals.get(symbol).cloned().unwrap_or_default())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(date: &str, close: f64) -> OhlcvBar {
    OhlcvBar {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1000,
    }
}

/// Daily bars with a gentle oscillation around a rising trend.
pub fn generate_bars(start_date: &str, count: usize, start_price: f64) -> Vec<OhlcvBar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    (0..count)
        .map(|i| {
            let close = start_price + i as f64 * 0.2 + (i as f64 * 0.5).sin() * 3.0;
            OhlcvBar {
                date: start + chrono::Duration::days(i as i64),
                open: close - 0.5,
                high: close + 1.5,
                low: close - 1.5,
                close,
                volume: 1000 + (i as i64 % 7) * 100,
            }
        })
        .collect()
}

pub fn bars_from_closes(start_date: &str, closes: &[f64]) -> Vec<OhlcvBar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| OhlcvBar {
            date: start + chrono::Duration::days(i as i64),
            open: close,
            high: close,
            low: close,
            close,
            volume: 500,
        })
        .collect()
}

pub fn write_csv(dir: &std::path::Path, symbol: &str, bars: &[OhlcvBar]) {
    let mut content = String::from("date,open,high,low,close,volume\n");
    for b in bars {
        content.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.date, b.open, b.high, b.low, b.close, b.volume
        ));
    }
    std::fs::write(dir.join(format!("{}.csv", symbol)), content).unwrap();
}
