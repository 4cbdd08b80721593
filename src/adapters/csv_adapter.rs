//! CSV file market data adapter.
//!
//! Reads `<SYMBOL>.csv` (`date,open,high,low,close,volume`) and an optional
//! `<SYMBOL>.json` fundamentals object from one directory.

use crate::domain::error::StockdashError;
use crate::domain::fundamentals::Fundamentals;
use crate::domain::ohlcv::{OhlcvBar, Series};
use crate::domain::period::Period;
use crate::ports::market_data_port::MarketDataPort;
use chrono::NaiveDate;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, warn};

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    fn json_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", symbol))
    }

    /// Every parseable bar in the file, sorted by date. Malformed rows are
    /// skipped; for duplicate dates the later row wins.
    fn read_bars(&self, symbol: &str) -> Result<Vec<OhlcvBar>, StockdashError> {
        let path = self.csv_path(symbol);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no csv file");
                return Err(StockdashError::NoData {
                    symbol: symbol.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars: Vec<OhlcvBar> = Vec::new();

        for (line, result) in rdr.records().enumerate() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    warn!(symbol, line = line + 2, error = %e, "skipping unreadable csv row");
                    continue;
                }
            };
            match parse_record(&record) {
                Ok(bar) => bars.push(bar),
                Err(reason) => {
                    warn!(symbol, line = line + 2, %reason, "skipping malformed csv row");
                }
            }
        }

        bars.sort_by_key(|b| b.date);
        let before = bars.len();
        bars.reverse();
        bars.dedup_by_key(|b| b.date);
        bars.reverse();
        if bars.len() != before {
            warn!(symbol, dropped = before - bars.len(), "dropped duplicate dates");
        }

        Ok(bars)
    }
}

fn field<'a>(record: &'a csv::StringRecord, idx: usize, name: &str) -> Result<&'a str, String> {
    record
        .get(idx)
        .map(str::trim)
        .ok_or_else(|| format!("missing {} column", name))
}

fn price(record: &csv::StringRecord, idx: usize, name: &str) -> Result<f64, String> {
    let value = field(record, idx, name)?
        .parse::<f64>()
        .map_err(|e| format!("invalid {} value: {}", name, e))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(format!("{} must be a positive number, got {}", name, value));
    }
    Ok(value)
}

fn volume(record: &csv::StringRecord) -> Result<i64, String> {
    let raw = field(record, 5, "volume")?;
    if let Ok(v) = raw.parse::<i64>() {
        return Ok(v);
    }
    // Some exports write volume as a float.
    let v = raw
        .parse::<f64>()
        .map_err(|e| format!("invalid volume value: {}", e))?;
    if !v.is_finite() || v.abs() >= i64::MAX as f64 {
        return Err(format!("volume out of range: {}", raw));
    }
    Ok(v.round() as i64)
}

fn parse_record(record: &csv::StringRecord) -> Result<OhlcvBar, String> {
    let date = NaiveDate::parse_from_str(field(record, 0, "date")?, "%Y-%m-%d")
        .map_err(|e| format!("invalid date format: {}", e))?;

    Ok(OhlcvBar {
        date,
        open: price(record, 1, "open")?,
        high: price(record, 2, "high")?,
        low: price(record, 3, "low")?,
        close: price(record, 4, "close")?,
        volume: volume(record)?,
    })
}

impl MarketDataPort for CsvAdapter {
    fn fetch_history(&self, symbol: &str, period: Period) -> Result<Series, StockdashError> {
        let bars = self.read_bars(symbol)?;
        let Some(last) = bars.last() else {
            return Err(StockdashError::NoData {
                symbol: symbol.to_string(),
            });
        };

        let start = period.window_start(last.date);
        let window: Vec<OhlcvBar> = bars.into_iter().filter(|b| b.date >= start).collect();
        debug!(symbol, %period, %start, bars = window.len(), "fetched history");

        Series::new(symbol, window)
    }

    fn fetch_fundamentals(&self, symbol: &str) -> Result<Fundamentals, StockdashError> {
        let path = self.json_path(symbol);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no fundamentals file");
                return Ok(Fundamentals::new());
            }
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_str(&content)?)
    }
}
