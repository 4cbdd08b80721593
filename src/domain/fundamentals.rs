//! Company fundamentals supplied by the market data source, and their display.

use crate::domain::format::{format_large_number, format_price, format_ratio_pct};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

pub const NOT_AVAILABLE: &str = "N/A";
pub const NO_SUMMARY: &str = "No information available";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FundamentalValue {
    Number(f64),
    Text(String),
}

/// Flat key → scalar mapping. Any key may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Fundamentals {
    values: BTreeMap<String, FundamentalValue>,
}

impl<'de> Deserialize<'de> for Fundamentals {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
        Ok(Self::from_json(raw))
    }
}

impl Fundamentals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps numbers and strings; nulls, booleans, arrays and objects are dropped.
    pub fn from_json(raw: BTreeMap<String, serde_json::Value>) -> Self {
        let values = raw
            .into_iter()
            .filter_map(|(key, value)| match value {
                serde_json::Value::Number(n) => n.as_f64().map(|n| (key, FundamentalValue::Number(n))),
                serde_json::Value::String(s) => Some((key, FundamentalValue::Text(s))),
                _ => None,
            })
            .collect();
        Self { values }
    }

    pub fn with_number(mut self, key: &str, value: f64) -> Self {
        self.values
            .insert(key.to_string(), FundamentalValue::Number(value));
        self
    }

    pub fn with_text(mut self, key: &str, value: &str) -> Self {
        self.values
            .insert(key.to_string(), FundamentalValue::Text(value.to_string()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&FundamentalValue> {
        self.values.get(key)
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        match self.values.get(key) {
            Some(FundamentalValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    /// Numeric value, or 0 when absent or not a number.
    pub fn number_or_zero(&self, key: &str) -> f64 {
        self.number(key).unwrap_or(0.0)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(FundamentalValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Text value, or `"N/A"` when absent.
    pub fn text_or_na(&self, key: &str) -> &str {
        self.text(key).unwrap_or(NOT_AVAILABLE)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `longName`, falling back to the ticker symbol.
    pub fn display_name<'a>(&'a self, symbol: &'a str) -> &'a str {
        self.text("longName").unwrap_or(symbol)
    }

    /// `"Technology | Consumer Electronics"`
    pub fn sector_line(&self) -> String {
        format!("{} | {}", self.text_or_na("sector"), self.text_or_na("industry"))
    }

    pub fn business_summary(&self) -> &str {
        self.text("longBusinessSummary").unwrap_or(NO_SUMMARY)
    }

    /// Headline tiles: market cap, P/E, 52-week range.
    pub fn key_metrics(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Market Cap", format_large_number(self.number_or_zero("marketCap"))),
            ("P/E Ratio", format!("{:.2}", self.number_or_zero("trailingPE"))),
            ("52W High", format_price(self.number_or_zero("fiftyTwoWeekHigh"))),
            ("52W Low", format_price(self.number_or_zero("fiftyTwoWeekLow"))),
        ]
    }

    /// Financial metrics table rows.
    pub fn financial_metrics(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Revenue (TTM)", format_large_number(self.number_or_zero("totalRevenue"))),
            ("Profit Margin", format_ratio_pct(self.number_or_zero("profitMargins"))),
            (
                "Operating Margin",
                format_ratio_pct(self.number_or_zero("operatingMargins")),
            ),
            (
                "Return on Equity",
                format_ratio_pct(self.number_or_zero("returnOnEquity")),
            ),
            ("Total Debt", format_large_number(self.number_or_zero("totalDebt"))),
            ("Total Cash", format_large_number(self.number_or_zero("totalCash"))),
        ]
    }
}
