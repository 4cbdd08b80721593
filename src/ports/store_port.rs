//! Watchlist and search history persistence port.

use crate::domain::error::StockdashError;
use crate::domain::period::Period;
use chrono::NaiveDateTime;
use serde::Serialize;

pub const DEFAULT_RECENT_SEARCHES: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WatchlistEntry {
    pub id: i64,
    pub symbol: String,
    pub added_date: NaiveDateTime,
    pub notes: Option<String>,
    pub is_favorite: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRecord {
    pub id: i64,
    pub symbol: String,
    pub search_date: NaiveDateTime,
    pub period: Period,
}

pub trait WatchlistStore {
    fn add_to_watchlist(&self, symbol: &str, notes: Option<&str>) -> Result<i64, StockdashError>;

    /// Deletes every entry for `symbol`; returns how many were removed.
    fn remove_from_watchlist(&self, symbol: &str) -> Result<usize, StockdashError>;

    /// All entries in insertion order.
    fn watchlist(&self) -> Result<Vec<WatchlistEntry>, StockdashError>;

    fn add_search(&self, symbol: &str, period: Period) -> Result<i64, StockdashError>;

    /// Most recent first, ties broken by newest id.
    fn recent_searches(&self, limit: usize) -> Result<Vec<SearchRecord>, StockdashError>;
}
