//! Market data access port trait.

use crate::domain::error::StockdashError;
use crate::domain::fundamentals::Fundamentals;
use crate::domain::ohlcv::Series;
use crate::domain::period::Period;

pub trait MarketDataPort {
    /// Daily bars for `symbol` covering `period`, oldest first.
    ///
    /// Returns `NoData` when the source has nothing for the symbol.
    fn fetch_history(&self, symbol: &str, period: Period) -> Result<Series, StockdashError>;

    /// Company fundamentals. An unknown symbol yields an empty mapping, not an
    /// error.
    fn fetch_fundamentals(&self, symbol: &str) -> Result<Fundamentals, StockdashError>;
}
