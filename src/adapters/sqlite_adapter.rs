//! SQLite watchlist and search history store.

use crate::domain::error::StockdashError;
use crate::domain::period::Period;
use crate::ports::config_port::ConfigPort;
use crate::ports::store_port::{SearchRecord, WatchlistEntry, WatchlistStore};
use chrono::{NaiveDateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;
use tracing::{debug, info};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

pub struct SqliteAdapter {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, StockdashError> {
        let db_path =
            config
                .get_string("sqlite", "path")
                .ok_or_else(|| StockdashError::ConfigMissing {
                    section: "sqlite".into(),
                    key: "path".into(),
                })?;

        let pool_size = config.get_int("sqlite", "pool_size", 4);
        if pool_size <= 0 {
            return Err(StockdashError::ConfigInvalid {
                section: "sqlite".into(),
                key: "pool_size".into(),
                reason: "pool_size must be positive".into(),
            });
        }

        let manager = SqliteConnectionManager::file(&db_path);
        let pool = Pool::builder()
            .max_size(pool_size as u32)
            .build(manager)
            .map_err(|e: r2d2::Error| StockdashError::Database {
                reason: e.to_string(),
            })?;

        debug!(path = %db_path, pool_size, "opened sqlite store");
        Ok(Self { pool })
    }

    pub fn in_memory() -> Result<Self, StockdashError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e: r2d2::Error| StockdashError::Database {
                reason: e.to_string(),
            })?;

        Ok(Self { pool })
    }

    pub fn initialize_schema(&self) -> Result<(), StockdashError> {
        let conn = self.conn()?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS watchlists (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                symbol TEXT NOT NULL,
                added_date TEXT NOT NULL,
                notes TEXT,
                is_favorite INTEGER NOT NULL DEFAULT 0
            );
            CREATE TABLE IF NOT EXISTS search_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                symbol TEXT NOT NULL,
                search_date TEXT NOT NULL,
                period TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_watchlists_symbol ON watchlists(symbol);
            CREATE INDEX IF NOT EXISTS idx_search_history_date ON search_history(search_date);",
        )
        .map_err(query_error)?;

        Ok(())
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>, StockdashError> {
        self.pool
            .get()
            .map_err(|e: r2d2::Error| StockdashError::Database {
                reason: e.to_string(),
            })
    }
}

fn query_error(e: rusqlite::Error) -> StockdashError {
    StockdashError::DatabaseQuery {
        reason: e.to_string(),
    }
}

fn now() -> String {
    Utc::now().naive_utc().format(TIMESTAMP_FORMAT).to_string()
}

fn parse_timestamp(idx: usize, value: String) -> rusqlite::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(&value, TIMESTAMP_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

impl WatchlistStore for SqliteAdapter {
    fn add_to_watchlist(&self, symbol: &str, notes: Option<&str>) -> Result<i64, StockdashError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO watchlists (symbol, added_date, notes, is_favorite)
             VALUES (?1, ?2, ?3, 0)",
            params![symbol, now(), notes],
        )
        .map_err(query_error)?;

        let id = conn.last_insert_rowid();
        info!(symbol, id, "added to watchlist");
        Ok(id)
    }

    fn remove_from_watchlist(&self, symbol: &str) -> Result<usize, StockdashError> {
        let conn = self.conn()?;
        let removed = conn
            .execute("DELETE FROM watchlists WHERE symbol = ?1", params![symbol])
            .map_err(query_error)?;

        info!(symbol, removed, "removed from watchlist");
        Ok(removed)
    }

    fn watchlist(&self) -> Result<Vec<WatchlistEntry>, StockdashError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, symbol, added_date, notes, is_favorite
                 FROM watchlists
                 ORDER BY id ASC",
            )
            .map_err(query_error)?;

        let rows = stmt
            .query_map([], |row| {
                Ok(WatchlistEntry {
                    id: row.get(0)?,
                    symbol: row.get(1)?,
                    added_date: parse_timestamp(2, row.get(2)?)?,
                    notes: row.get(3)?,
                    is_favorite: row.get(4)?,
                })
            })
            .map_err(query_error)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(query_error)
    }

    fn add_search(&self, symbol: &str, period: Period) -> Result<i64, StockdashError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO search_history (symbol, search_date, period) VALUES (?1, ?2, ?3)",
            params![symbol, now(), period.as_str()],
        )
        .map_err(query_error)?;

        let id = conn.last_insert_rowid();
        info!(symbol, %period, id, "recorded search");
        Ok(id)
    }

    fn recent_searches(&self, limit: usize) -> Result<Vec<SearchRecord>, StockdashError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, symbol, search_date, period
                 FROM search_history
                 ORDER BY search_date DESC, id DESC
                 LIMIT ?1",
            )
            .map_err(query_error)?;

        let rows = stmt
            .query_map(params![limit as i64], |row| {
                let period_str: String = row.get(3)?;
                let period = period_str.parse::<Period>().map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        3,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?;
                Ok(SearchRecord {
                    id: row.get(0)?,
                    symbol: row.get(1)?,
                    search_date: parse_timestamp(2, row.get(2)?)?,
                    period,
                })
            })
            .map_err(query_error)?;

        rows.collect::<Result<Vec<_>, _>>().map_err(query_error)
    }
}
