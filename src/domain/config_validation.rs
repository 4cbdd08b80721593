//! Dashboard configuration loading and validation.
//!
//! Validates all config fields before any command touches data or storage.

use crate::domain::chart::{IndicatorToggleConfig, Theme};
use crate::domain::error::StockdashError;
use crate::domain::period::Period;
use crate::ports::config_port::ConfigPort;
use crate::ports::store_port::DEFAULT_RECENT_SEARCHES;

pub const DEFAULT_SYMBOL: &str = "AAPL";
pub const DEFAULT_POOL_SIZE: i64 = 4;

/// Resolved `[dashboard]`, `[data]` and `[indicators]` settings.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSettings {
    pub default_symbol: String,
    pub default_period: Period,
    pub recent_searches: usize,
    pub theme: Theme,
    pub csv_dir: Option<String>,
    pub indicators: IndicatorToggleConfig,
}

impl DashboardSettings {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, StockdashError> {
        validate_dashboard_config(config)?;

        let default_symbol = config
            .get_string("dashboard", "default_symbol")
            .map(|s| s.trim().to_uppercase())
            .unwrap_or_else(|| DEFAULT_SYMBOL.to_string());
        let default_period = match config.get_string("dashboard", "default_period") {
            Some(s) => s.parse()?,
            None => Period::default(),
        };
        let recent_searches =
            config.get_int("dashboard", "recent_searches", DEFAULT_RECENT_SEARCHES as i64) as usize;
        let theme = if config.get_bool("dashboard", "dark_mode", true) {
            Theme::Dark
        } else {
            Theme::Light
        };

        Ok(DashboardSettings {
            default_symbol,
            default_period,
            recent_searches,
            theme,
            csv_dir: config.get_string("data", "csv_dir"),
            indicators: IndicatorToggleConfig {
                sma: config.get_bool("indicators", "sma", false),
                ema: config.get_bool("indicators", "ema", false),
                bollinger: config.get_bool("indicators", "bollinger", false),
                rsi: config.get_bool("indicators", "rsi", false),
                macd: config.get_bool("indicators", "macd", false),
            },
        })
    }
}

pub fn validate_dashboard_config(config: &dyn ConfigPort) -> Result<(), StockdashError> {
    validate_default_symbol(config)?;
    validate_default_period(config)?;
    validate_recent_searches(config)?;
    validate_pool_size(config)?;
    Ok(())
}

/// Ticker symbols: non-empty, ASCII alphanumeric plus `.`, `-` and `^`
/// (`BRK.B`, `^GSPC`, `RDS-A`).
pub fn validate_symbol(symbol: &str) -> Result<(), StockdashError> {
    let trimmed = symbol.trim();
    if trimmed.is_empty() {
        return Err(StockdashError::InvalidSymbol {
            symbol: symbol.to_string(),
            reason: "symbol must not be empty".to_string(),
        });
    }
    if let Some(bad) = trimmed
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^')))
    {
        return Err(StockdashError::InvalidSymbol {
            symbol: symbol.to_string(),
            reason: format!("unexpected character {:?}", bad),
        });
    }
    Ok(())
}

fn validate_default_symbol(config: &dyn ConfigPort) -> Result<(), StockdashError> {
    match config.get_string("dashboard", "default_symbol") {
        None => Ok(()),
        Some(s) => validate_symbol(&s).map_err(|e| StockdashError::ConfigInvalid {
            section: "dashboard".to_string(),
            key: "default_symbol".to_string(),
            reason: e.to_string(),
        }),
    }
}

fn validate_default_period(config: &dyn ConfigPort) -> Result<(), StockdashError> {
    match config.get_string("dashboard", "default_period") {
        None => Ok(()),
        Some(s) => s
            .parse::<Period>()
            .map(|_| ())
            .map_err(|e| StockdashError::ConfigInvalid {
                section: "dashboard".to_string(),
                key: "default_period".to_string(),
                reason: e.to_string(),
            }),
    }
}

fn validate_recent_searches(config: &dyn ConfigPort) -> Result<(), StockdashError> {
    let value = config.get_int("dashboard", "recent_searches", DEFAULT_RECENT_SEARCHES as i64);
    if value <= 0 {
        return Err(StockdashError::ConfigInvalid {
            section: "dashboard".to_string(),
            key: "recent_searches".to_string(),
            reason: "recent_searches must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_pool_size(config: &dyn ConfigPort) -> Result<(), StockdashError> {
    let value = config.get_int("sqlite", "pool_size", DEFAULT_POOL_SIZE);
    if value <= 0 {
        return Err(StockdashError::ConfigInvalid {
            section: "sqlite".to_string(),
            key: "pool_size".to_string(),
            reason: "pool_size must be positive".to_string(),
        });
    }
    Ok(())
}
