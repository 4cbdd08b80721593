//! Domain error types.

/// Top-level error type for stockdash.
#[derive(Debug, thiserror::Error)]
pub enum StockdashError {
    #[error("database error: {reason}")]
    Database { reason: String },

    #[error("database query error: {reason}")]
    DatabaseQuery { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid symbol {symbol:?}: {reason}")]
    InvalidSymbol { symbol: String, reason: String },

    #[error("invalid period {value:?} (expected one of 1mo, 3mo, 6mo, 1y, 2y, 5y)")]
    InvalidPeriod { value: String },

    #[error("invalid series: {reason}")]
    InvalidSeries { reason: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("indicator column {column} missing from indicator set")]
    MissingIndicator { column: String },

    #[error("serialization error: {reason}")]
    Serialization { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for StockdashError {
    fn from(err: serde_json::Error) -> Self {
        StockdashError::Serialization {
            reason: err.to_string(),
        }
    }
}

impl From<&StockdashError> for std::process::ExitCode {
    fn from(err: &StockdashError) -> Self {
        let code: u8 = match err {
            StockdashError::Io(_) | StockdashError::Serialization { .. } => 1,
            StockdashError::ConfigParse { .. }
            | StockdashError::ConfigMissing { .. }
            | StockdashError::ConfigInvalid { .. } => 2,
            StockdashError::Database { .. } | StockdashError::DatabaseQuery { .. } => 3,
            StockdashError::InvalidSymbol { .. } | StockdashError::InvalidPeriod { .. } => 4,
            StockdashError::NoData { .. }
            | StockdashError::InvalidSeries { .. }
            | StockdashError::MissingIndicator { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
