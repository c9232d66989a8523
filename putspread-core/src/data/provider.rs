//! Loader trait and structured error types.
//!
//! A `SeriesLoader` turns a ticker symbol into a validated `PriceSeries`.
//! Implementations handle the specifics of a source (CSV on disk, Alpha
//! Vantage over HTTP); the evaluator never sees where the data came from.

use thiserror::Error;

use crate::domain::PriceSeries;
use crate::error::InputError;

/// Structured errors for data loading.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider: {0}")]
    RateLimited(String),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("invalid symbol: '{0}'")]
    InvalidSymbol(String),

    #[error("missing API key: set {0}")]
    MissingApiKey(&'static str),

    #[error("invalid series: {0}")]
    Invalid(#[from] InputError),
}

/// Source of daily price series.
pub trait SeriesLoader: Send + Sync {
    /// Human-readable name of this loader.
    fn name(&self) -> &str;

    /// Load the full daily history available for `symbol`, oldest first.
    fn load(&self, symbol: &str) -> Result<PriceSeries, DataError>;
}

/// Trim and upper-case a ticker; reject anything that is not a plain symbol.
pub fn normalize_symbol(symbol: &str) -> Result<String, DataError> {
    let s = symbol.trim().to_uppercase();
    let valid = !s.is_empty()
        && s.len() <= 12
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^'));
    if valid {
        Ok(s)
    } else {
        Err(DataError::InvalidSymbol(symbol.to_string()))
    }
}
