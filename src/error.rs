//! Error types shared by the fetcher, feature engine and predictor

use polars::error::PolarsError;
use thiserror::Error;

/// Failures talking to the remote price provider
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No price data returned for {0}")]
    NoData(String),

    #[error("Provider contract violated: {0}")]
    Contract(String),
}

/// Errors raised anywhere in the fetch → features → predict pipeline
#[derive(Error, Debug)]
pub enum ExcursionError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Degenerate denominator computing {column} at row {row}")]
    DegenerateDenominator { column: String, row: usize },

    #[error("Incomplete rows: all {total} rows lack one or more required fields")]
    IncompleteRows { total: usize },

    #[error("Schema mismatch: missing or non-numeric columns {missing:?}")]
    SchemaMismatch { missing: Vec<String> },

    #[error("Invalid price series: {0}")]
    InvalidSeries(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Not enough complete rows: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("Regression failed: {0}")]
    Regression(String),

    #[error(transparent)]
    Polars(#[from] PolarsError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, ExcursionError>;
