/// Error types for the dashboard core.
use thiserror::Error;

/// Main error type for loading and querying the sales dataset.
///
/// Malformed rows and unparseable locations never show up here: the loader
/// drops or defaults them and only counts them in its `LoadReport`. An empty
/// filter result is not an error either.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Failed to read or parse the CSV file
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Percentage delta against a prior period whose aggregate is zero
    #[error("Delta is undefined: prior period is zero (current value {current})")]
    DivisionUndefined { current: f64 },

    #[error("Unknown measure: {0}")]
    InvalidMeasure(String),

    #[error("Unknown dimension: {0}")]
    InvalidDimension(String),

    #[error("Unknown column: {0}")]
    InvalidColumn(String),

    #[error("Unknown period mode: {0}")]
    InvalidPeriodMode(String),

    #[error("Unknown comparison window: {0}")]
    InvalidComparison(String),

    /// Month-over-month comparison on a request without a month
    #[error("Month-over-month comparison needs a month")]
    MonthRequired,
}

pub type Result<T> = std::result::Result<T, DashboardError>;
