//! Sensor Data Error Types

use thiserror::Error;

/// Errors while acquiring a sample corpus
#[derive(Debug, Error)]
pub enum SensorDataError {
    /// Dataset header lacks a required axis column
    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),

    /// A cell could not be parsed as a number
    #[error("Invalid value {value:?} in column {column} at row {row}")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },

    /// Dataset has a header but no rows
    #[error("Dataset contains no samples")]
    EmptyDataset,

    /// Malformed CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
