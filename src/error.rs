//! Errors raised while reading the registration sheets.
//!
//! Row numbers count data rows from 1, not including the header line.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("missing column {column:?} (row {row})")]
    MissingColumn { row: usize, column: String },

    #[error("empty value in column {column:?} (row {row})")]
    EmptyField { row: usize, column: String },

    #[error("unknown department {value:?} (row {row})")]
    UnknownDepartment { row: usize, value: String },

    #[error("invalid timestamp {value:?} (row {row}): {source}")]
    InvalidTimestamp {
        row: usize,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("invalid mentee capacity {value:?} (row {row})")]
    InvalidCapacity { row: usize, value: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = LoadError> = std::result::Result<T, E>;
