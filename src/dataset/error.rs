use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetLoadError {
    #[error("Failed to read historical CSV file '{0}'")]
    CsvRead(PathBuf, #[source] PolarsError),

    #[error("Failed to parse historical CSV data")]
    CsvParse(#[source] PolarsError),

    #[error("Historical dataset has no usable columns")]
    NoUsableColumns,

    #[error("Failed to drop incomplete and duplicate rows")]
    Cleaning(#[source] PolarsError),

    #[error("Required column '{column}' not found in historical dataset")]
    MissingColumn { column: String },

    #[error("Column '{column}' cannot be read as {expected}")]
    InvalidColumn {
        column: String,
        expected: &'static str,
        #[source]
        source: PolarsError,
    },

    // Only reachable when a frame bypassed cleaning.
    #[error("Column '{column}' has a missing value at row {row}")]
    MissingValue { column: String, row: usize },
}
