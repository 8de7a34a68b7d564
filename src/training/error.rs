use crate::dataset::error::DatasetLoadError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrainingError {
    #[error("Not enough rows to train {model}: need at least {required}, found {found}")]
    InsufficientData {
        model: String,
        required: usize,
        found: usize,
    },

    #[error("Invalid forest configuration: {0}")]
    InvalidConfig(String),

    #[error("Feature matrix has {rows} rows but {targets} targets were given")]
    ShapeMismatch { rows: usize, targets: usize },

    #[error("Row {row} holds a NaN or infinite value")]
    NonFiniteValue { row: usize },

    #[error(transparent)]
    Dataset(#[from] DatasetLoadError),
}
