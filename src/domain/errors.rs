use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the prediction pipeline. Malformed cells in the data
/// file are never errors: the loader coerces them to missing and drops them.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("model file not found at {path:?}")]
    MissingModel { path: PathBuf },

    #[error("data file not found at {path:?}")]
    MissingData { path: PathBuf },

    #[error("not enough data: {rows} usable rows after indicator warmup, need at least {need}")]
    InsufficientData { rows: usize, need: usize },

    #[error("failed to read data file: {0}")]
    DataRead(#[from] csv::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
