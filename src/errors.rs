use std::io;

use thiserror::Error;

/// Error type for data-source construction, negative sampling, and batch
/// iteration failures.
#[derive(Debug, Error)]
pub enum SegmentError {
    #[error("unknown floor label '{label}' (expected \"A\" or \"B\")")]
    InvalidFloorLabel { label: String },
    #[error("negative sampling starved after {attempts} attempts (pool size {pool_size})")]
    NegativeSamplingStarvation { attempts: usize, pool_size: usize },
    #[error("batch shape invariant violated: {details}")]
    ShapeMismatch { details: String },
    #[error("next() called before epoch_init()")]
    IterationNotInitialized,
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("dataset decode failure: {0}")]
    Dataset(#[from] serde_json::Error),
}
