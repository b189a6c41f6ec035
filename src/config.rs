use std::path::PathBuf;

use crate::constants::config::{DEFAULT_HISTORY_LEN, DEFAULT_MAX_UTTR_LEN, DEFAULT_SEED};
use crate::constants::sampler::DEFAULT_MAX_SAMPLING_ATTEMPTS;
use crate::errors::SegmentError;

/// Configuration consumed by [`DataSource`](crate::source::DataSource)
/// construction.
#[derive(Clone, Debug)]
pub struct DataConfig {
    /// Path the split was loaded from. Carried for reporting only; the config
    /// does not trigger any IO itself.
    pub dataset_path: PathBuf,
    /// Max tokens kept per utterance before bos/eos wrapping (must be > 0).
    pub max_uttr_len: usize,
    /// Max context utterances per segment (must be >= 1).
    pub history_len: usize,
    /// Seed for the RNG that drives negative sampling and epoch shuffles.
    ///
    /// A fixed seed reproduces both the constructed segment list and every
    /// epoch permutation.
    pub seed: u64,
    /// Bound on uniform pool draws per negative before
    /// [`SegmentError::NegativeSamplingStarvation`] is reported.
    ///
    /// An unbounded retry loop would hang on a homogeneous pool; the bound
    /// keeps acceptance statistics identical for non-degenerate pools while
    /// making starvation detectable.
    pub max_sampling_attempts: usize,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::new(),
            max_uttr_len: DEFAULT_MAX_UTTR_LEN,
            history_len: DEFAULT_HISTORY_LEN,
            seed: DEFAULT_SEED,
            max_sampling_attempts: DEFAULT_MAX_SAMPLING_ATTEMPTS,
        }
    }
}

impl DataConfig {
    /// Validate field ranges before construction starts.
    pub fn validate(&self) -> Result<(), SegmentError> {
        if self.max_uttr_len == 0 {
            return Err(SegmentError::Configuration(
                "max_uttr_len must be greater than 0".into(),
            ));
        }
        if self.history_len == 0 {
            return Err(SegmentError::Configuration(
                "history_len must be at least 1".into(),
            ));
        }
        if self.max_sampling_attempts == 0 {
            return Err(SegmentError::Configuration(
                "max_sampling_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
