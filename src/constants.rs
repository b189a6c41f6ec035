/// Constants used by the negative sampler.
pub mod sampler {
    /// Coverage score below which two utterances count as different enough to
    /// form a negative pair.
    pub const COVERAGE_THRESHOLD: f64 = 0.8;
    /// Default bound on uniform pool draws per negative before starvation is
    /// reported.
    pub const DEFAULT_MAX_SAMPLING_ATTEMPTS: usize = 10_000;
    /// Attempt count past which an accepted draw is logged as a slow sample.
    pub const ATTEMPT_WARN_THRESHOLD: usize = 1_000;
}

/// Constants describing the dialogue data model.
pub mod data {
    /// Fixed floor label order; a label's position is its floor id.
    pub const FLOOR_ORDER: [&str; 2] = ["A", "B"];
}

/// Constants used by config defaults.
pub mod config {
    /// Default max tokens kept per utterance before bos/eos wrapping.
    pub const DEFAULT_MAX_UTTR_LEN: usize = 40;
    /// Default max context utterances per segment.
    pub const DEFAULT_HISTORY_LEN: usize = 5;
    /// Default RNG seed.
    pub const DEFAULT_SEED: u64 = 42;
}
