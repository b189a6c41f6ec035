//! Hard-negative sampling from the global utterance pool.
//!
//! A candidate drawn uniformly from the pool qualifies as a negative when its
//! token-id set overlaps the positive's below [`COVERAGE_THRESHOLD`]. The
//! retry loop is bounded so a homogeneous pool surfaces as an error instead
//! of a hang; for non-degenerate pools the bound never triggers and the
//! acceptance statistics match plain rejection sampling.

use std::collections::HashSet;

use rand::Rng;
use tracing::warn;

use crate::constants::sampler::{ATTEMPT_WARN_THRESHOLD, COVERAGE_THRESHOLD};
use crate::data::Utterance;
use crate::errors::SegmentError;
use crate::types::{TokenId, UtteranceIndex};

/// Average bidirectional overlap between two token-id sets:
/// `(|A∩B|/|A| + |A∩B|/|B|) / 2`, in `[0.0, 1.0]`.
///
/// By convention an empty set on either side scores 0.0, so empty utterances
/// always qualify as negatives. bos/eos wrapping makes empty id sequences
/// unreachable for tokenized utterances, but the convention keeps the score
/// total.
pub fn coverage_score(a: &[TokenId], b: &[TokenId]) -> f64 {
    let set_a: HashSet<TokenId> = a.iter().copied().collect();
    let set_b: HashSet<TokenId> = b.iter().copied().collect();
    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }
    let shared = set_a.intersection(&set_b).count() as f64;
    (shared / set_a.len() as f64 + shared / set_b.len() as f64) / 2.0
}

/// True when two id sequences are dissimilar enough to form a negative pair.
pub fn are_different_uttrs(a: &[TokenId], b: &[TokenId]) -> bool {
    coverage_score(a, b) < COVERAGE_THRESHOLD
}

/// Uniform pool sampler with a bounded retry loop.
#[derive(Clone, Debug)]
pub struct NegativeSampler {
    max_attempts: usize,
}

impl NegativeSampler {
    /// Create a sampler that gives up after `max_attempts` draws.
    pub fn new(max_attempts: usize) -> Self {
        Self { max_attempts }
    }

    /// Draw pool indices until one is sufficiently different from
    /// `positive_ids`, returning the accepted candidate's pool index.
    ///
    /// The caller deep-copies the pooled utterance; the pool itself is never
    /// mutated by sampling.
    pub fn sample<R: Rng>(
        &self,
        rng: &mut R,
        pool: &[Utterance],
        positive_ids: &[TokenId],
    ) -> Result<UtteranceIndex, SegmentError> {
        if pool.is_empty() {
            return Err(SegmentError::NegativeSamplingStarvation {
                attempts: 0,
                pool_size: 0,
            });
        }
        for attempt in 1..=self.max_attempts {
            let candidate = rng.random_range(0..pool.len());
            if are_different_uttrs(positive_ids, &pool[candidate].token_ids) {
                if attempt >= ATTEMPT_WARN_THRESHOLD {
                    warn!(attempt, pool_size = pool.len(), "slow negative sample");
                }
                return Ok(candidate);
            }
        }
        Err(SegmentError::NegativeSamplingStarvation {
            attempts: self.max_attempts,
            pool_size: pool.len(),
        })
    }
}
