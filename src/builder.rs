//! Expands tokenized sessions into positive/negative training segments.
//!
//! For a session `u[0..n-1]`, every end index in `1..n` contributes a pair of
//! segments sharing one context window `u[max(0, end-history_len)..end]`: a
//! positive segment whose target is `u[end]` and, immediately after it, a
//! negative segment whose target is a deep copy of a pool utterance accepted
//! by the negative sampler. Sessions with fewer than two utterances
//! contribute nothing.

use rand::Rng;

use crate::data::{Segment, SegmentMeta, Session, Utterance};
use crate::errors::SegmentError;
use crate::negative::NegativeSampler;
use crate::types::UtteranceIndex;

/// Builds the full segment list for a set of sessions over a shared pool.
pub struct SegmentBuilder<'a> {
    pool: &'a [Utterance],
    history_len: usize,
    sampler: NegativeSampler,
}

impl<'a> SegmentBuilder<'a> {
    /// Create a builder over an immutable pool.
    pub fn new(pool: &'a [Utterance], history_len: usize, sampler: NegativeSampler) -> Self {
        Self {
            pool,
            history_len,
            sampler,
        }
    }

    /// Produce all segments, preserving session order and within-session end
    /// index order, each positive immediately followed by its paired
    /// negative.
    pub fn build<R: Rng>(
        &self,
        rng: &mut R,
        sessions: &[Session],
    ) -> Result<Vec<Segment>, SegmentError> {
        let mut segments = Vec::new();
        for session in sessions {
            for end in 1..session.len {
                let target_idx = session.start + end;
                let window_start = session.start + end.saturating_sub(self.history_len);
                let context: Vec<UtteranceIndex> = (window_start..target_idx).collect();

                segments.push(self.positive_segment(context.clone(), target_idx));
                segments.push(self.negative_segment(rng, context, target_idx)?);
            }
        }
        Ok(segments)
    }

    fn positive_segment(&self, context: Vec<UtteranceIndex>, target_idx: UtteranceIndex) -> Segment {
        let mut target = self.pool[target_idx].clone();
        target.is_next = true;
        target.meta.reference = Some(target_idx);
        Segment {
            context,
            target,
            meta: SegmentMeta::default(),
        }
    }

    fn negative_segment<R: Rng>(
        &self,
        rng: &mut R,
        context: Vec<UtteranceIndex>,
        positive_idx: UtteranceIndex,
    ) -> Result<Segment, SegmentError> {
        let candidate =
            self.sampler
                .sample(rng, self.pool, &self.pool[positive_idx].token_ids)?;
        // Deep copy: the negative owns its mutated fields, the pool entry
        // stays pristine.
        let mut target = self.pool[candidate].clone();
        target.is_next = false;
        target.meta.reference = Some(positive_idx);
        Ok(Segment {
            context,
            target,
            meta: SegmentMeta::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::constants::fixtures::TEST_SEED;
    use crate::data::{Floor, UtteranceMeta};
    use crate::negative::are_different_uttrs;
    use crate::types::TokenId;

    fn uttr(ids: &[TokenId]) -> Utterance {
        Utterance {
            text: String::new(),
            floor: Floor::A,
            tokens: Vec::new(),
            token_ids: ids.to_vec(),
            is_next: true,
            meta: UtteranceMeta::default(),
        }
    }

    /// Pool of two sessions: one with 4 distinct utterances, one with 2.
    fn fixture() -> (Vec<Utterance>, Vec<Session>) {
        let pool = vec![
            uttr(&[1, 10, 11]),
            uttr(&[1, 20, 21]),
            uttr(&[1, 30, 31]),
            uttr(&[1, 40, 41]),
            uttr(&[1, 50, 51]),
            uttr(&[1, 60, 61]),
        ];
        let sessions = vec![Session { start: 0, len: 4 }, Session { start: 4, len: 2 }];
        (pool, sessions)
    }

    #[test]
    fn each_session_contributes_two_segments_per_end_index() {
        let (pool, sessions) = fixture();
        let builder = SegmentBuilder::new(&pool, 5, NegativeSampler::new(1_000));
        let mut rng = StdRng::seed_from_u64(TEST_SEED);
        let segments = builder.build(&mut rng, &sessions).unwrap();
        // 2*(4-1) + 2*(2-1)
        assert_eq!(segments.len(), 8);

        let flags: Vec<bool> = segments.iter().map(|s| s.target.is_next).collect();
        assert_eq!(
            flags,
            vec![true, false, true, false, true, false, true, false]
        );
    }

    #[test]
    fn sessions_shorter_than_two_contribute_nothing() {
        let pool = vec![uttr(&[1, 2])];
        let sessions = vec![Session { start: 0, len: 1 }, Session { start: 1, len: 0 }];
        let builder = SegmentBuilder::new(&pool, 5, NegativeSampler::new(1_000));
        let mut rng = StdRng::seed_from_u64(TEST_SEED);
        assert!(builder.build(&mut rng, &sessions).unwrap().is_empty());
    }

    #[test]
    fn context_window_is_bounded_and_never_truncates_available_history() {
        let (pool, sessions) = fixture();
        let history_len = 2;
        let builder = SegmentBuilder::new(&pool, history_len, NegativeSampler::new(1_000));
        let mut rng = StdRng::seed_from_u64(TEST_SEED);
        let segments = builder.build(&mut rng, &sessions).unwrap();

        for (pair_idx, pair) in segments.chunks(2).enumerate() {
            let positive = &pair[0];
            let end = positive.target.meta.reference.unwrap();
            let session = sessions
                .iter()
                .find(|s| s.indices().contains(&end))
                .unwrap();
            let rel_end = end - session.start;
            let expected_start = session.start + rel_end.saturating_sub(history_len);
            let expected: Vec<usize> = (expected_start..end).collect();
            assert_eq!(positive.context, expected, "pair {pair_idx}");
            assert!(positive.context.len() <= history_len);
            assert!(positive.window_len() >= 2);
            // Paired negative shares the identical window.
            assert_eq!(pair[1].context, positive.context);
        }
    }

    #[test]
    fn negative_targets_are_dissimilar_independent_copies() {
        let (pool, sessions) = fixture();
        let builder = SegmentBuilder::new(&pool, 5, NegativeSampler::new(1_000));
        let mut rng = StdRng::seed_from_u64(TEST_SEED);
        let segments = builder.build(&mut rng, &sessions).unwrap();

        for pair in segments.chunks(2) {
            let (positive, negative) = (&pair[0], &pair[1]);
            assert!(positive.target.is_next);
            assert!(!negative.target.is_next);
            assert_eq!(negative.target.meta.reference, positive.target.meta.reference);
            assert!(are_different_uttrs(
                &negative.target.token_ids,
                &positive.target.token_ids
            ));
        }
        // Pool entries were never mutated by sampling or flagging.
        for uttr in &pool {
            assert!(uttr.is_next);
            assert!(uttr.meta.reference.is_none());
        }
    }
}
