//! Unsupervised dialogue data source: eager construction plus the
//! epoch/batch iteration protocol.
//!
//! Lifecycle: construct once per split, then per epoch call
//! [`DataSource::epoch_init`] followed by repeated [`DataSource::next`] calls
//! until the `None` exhaustion sentinel. All entities (pool, sessions,
//! segments, statistics) are built in the constructor and never structurally
//! mutated afterward; iteration only owns a per-epoch order vector and a
//! cursor.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::info;

use crate::builder::SegmentBuilder;
use crate::config::DataConfig;
use crate::data::{DialogBatch, Floor, RawSession, Segment, Session, Utterance, UtteranceMeta};
use crate::errors::SegmentError;
use crate::metrics::{raw_token_count, Statistics};
use crate::negative::NegativeSampler;
use crate::tokenizer::Tokenizer;
use crate::types::{FloorId, TokenId};

/// Per-epoch iteration state: a (possibly shuffled) order over segment
/// indices plus a consumption cursor.
struct EpochCursor {
    order: Vec<usize>,
    offset: usize,
}

/// Data source for next-utterance-prediction training over one split.
pub struct DataSource {
    config: DataConfig,
    tokenizer: Arc<dyn Tokenizer>,
    /// Flat pool of every utterance across all sessions, in session order.
    /// Grows only during construction, immutable afterward.
    pool: Vec<Utterance>,
    /// Canonical segment list in construction order.
    segments: Vec<Segment>,
    statistics: Statistics,
    /// Ids of the empty padding utterance (bos/eos only), computed once.
    padding_ids: Vec<TokenId>,
    rng: StdRng,
    cursor: Option<EpochCursor>,
}

impl std::fmt::Debug for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataSource")
            .field("config", &self.config)
            .field("pool", &self.pool)
            .field("segments", &self.segments)
            .field("statistics", &self.statistics)
            .field("padding_ids", &self.padding_ids)
            .finish_non_exhaustive()
    }
}

impl DataSource {
    /// Build a data source from raw sessions.
    ///
    /// Eagerly tokenizes every utterance (truncating to `max_uttr_len`
    /// tokens before bos/eos wrapping), maps floor labels to ids, builds the
    /// utterance pool, materializes all positive/negative segments, and
    /// computes statistics. Deterministic for a fixed `config.seed`.
    pub fn new(
        data: &[RawSession],
        config: DataConfig,
        tokenizer: Arc<dyn Tokenizer>,
    ) -> Result<Self, SegmentError> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(config.seed);

        let mut pool: Vec<Utterance> = Vec::new();
        let mut sessions: Vec<Session> = Vec::with_capacity(data.len());
        let mut statistics = Statistics {
            n_sessions: data.len(),
            ..Statistics::default()
        };

        for raw_session in data {
            let start = pool.len();
            for raw in &raw_session.utterances {
                let floor = Floor::parse(&raw.floor)?;
                let mut tokens = tokenizer.convert_string_to_tokens(&raw.text);
                tokens.truncate(config.max_uttr_len);
                let token_ids = tokenizer.convert_tokens_to_ids(&tokens, true);
                statistics.n_tokens += raw_token_count(&raw.text);
                pool.push(Utterance {
                    text: raw.text.clone(),
                    floor,
                    tokens,
                    token_ids,
                    is_next: true,
                    meta: UtteranceMeta::default(),
                });
            }
            sessions.push(Session {
                start,
                len: pool.len() - start,
            });
        }
        statistics.n_uttrs = pool.len();

        let builder = SegmentBuilder::new(
            &pool,
            config.history_len,
            NegativeSampler::new(config.max_sampling_attempts),
        );
        let segments = builder.build(&mut rng, &sessions)?;
        statistics.n_segments = segments.len();

        let empty_tokens = tokenizer.convert_string_to_tokens("");
        let padding_ids = tokenizer.convert_tokens_to_ids(&empty_tokens, true);

        info!(
            dataset_path = %config.dataset_path.display(),
            n_sessions = statistics.n_sessions,
            n_uttrs = statistics.n_uttrs,
            n_tokens = statistics.n_tokens,
            n_segments = statistics.n_segments,
            "data source constructed"
        );

        Ok(Self {
            config,
            tokenizer,
            pool,
            segments,
            statistics,
            padding_ids,
            rng,
            cursor: None,
        })
    }

    /// Corpus statistics computed at construction time.
    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Read-only view of the utterance pool; reference indices carried by
    /// segment targets resolve into this slice.
    pub fn pool(&self) -> &[Utterance] {
        &self.pool
    }

    /// Read-only view of the canonical segment list.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Total segment count (canonical order, both polarities).
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True when the split produced no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Reset the iteration cursor for a new epoch.
    ///
    /// With `shuffle`, the epoch order is a fresh seeded permutation of the
    /// canonical segment order (reproducible for a fixed config seed);
    /// without it, the canonical order is used. Must be called before the
    /// first [`next`](Self::next) of every epoch.
    pub fn epoch_init(&mut self, shuffle: bool) {
        let mut order: Vec<usize> = (0..self.segments.len()).collect();
        if shuffle {
            order.shuffle(&mut self.rng);
        }
        self.cursor = Some(EpochCursor { order, offset: 0 });
    }

    /// Assemble the next batch of up to `batch_size` segments.
    ///
    /// Returns `Ok(None)` once the epoch is exhausted (idempotent terminal
    /// signal) and `Err(IterationNotInitialized)` when called before
    /// [`epoch_init`](Self::epoch_init). A tail batch may be smaller than
    /// requested.
    pub fn next(&mut self, batch_size: usize) -> Result<Option<DialogBatch>, SegmentError> {
        self.next_batch(batch_size, false)
    }

    /// Paired-mode variant of [`next`](Self::next): only negative-target
    /// segments count toward the batch, positives are consumed and skipped,
    /// so every returned target carries a resolvable reference to its true
    /// positive.
    ///
    /// Pairing is an explicit filtering mode, not an iteration side effect,
    /// but it is still order-sensitive: references line up with the
    /// positives of the same construction pair only over the canonical
    /// (unshuffled) epoch order. May return an empty batch when a whole
    /// stretch of segments is filtered out; that is distinct from the
    /// `Ok(None)` exhaustion sentinel.
    pub fn next_paired(&mut self, batch_size: usize) -> Result<Option<DialogBatch>, SegmentError> {
        self.next_batch(batch_size, true)
    }

    fn next_batch(
        &mut self,
        batch_size: usize,
        negatives_only: bool,
    ) -> Result<Option<DialogBatch>, SegmentError> {
        let cursor = self
            .cursor
            .as_mut()
            .ok_or(SegmentError::IterationNotInitialized)?;
        if cursor.offset == cursor.order.len() {
            return Ok(None);
        }

        let history_len = self.config.history_len;
        let mut context_rows: Vec<Vec<TokenId>> = Vec::new();
        let mut context_floors: Vec<FloorId> = Vec::new();
        let mut target_rows: Vec<Vec<TokenId>> = Vec::new();
        let mut reference_rows: Vec<Vec<TokenId>> = Vec::new();
        let mut target_floors: Vec<FloorId> = Vec::new();
        let mut target_is_next: Vec<bool> = Vec::new();

        while cursor.offset < cursor.order.len() && target_rows.len() < batch_size {
            let segment = &self.segments[cursor.order[cursor.offset]];
            cursor.offset += 1;

            if negatives_only && segment.target.is_next {
                continue;
            }

            for &idx in &segment.context {
                let uttr = &self.pool[idx];
                context_rows.push(uttr.token_ids.clone());
                context_floors.push(uttr.floor_id());
            }
            // Pad the remaining history slots with the empty utterance.
            for _ in segment.context.len()..history_len {
                context_rows.push(self.padding_ids.clone());
                context_floors.push(0);
            }

            target_rows.push(segment.target.token_ids.clone());
            target_floors.push(segment.target.floor_id());
            target_is_next.push(segment.target.is_next);

            let reference = segment.target.meta.reference.ok_or_else(|| {
                SegmentError::ShapeMismatch {
                    details: "segment target carries no reference index".into(),
                }
            })?;
            reference_rows.push(self.pool[reference].token_ids.clone());
        }

        let realized = target_rows.len();
        if context_rows.len() != realized * history_len {
            return Err(SegmentError::ShapeMismatch {
                details: format!(
                    "{} context rows for {realized} targets with history_len {history_len}",
                    context_rows.len()
                ),
            });
        }

        // X rows share one padded length; Y and Y_ref pad independently.
        let padded_context = self.tokenizer.convert_batch_ids_to_tensor(&context_rows);
        let target_ids = self.tokenizer.convert_batch_ids_to_tensor(&target_rows);
        let reference_ids = self.tokenizer.convert_batch_ids_to_tensor(&reference_rows);

        let context_ids = padded_context
            .chunks(history_len)
            .map(<[Vec<TokenId>]>::to_vec)
            .collect();
        let context_floors = context_floors
            .chunks(history_len)
            .map(<[FloorId]>::to_vec)
            .collect();

        Ok(Some(DialogBatch {
            context_ids,
            context_floors,
            target_ids,
            reference_ids,
            target_floors,
            target_is_next,
        }))
    }
}
