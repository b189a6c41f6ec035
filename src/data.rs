use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::constants::data::FLOOR_ORDER;
use crate::errors::SegmentError;
use crate::types::{FloorId, IdRows, Token, TokenId, UtteranceIndex};

/// Speaker floor label for an utterance. Two-party dialogues only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Floor {
    /// First speaker (floor id 0).
    A,
    /// Second speaker (floor id 1).
    B,
}

impl Floor {
    /// Parse a raw floor label using the fixed `["A", "B"]` order.
    ///
    /// Any other label is fatal at construction time.
    pub fn parse(label: &str) -> Result<Self, SegmentError> {
        match label {
            l if l == FLOOR_ORDER[0] => Ok(Floor::A),
            l if l == FLOOR_ORDER[1] => Ok(Floor::B),
            other => Err(SegmentError::InvalidFloorLabel {
                label: other.to_string(),
            }),
        }
    }

    /// Numeric id assigned by the fixed floor order.
    pub fn id(self) -> FloorId {
        match self {
            Floor::A => 0,
            Floor::B => 1,
        }
    }
}

/// Mutable per-utterance metadata attached during segment building.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UtteranceMeta {
    /// Pool index of the true positive this target corresponds to.
    ///
    /// Positive targets reference their own pool slot; negative targets
    /// reference the positive they were substituted for. `None` on pooled
    /// (non-target) utterances.
    pub reference: Option<UtteranceIndex>,
}

/// One dialogue turn with its derived tokenization fields.
///
/// `tokens` is truncated to `max_uttr_len` before id conversion; `token_ids`
/// is bos/eos-wrapped, so it is never empty.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Utterance {
    /// Raw utterance text.
    pub text: String,
    /// Speaker floor.
    pub floor: Floor,
    /// Truncated surface tokens.
    pub tokens: Vec<Token>,
    /// bos/eos-wrapped token ids.
    pub token_ids: Vec<TokenId>,
    /// Whether this utterance is the genuine next turn of its context.
    /// True for every pooled utterance; set to false on sampled negatives.
    pub is_next: bool,
    /// Back-reference metadata, populated on segment targets.
    pub meta: UtteranceMeta,
}

impl Utterance {
    /// Numeric floor id of this utterance.
    pub fn floor_id(&self) -> FloorId {
        self.floor.id()
    }
}

/// One session recorded as a contiguous range of the utterance pool.
///
/// Sessions exclusively own their utterances; the pool is the flat backing
/// store and sessions address into it by index.
#[derive(Clone, Copy, Debug)]
pub struct Session {
    /// Pool index of the session's first utterance.
    pub start: UtteranceIndex,
    /// Number of utterances in the session.
    pub len: usize,
}

impl Session {
    /// Pool indices covered by this session, in turn order.
    pub fn indices(&self) -> Range<UtteranceIndex> {
        self.start..self.start + self.len
    }
}

/// Placeholder segment metadata, kept for schema stability.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SegmentMeta {}

/// One training sample: a bounded context window plus a target utterance.
///
/// Invariants maintained by the builder:
/// - `context` holds 1..=history_len contiguous pool indices from a single
///   session, ending one turn before the target position;
/// - `target` is an owned copy, never aliased into the pool, so mutating it
///   (is_next flag, back-reference) cannot corrupt shared state;
/// - `target.meta.reference` always resolves to a pool utterance.
#[derive(Clone, Debug)]
pub struct Segment {
    /// Pool indices of the context window, oldest turn first.
    pub context: Vec<UtteranceIndex>,
    /// Owned target: positive copy or sampled negative copy.
    pub target: Utterance,
    /// Placeholder metadata.
    pub meta: SegmentMeta,
}

impl Segment {
    /// Context length plus the target slot.
    pub fn window_len(&self) -> usize {
        self.context.len() + 1
    }
}

/// Raw utterance record as found in dataset files.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawUtterance {
    /// Utterance text.
    pub text: String,
    /// Floor label, `"A"` or `"B"`.
    pub floor: String,
    /// Free-form metadata carried by the dataset; accepted but not consumed.
    #[serde(default)]
    pub utterance_meta: serde_json::Map<String, serde_json::Value>,
}

/// Raw session record as found in dataset files.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawSession {
    /// Ordered utterances of one multi-turn dialogue.
    pub utterances: Vec<RawUtterance>,
}

/// Model-ready batch produced by one `next()` call.
///
/// Field shapes, with `b` the realized batch size, `h` the configured
/// history length, and `s` a per-field max sequence length:
/// - `context_ids`: b × h × s (context rows padded to the shared s of all
///   context rows in this batch, padding slots trailing the real context)
/// - `context_floors`: b × h
/// - `target_ids`, `reference_ids`: b × s, each padded to its own max length
/// - `target_floors`, `target_is_next`: b
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DialogBatch {
    /// Context token ids (`X` in the training loop).
    pub context_ids: Vec<IdRows>,
    /// Context floor ids (`X_floor`).
    pub context_floors: Vec<Vec<FloorId>>,
    /// Target token ids (`Y`).
    pub target_ids: IdRows,
    /// Referenced true-positive token ids (`Y_ref`).
    pub reference_ids: IdRows,
    /// Target floor ids (`Y_floor`).
    pub target_floors: Vec<FloorId>,
    /// Whether each target is a genuine next utterance (`Y_is_next`).
    pub target_is_next: Vec<bool>,
}

impl DialogBatch {
    /// Number of samples in the batch.
    pub fn len(&self) -> usize {
        self.target_ids.len()
    }

    /// True when the batch carries no samples.
    ///
    /// Paired-mode iteration can legitimately produce an empty batch; callers
    /// must treat that differently from the `None` exhaustion sentinel.
    pub fn is_empty(&self) -> bool {
        self.target_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_parse_follows_fixed_order() {
        assert_eq!(Floor::parse("A").unwrap(), Floor::A);
        assert_eq!(Floor::parse("B").unwrap(), Floor::B);
        assert_eq!(Floor::A.id(), 0);
        assert_eq!(Floor::B.id(), 1);

        let err = Floor::parse("C").unwrap_err();
        assert!(matches!(
            err,
            SegmentError::InvalidFloorLabel { ref label } if label == "C"
        ));
    }

    #[test]
    fn session_indices_cover_contiguous_range() {
        let session = Session { start: 3, len: 4 };
        let indices: Vec<usize> = session.indices().collect();
        assert_eq!(indices, vec![3, 4, 5, 6]);
    }

    #[test]
    fn raw_session_deserializes_dataset_shape() {
        let json = r#"{
            "utterances": [
                {"text": "hi", "floor": "A", "utterance_meta": {"dialog_act": "greet"}},
                {"text": "hello there", "floor": "B"}
            ]
        }"#;
        let session: RawSession = serde_json::from_str(json).unwrap();
        assert_eq!(session.utterances.len(), 2);
        assert_eq!(session.utterances[0].floor, "A");
        assert!(session.utterances[0].utterance_meta.contains_key("dialog_act"));
        assert!(session.utterances[1].utterance_meta.is_empty());
    }

    #[test]
    fn empty_batch_is_distinct_from_absent_batch() {
        let batch = DialogBatch::default();
        assert!(batch.is_empty());
        assert_eq!(batch.len(), 0);
    }
}
