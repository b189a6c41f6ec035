#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Segment builder that expands sessions into training samples.
pub mod builder;
/// Data-source configuration.
pub mod config;
/// Centralized constants used across sampler, builder, and source.
pub mod constants;
/// Dataset-file loading helpers.
pub mod corpus;
/// Dialogue data model and batch types.
pub mod data;
/// Corpus statistics helpers.
pub mod metrics;
/// Hard-negative sampling.
pub mod negative;
/// Data source construction and the epoch/batch iteration protocol.
pub mod source;
/// Tokenizer interface and whitespace reference implementation.
pub mod tokenizer;
/// Shared type aliases.
pub mod types;

mod errors;

pub use builder::SegmentBuilder;
pub use config::DataConfig;
pub use corpus::{load_dataset, SplitSessions};
pub use data::{
    DialogBatch, Floor, RawSession, RawUtterance, Segment, SegmentMeta, Session, Utterance,
    UtteranceMeta,
};
pub use errors::SegmentError;
pub use metrics::Statistics;
pub use negative::{are_different_uttrs, coverage_score, NegativeSampler};
pub use source::DataSource;
pub use tokenizer::{Tokenizer, WhitespaceTokenizer};
pub use types::{FloorId, IdRows, Token, TokenId, UtteranceIndex};
