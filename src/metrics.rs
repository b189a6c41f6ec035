//! Corpus statistics reported after data-source construction.

use std::fmt;

use serde::Serialize;

/// Counters computed once when a data source is built, read-only afterward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    /// Number of sessions in the split.
    pub n_sessions: usize,
    /// Number of utterances across all sessions.
    pub n_uttrs: usize,
    /// Raw whitespace token count across all utterance texts.
    pub n_tokens: usize,
    /// Number of training segments (positives plus negatives).
    pub n_segments: usize,
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} sessions, {} utterances, {} tokens, {} segments",
            self.n_sessions, self.n_uttrs, self.n_tokens, self.n_segments
        )
    }
}

/// Raw token count of an utterance text, used for reporting only.
///
/// Splits on single spaces rather than going through the tokenizer, matching
/// the historical reporting convention; note that empty text counts as one
/// token under this rule.
pub fn raw_token_count(text: &str) -> usize {
    text.split(' ').count()
}
