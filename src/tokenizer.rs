//! Tokenizer interface and a whitespace reference implementation.
//!
//! The data source never assumes a concrete tokenizer: it only needs
//! string-to-token splitting, token-to-id mapping with bos/eos wrapping, and
//! batch padding against a known pad id. Production pipelines plug in their
//! own subword tokenizers behind the same trait.

use indexmap::IndexMap;

use crate::types::{IdRows, Token, TokenId};

/// String/id conversion interface required by the data source.
pub trait Tokenizer: Send + Sync {
    /// Split text into surface tokens. Empty text yields no tokens.
    fn convert_string_to_tokens(&self, text: &str) -> Vec<Token>;

    /// Map tokens to ids, optionally wrapping the sequence with bos/eos.
    fn convert_tokens_to_ids(&self, tokens: &[Token], bos_and_eos: bool) -> Vec<TokenId>;

    /// Id used when padding id rows to a shared length.
    fn pad_id(&self) -> TokenId;

    /// Pad a ragged id batch to the batch's own max row length.
    fn convert_batch_ids_to_tensor(&self, rows: &[Vec<TokenId>]) -> IdRows {
        let max_len = rows.iter().map(Vec::len).max().unwrap_or(0);
        rows.iter()
            .map(|row| {
                let mut padded = row.clone();
                padded.resize(max_len, self.pad_id());
                padded
            })
            .collect()
    }
}

/// Whitespace tokenizer over a fixed vocabulary.
///
/// Special tokens occupy the first four ids; vocabulary words keep their
/// insertion order after that, so a given word list always produces the same
/// id assignment. Unknown tokens map to `<unk>`.
pub struct WhitespaceTokenizer {
    vocab: IndexMap<Token, TokenId>,
    pad: TokenId,
    bos: TokenId,
    eos: TokenId,
    unk: TokenId,
}

impl WhitespaceTokenizer {
    /// Build a tokenizer from vocabulary words.
    ///
    /// `<pad>`, `<bos>`, `<eos>`, `<unk>` take ids 0 through 3; words take
    /// ids from 4 up, duplicates ignored.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut vocab: IndexMap<Token, TokenId> = IndexMap::new();
        for special in ["<pad>", "<bos>", "<eos>", "<unk>"] {
            let id = vocab.len() as TokenId;
            vocab.insert(special.to_string(), id);
        }
        for word in words {
            let word = word.into();
            let id = vocab.len() as TokenId;
            vocab.entry(word).or_insert(id);
        }
        Self {
            vocab,
            pad: 0,
            bos: 1,
            eos: 2,
            unk: 3,
        }
    }

    /// Id of a single token, falling back to `<unk>`.
    pub fn token_id(&self, token: &str) -> TokenId {
        self.vocab.get(token).copied().unwrap_or(self.unk)
    }

    /// Begin-of-sequence id.
    pub fn bos_id(&self) -> TokenId {
        self.bos
    }

    /// End-of-sequence id.
    pub fn eos_id(&self) -> TokenId {
        self.eos
    }

    /// Vocabulary size including special tokens.
    pub fn vocab_size(&self) -> usize {
        self.vocab.len()
    }
}

impl Tokenizer for WhitespaceTokenizer {
    fn convert_string_to_tokens(&self, text: &str) -> Vec<Token> {
        text.split_whitespace().map(str::to_string).collect()
    }

    fn convert_tokens_to_ids(&self, tokens: &[Token], bos_and_eos: bool) -> Vec<TokenId> {
        let mut ids = Vec::with_capacity(tokens.len() + 2);
        if bos_and_eos {
            ids.push(self.bos);
        }
        ids.extend(tokens.iter().map(|token| self.token_id(token)));
        if bos_and_eos {
            ids.push(self.eos);
        }
        ids
    }

    fn pad_id(&self) -> TokenId {
        self.pad
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> WhitespaceTokenizer {
        WhitespaceTokenizer::new(crate::constants::fixtures::TEST_VOCAB)
    }

    #[test]
    fn specials_take_leading_ids_and_words_follow_insertion_order() {
        let tokenizer = fixture();
        assert_eq!(tokenizer.pad_id(), 0);
        assert_eq!(tokenizer.bos_id(), 1);
        assert_eq!(tokenizer.eos_id(), 2);
        assert_eq!(tokenizer.token_id("hi"), 4);
        assert_eq!(tokenizer.token_id("hello"), 5);
        assert_eq!(tokenizer.token_id("never-seen"), 3);
    }

    #[test]
    fn empty_text_still_wraps_with_bos_eos() {
        let tokenizer = fixture();
        let tokens = tokenizer.convert_string_to_tokens("");
        assert!(tokens.is_empty());
        let ids = tokenizer.convert_tokens_to_ids(&tokens, true);
        assert_eq!(ids, vec![tokenizer.bos_id(), tokenizer.eos_id()]);
    }

    #[test]
    fn padding_round_trip_recovers_truncated_tokens() {
        let tokenizer = fixture();
        let tokens = tokenizer.convert_string_to_tokens("how are you");
        let ids = tokenizer.convert_tokens_to_ids(&tokens, true);
        let short = tokenizer.convert_tokens_to_ids(&tokenizer.convert_string_to_tokens("hi"), true);

        let padded = tokenizer.convert_batch_ids_to_tensor(&[ids.clone(), short.clone()]);
        assert_eq!(padded[0].len(), padded[1].len());
        assert_eq!(padded[0], ids);

        // Strip pad, then bos/eos, and map back through the fixed vocab.
        let recovered: Vec<TokenId> = padded[1]
            .iter()
            .copied()
            .filter(|&id| id != tokenizer.pad_id())
            .collect();
        assert_eq!(recovered, short);
        assert_eq!(
            &recovered[1..recovered.len() - 1],
            &[tokenizer.token_id("hi")]
        );
    }

    #[test]
    fn batch_padding_of_empty_batch_is_empty() {
        let tokenizer = fixture();
        let padded = tokenizer.convert_batch_ids_to_tensor(&[]);
        assert!(padded.is_empty());
    }
}
