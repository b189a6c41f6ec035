/// Vocabulary id produced by a tokenizer.
/// Example: `17` for the token `hello` under a whitespace vocabulary.
pub type TokenId = i64;
/// Surface-form token string.
/// Example: `hello`
pub type Token = String;
/// Numeric speaker-floor id assigned by the fixed floor order.
/// `"A"` maps to 0, `"B"` maps to 1.
pub type FloorId = i64;
/// Stable index of an utterance in the global utterance pool.
///
/// Pool indices double as back-reference handles: a target utterance records
/// the pool index of the true positive it corresponds to instead of holding a
/// direct (possibly cyclic) reference.
pub type UtteranceIndex = usize;
/// Padded 2-D id matrix; every row shares the batch's max length.
pub type IdRows = Vec<Vec<TokenId>>;
