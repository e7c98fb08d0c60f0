//! Word tokenizer abstraction.
//!
//! Segmentation rules belong to the implementation. The pipeline only relies
//! on the returned order, which is the sequence the model scores positions
//! against. Concrete tokenizers live in the `passage-qa` app crate.

use crate::QaError;

/// Splits text into an ordered sequence of word and punctuation tokens.
pub trait WordTokenizer: Send + Sync {
    /// Short identifier used in configuration and diagnostics (e.g. `"bert"`).
    fn name(&self) -> &str;

    /// Tokenize `text`. Rejected input surfaces as [`QaError::Tokenization`].
    fn tokenize(&self, text: &str) -> Result<Vec<String>, QaError>;
}
