//! Word tokenizers backed by the `tokenizers` crate's pre-tokenizers.
//!
//! Only the segmentation stage is used: no vocabulary, no ids. The BiDAF
//! graph maps words to ids itself.
//!
//! | Name | Pre-tokenizer | `"Don't stop."` |
//! |------|---------------|-----------------|
//! | `bert` | `BertPreTokenizer` | `Don` `'` `t` `stop` `.` |
//! | `whitespace` | `Whitespace` (`\w+\|[^\w\s]+`) | `Don` `'` `t` `stop` `.` |
//!
//! The two differ on runs of punctuation: `bert` emits every punctuation
//! character as its own token, `whitespace` keeps a run like `?!` together.

use anyhow::{bail, Result};
use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
use tokenizers::pre_tokenizers::whitespace::Whitespace;
use tokenizers::{OffsetReferential, OffsetType, PreTokenizedString, PreTokenizer};

use passage_qa_core::tokenizer::WordTokenizer;
use passage_qa_core::QaError;

/// Accepted values for `preprocess.tokenizer`.
pub const TOKENIZER_NAMES: &[&str] = &["bert", "whitespace"];

/// Adapts any `tokenizers` pre-tokenizer to [`WordTokenizer`].
pub struct PreTokenizerWords<P> {
    name: &'static str,
    inner: P,
}

impl<P> PreTokenizerWords<P> {
    pub fn new(name: &'static str, inner: P) -> Self {
        Self { name, inner }
    }
}

impl<P> WordTokenizer for PreTokenizerWords<P>
where
    P: PreTokenizer + Send + Sync,
{
    fn name(&self) -> &str {
        self.name
    }

    fn tokenize(&self, text: &str) -> Result<Vec<String>, QaError> {
        let mut pretokenized = PreTokenizedString::from(text);
        self.inner
            .pre_tokenize(&mut pretokenized)
            .map_err(|e| QaError::Tokenization(e.to_string()))?;
        Ok(pretokenized
            .get_splits(OffsetReferential::Original, OffsetType::Char)
            .into_iter()
            .map(|(piece, _, _)| piece.to_string())
            .collect())
    }
}

/// Build the tokenizer named in configuration.
pub fn tokenizer_for(name: &str) -> Result<Box<dyn WordTokenizer>> {
    match name {
        "bert" => Ok(Box::new(PreTokenizerWords::new("bert", BertPreTokenizer {}))),
        "whitespace" => Ok(Box::new(PreTokenizerWords::new("whitespace", Whitespace {}))),
        other => bail!(
            "Unknown tokenizer: '{}'. Must be one of: {}.",
            other,
            TOKENIZER_NAMES.join(", ")
        ),
    }
}
