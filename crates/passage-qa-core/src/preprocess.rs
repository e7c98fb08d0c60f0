//! Text → tensor conversion.
//!
//! # Algorithm
//!
//! 1. Tokenize with the configured [`WordTokenizer`].
//! 2. Lower-case every token to build the [`WordTensor`].
//! 3. From the original tokens, keep at most `char_width` characters each
//!    and right-pad with `""` to build the [`CharTensor`].
//!
//! Both tensors always have one row per token.

use crate::models::{CharTensor, EncodedText, WordTensor};
use crate::tokenizer::WordTokenizer;
use crate::QaError;

/// Binds a tokenizer to a character width.
pub struct Preprocessor {
    tokenizer: Box<dyn WordTokenizer>,
    char_width: usize,
}

impl Preprocessor {
    pub fn new(tokenizer: Box<dyn WordTokenizer>, char_width: usize) -> Self {
        Self {
            tokenizer,
            char_width,
        }
    }

    pub fn char_width(&self) -> usize {
        self.char_width
    }

    pub fn tokenizer_name(&self) -> &str {
        self.tokenizer.name()
    }

    /// Convert `text` into word and character tensors.
    pub fn preprocess(&self, text: &str) -> Result<EncodedText, QaError> {
        let tokens = self.tokenizer.tokenize(text)?;
        Ok(encode_tokens(tokens, self.char_width))
    }
}

/// Build both tensors from already-tokenized text.
pub fn encode_tokens(tokens: Vec<String>, char_width: usize) -> EncodedText {
    let words = WordTensor::from_tokens(&tokens);
    let chars = CharTensor::from_tokens(&tokens, char_width);
    EncodedText {
        tokens,
        words,
        chars,
    }
}
