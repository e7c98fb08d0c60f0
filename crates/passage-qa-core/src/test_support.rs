use crate::tokenizer::WordTokenizer;
use crate::QaError;

/// Splits on whitespace and peels trailing `.,?!` into their own tokens.
pub struct PunctTokenizer;

impl WordTokenizer for PunctTokenizer {
    fn name(&self) -> &str {
        "punct"
    }

    fn tokenize(&self, text: &str) -> Result<Vec<String>, QaError> {
        let mut tokens = Vec::new();
        for word in text.split_whitespace() {
            let body = word.trim_end_matches(['.', ',', '?', '!']);
            if !body.is_empty() {
                tokens.push(body.to_string());
            }
            for c in word[body.len()..].chars() {
                tokens.push(c.to_string());
            }
        }
        Ok(tokens)
    }
}

/// Rejects every input.
pub struct BrokenTokenizer;

impl WordTokenizer for BrokenTokenizer {
    fn name(&self) -> &str {
        "broken"
    }

    fn tokenize(&self, _text: &str) -> Result<Vec<String>, QaError> {
        Err(QaError::Tokenization("malformed input".to_string()))
    }
}
