//! Span decoding: predicted token positions → answer text.

use crate::models::WordTensor;
use crate::QaError;

/// Inclusive `[start, end]` token range inside a context of known length.
///
/// Only obtainable through [`AnswerSpan::checked`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerSpan {
    start: usize,
    end: usize,
}

impl AnswerSpan {
    /// Validate raw engine positions against a context of `len` tokens.
    ///
    /// Requires `0 <= start <= end <= len - 1`.
    pub fn checked(start: i64, end: i64, len: usize) -> Result<Self, QaError> {
        let out_of_bounds = || QaError::Bounds { start, end, len };
        if start < 0 || end < start {
            return Err(out_of_bounds());
        }
        let s = usize::try_from(start).map_err(|_| out_of_bounds())?;
        let e = usize::try_from(end).map_err(|_| out_of_bounds())?;
        if e >= len {
            return Err(out_of_bounds());
        }
        Ok(Self { start: s, end: e })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Join the covered words with single spaces.
    ///
    /// Fails with [`QaError::Bounds`] if `words` is shorter than the
    /// context the span was checked against.
    pub fn extract(&self, words: &WordTensor) -> Result<String, QaError> {
        words
            .words()
            .get(self.start..=self.end)
            .map(|covered| covered.join(" "))
            .ok_or(QaError::Bounds {
                start: self.start as i64,
                end: self.end as i64,
                len: words.len(),
            })
    }
}

/// Decode `[start, end]` from `words` into a space-joined answer.
pub fn decode_span(words: &WordTensor, start: i64, end: i64) -> Result<String, QaError> {
    AnswerSpan::checked(start, end, words.len())?.extract(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fox() -> WordTensor {
        WordTensor::from_tokens(&["the", "quick", "brown", "fox"])
    }

    #[test]
    fn test_decode_middle_span() {
        assert_eq!(decode_span(&fox(), 1, 2).unwrap(), "quick brown");
    }

    #[test]
    fn test_decode_single_token() {
        assert_eq!(decode_span(&fox(), 0, 0).unwrap(), "the");
    }

    #[test]
    fn test_decode_whole_context() {
        assert_eq!(decode_span(&fox(), 0, 3).unwrap(), "the quick brown fox");
    }

    #[test]
    fn test_start_after_end_is_bounds_error() {
        let err = decode_span(&fox(), 2, 1).unwrap_err();
        assert_eq!(
            err,
            QaError::Bounds {
                start: 2,
                end: 1,
                len: 4
            }
        );
    }

    #[test]
    fn test_end_past_last_token_is_bounds_error() {
        let err = decode_span(&fox(), 0, 4).unwrap_err();
        assert!(matches!(err, QaError::Bounds { end: 4, .. }));
    }

    #[test]
    fn test_negative_start_is_bounds_error() {
        let err = decode_span(&fox(), -1, 0).unwrap_err();
        assert!(matches!(err, QaError::Bounds { start: -1, .. }));
    }

    #[test]
    fn test_empty_context_rejects_every_span() {
        let empty = WordTensor::default();
        assert!(decode_span(&empty, 0, 0).is_err());
    }

    #[test]
    fn test_checked_span_accessors() {
        let span = AnswerSpan::checked(1, 3, 4).unwrap();
        assert_eq!((span.start(), span.end()), (1, 3));
    }

    #[test]
    fn test_extract_from_shorter_context_is_bounds_error() {
        let span = AnswerSpan::checked(1, 3, 4).unwrap();
        let short = WordTensor::from_tokens(&["the", "fox"]);
        assert_eq!(
            span.extract(&short).unwrap_err(),
            QaError::Bounds {
                start: 1,
                end: 3,
                len: 2
            }
        );
    }
}
