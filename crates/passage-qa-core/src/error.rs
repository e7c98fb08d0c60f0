//! Error taxonomy shared by every stage of the QA pipeline.

/// Failure raised by preprocessing, caching, inference or span decoding.
///
/// Every variant aborts the current top-level call. Nothing in the core
/// retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QaError {
    /// The model artifact could not be created, downloaded or loaded.
    Setup(String),
    /// A target label has no question text.
    MissingQuery(String),
    /// A cache lookup named a label that was never registered.
    NotFound(String),
    /// The tokenizer rejected its input.
    Tokenization(String),
    /// The inference engine failed or returned malformed output.
    Inference(String),
    /// A predicted span does not fit inside the context tokens.
    Bounds { start: i64, end: i64, len: usize },
}

impl std::fmt::Display for QaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QaError::Setup(e) => write!(f, "model setup failed: {}", e),
            QaError::MissingQuery(label) => {
                write!(f, "no question text for target '{}'", label)
            }
            QaError::NotFound(label) => write!(f, "unknown target: {}", label),
            QaError::Tokenization(e) => write!(f, "tokenization failed: {}", e),
            QaError::Inference(e) => write!(f, "inference failed: {}", e),
            QaError::Bounds { start, end, len } => write!(
                f,
                "answer span [{}, {}] out of bounds for {} context tokens",
                start, end, len
            ),
        }
    }
}

impl std::error::Error for QaError {}
