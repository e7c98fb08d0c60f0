//! # Passage QA Core
//!
//! Pure logic for answering questions about a passage with a BiDAF-style
//! model: the word/character tensor layout, the per-question cache, span
//! decoding, and the traits that stand in for the tokenizer and the
//! inference engine.
//!
//! This crate performs no filesystem or network I/O. Model download,
//! ONNX execution and configuration live in the `passage-qa` app crate.
//!
//! ```rust
//! use passage_qa_core::engine::FixedSpanEngine;
//! use passage_qa_core::pipeline::answer_all;
//! use passage_qa_core::preprocess::Preprocessor;
//! use passage_qa_core::query_cache::QueryCache;
//! use passage_qa_core::tokenizer::WordTokenizer;
//! use passage_qa_core::QaError;
//! use std::collections::HashMap;
//!
//! struct Spaces;
//!
//! impl WordTokenizer for Spaces {
//!     fn name(&self) -> &str {
//!         "spaces"
//!     }
//!     fn tokenize(&self, text: &str) -> Result<Vec<String>, QaError> {
//!         Ok(text.split_whitespace().map(str::to_string).collect())
//!     }
//! }
//!
//! let preprocessor = Preprocessor::new(Box::new(Spaces), 16);
//! let queries = HashMap::from([("who".to_string(), "Who wrote it?".to_string())]);
//! let cache = QueryCache::build(&preprocessor, &["who"], &queries).unwrap();
//!
//! let engine = FixedSpanEngine::new(0, 1);
//! let answers = answer_all(&engine, &preprocessor, &cache, "Ada Lovelace wrote it").unwrap();
//! assert_eq!(answers.get("who"), Some("ada lovelace"));
//! ```

pub mod engine;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod preprocess;
pub mod query_cache;
pub mod span;
pub mod tokenizer;

pub use error::QaError;

#[cfg(test)]
pub(crate) mod test_support;
