//! Per-question tensor cache.
//!
//! Every target question is preprocessed exactly once, when the cache is
//! built, and reused for every context served afterwards.

use std::collections::HashMap;

use crate::models::EncodedText;
use crate::preprocess::Preprocessor;
use crate::QaError;

/// Preprocessed questions keyed by target label, in construction order.
#[derive(Debug, Clone, Default)]
pub struct QueryCache {
    order: Vec<String>,
    entries: HashMap<String, EncodedText>,
}

impl QueryCache {
    /// Preprocess the question for every label in `targets`.
    ///
    /// # Errors
    ///
    /// - [`QaError::MissingQuery`] if a label has no entry in `queries`.
    /// - Any tokenization error raised while preprocessing a question.
    ///
    /// A label listed twice is preprocessed again and overwrites the first
    /// entry, but keeps its original position.
    pub fn build<S: AsRef<str>>(
        preprocessor: &Preprocessor,
        targets: &[S],
        queries: &HashMap<String, String>,
    ) -> Result<Self, QaError> {
        let mut cache = QueryCache {
            order: Vec::with_capacity(targets.len()),
            entries: HashMap::with_capacity(targets.len()),
        };
        for label in targets {
            let label = label.as_ref();
            let question = queries
                .get(label)
                .ok_or_else(|| QaError::MissingQuery(label.to_string()))?;
            let encoded = preprocessor.preprocess(question)?;
            if cache.entries.insert(label.to_string(), encoded).is_none() {
                cache.order.push(label.to_string());
            }
        }
        Ok(cache)
    }

    pub fn get(&self, label: &str) -> Result<&EncodedText, QaError> {
        self.entries
            .get(label)
            .ok_or_else(|| QaError::NotFound(label.to_string()))
    }

    pub fn contains(&self, label: &str) -> bool {
        self.entries.contains_key(label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// `(label, tensors)` pairs in construction order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &EncodedText)> {
        self.order
            .iter()
            .filter_map(|label| self.entries.get(label).map(|e| (label.as_str(), e)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
