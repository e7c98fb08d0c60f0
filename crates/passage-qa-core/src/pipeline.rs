//! Context → answers orchestration.
//!
//! For one context: preprocess once, then for every cached question run the
//! engine, validate the span and decode it. The first failure aborts the
//! whole call; no partial mapping is returned.

use crate::engine::InferenceEngine;
use crate::models::Answers;
use crate::preprocess::Preprocessor;
use crate::query_cache::QueryCache;
use crate::span::AnswerSpan;
use crate::QaError;

/// Answer every cached question against `context`.
pub fn answer_all(
    engine: &dyn InferenceEngine,
    preprocessor: &Preprocessor,
    queries: &QueryCache,
    context: &str,
) -> Result<Answers, QaError> {
    answer_all_observed(engine, preprocessor, queries, context, |_, _| {})
}

/// Like [`answer_all`], calling `observe` with each label and its
/// validated span as soon as it is decoded.
pub fn answer_all_observed<F>(
    engine: &dyn InferenceEngine,
    preprocessor: &Preprocessor,
    queries: &QueryCache,
    context: &str,
    mut observe: F,
) -> Result<Answers, QaError>
where
    F: FnMut(&str, AnswerSpan),
{
    let encoded = preprocessor.preprocess(context)?;
    let mut answers = Answers::with_capacity(queries.len());

    for (label, query) in queries.iter() {
        let (start, end) = engine.predict(&encoded, query)?;
        let span = AnswerSpan::checked(start, end, encoded.len())?;
        observe(label, span);
        answers.insert(label, span.extract(&encoded.words)?);
    }

    Ok(answers)
}
