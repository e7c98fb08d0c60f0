//! The BiDAF runtime: question cache + model lifecycle + serving.
//!
//! # Lifecycle
//!
//! ```text
//!  new() ──▶ Uninitialized ──setup()──▶ Ready ──serve()──▶ Ready
//!                  │                      ▲
//!                  └──────serve()─────────┘   (serve runs setup first)
//! ```
//!
//! `setup()` ensures the model file is on disk (downloading it if absent)
//! and loads the engine. Once Ready, `setup()` returns immediately without
//! touching the filesystem, so `serve()` pays for the artifact check once.

use anyhow::Result;
use std::collections::HashMap;

use passage_qa_core::engine::InferenceEngine;
use passage_qa_core::models::{Answers, EncodedText};
use passage_qa_core::pipeline::answer_all_observed;
use passage_qa_core::preprocess::Preprocessor;
use passage_qa_core::query_cache::QueryCache;
use passage_qa_core::QaError;

use crate::artifact::{ArtifactFetcher, ModelStore};
use crate::config::{Config, RuntimeSettings};
use crate::engine::{default_loader, EngineLoader};
use crate::progress::{NoProgress, ProgressReporter, RuntimeEvent};
use crate::tokenizer::tokenizer_for;

/// Whether the inference engine has been loaded.
pub enum RuntimeState {
    Uninitialized,
    Ready(Box<dyn InferenceEngine>),
}

impl RuntimeState {
    pub fn is_ready(&self) -> bool {
        matches!(self, RuntimeState::Ready(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            RuntimeState::Uninitialized => "uninitialized",
            RuntimeState::Ready(_) => "ready",
        }
    }
}

/// Answers a fixed set of named questions about any passage.
pub struct BidafRuntime {
    preprocessor: Preprocessor,
    queries: QueryCache,
    store: ModelStore,
    loader: Box<dyn EngineLoader>,
    reporter: Box<dyn ProgressReporter>,
    state: RuntimeState,
}

impl BidafRuntime {
    /// Preprocess every target question and prepare (but not load) the model.
    ///
    /// # Errors
    ///
    /// Fails with [`QaError::MissingQuery`] if a target has no question text,
    /// or if the configured tokenizer is unknown.
    pub fn new(
        targets: &[String],
        queries: &HashMap<String, String>,
        settings: &RuntimeSettings,
    ) -> Result<Self> {
        let tokenizer = tokenizer_for(&settings.preprocess.tokenizer)?;
        let preprocessor = Preprocessor::new(tokenizer, settings.preprocess.char_width);
        let queries = QueryCache::build(&preprocessor, targets, queries)?;

        Ok(Self {
            preprocessor,
            queries,
            store: ModelStore::new(&settings.model),
            loader: default_loader(),
            reporter: Box::new(NoProgress),
            state: RuntimeState::Uninitialized,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.targets, &config.queries, &config.settings())
    }

    pub fn with_fetcher(mut self, fetcher: Box<dyn ArtifactFetcher>) -> Self {
        self.store = self.store.with_fetcher(fetcher);
        self
    }

    pub fn with_loader(mut self, loader: Box<dyn EngineLoader>) -> Self {
        self.loader = loader;
        self
    }

    pub fn with_reporter(mut self, reporter: Box<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Skip setup and serve with an already-built engine.
    pub fn with_engine(mut self, engine: Box<dyn InferenceEngine>) -> Self {
        self.state = RuntimeState::Ready(engine);
        self
    }

    pub fn state(&self) -> &RuntimeState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state.is_ready()
    }

    /// Target labels in construction order.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.queries.labels()
    }

    /// Cached tensors for one target question.
    pub fn query(&self, label: &str) -> Result<&EncodedText, QaError> {
        self.queries.get(label)
    }

    /// Ensure the model is on disk and the engine is loaded.
    ///
    /// No-op once Ready. Failures are reported as [`QaError::Setup`] and
    /// leave the runtime Uninitialized.
    pub fn setup(&mut self) -> Result<()> {
        if self.state.is_ready() {
            return Ok(());
        }

        let path = self
            .store
            .ensure(self.reporter.as_ref())
            .map_err(|e| QaError::Setup(format!("{:#}", e)))?;
        let engine = self
            .loader
            .load(&path)
            .map_err(|e| QaError::Setup(format!("{:#}", e)))?;
        self.reporter.report(RuntimeEvent::ModelLoaded {
            path: path.display().to_string(),
        });

        self.state = RuntimeState::Ready(engine);
        Ok(())
    }

    /// Answer every target question about `context`.
    ///
    /// Runs [`setup`](Self::setup) first. Any failure, for any target,
    /// aborts the call without a partial result.
    pub fn serve(&mut self, context: &str) -> Result<Answers> {
        self.setup()?;
        let RuntimeState::Ready(engine) = &self.state else {
            return Err(QaError::Setup("engine not loaded".to_string()).into());
        };

        let reporter = self.reporter.as_ref();
        let answers = answer_all_observed(
            engine.as_ref(),
            &self.preprocessor,
            &self.queries,
            context,
            |label, span| {
                reporter.report(RuntimeEvent::Answered {
                    label: label.to_string(),
                    start: span.start(),
                    end: span.end(),
                })
            },
        )?;
        Ok(answers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use passage_qa_core::engine::FixedSpanEngine;

    fn settings() -> RuntimeSettings {
        RuntimeSettings::default()
    }

    fn capital() -> (Vec<String>, HashMap<String, String>) {
        (
            vec!["capital".to_string()],
            HashMap::from([(
                "capital".to_string(),
                "What is the capital of France?".to_string(),
            )]),
        )
    }

    #[test]
    fn test_new_runtime_is_uninitialized() {
        let (targets, queries) = capital();
        let runtime = BidafRuntime::new(&targets, &queries, &settings()).unwrap();
        assert!(!runtime.is_ready());
        assert_eq!(runtime.state().name(), "uninitialized");
        assert_eq!(runtime.targets().collect::<Vec<_>>(), vec!["capital"]);
    }

    #[test]
    fn test_missing_query_fails_construction() {
        let targets = vec!["capital".to_string(), "river".to_string()];
        let (_, queries) = capital();
        let err = BidafRuntime::new(&targets, &queries, &settings())
            .err()
            .unwrap();
        assert_eq!(
            err.downcast_ref::<QaError>(),
            Some(&QaError::MissingQuery("river".to_string()))
        );
    }

    #[test]
    fn test_query_tensors_cached_at_construction() {
        let (targets, queries) = capital();
        let runtime = BidafRuntime::new(&targets, &queries, &settings()).unwrap();
        let q = runtime.query("capital").unwrap();
        assert_eq!(q.words.get(3), Some("capital"));
        assert_eq!(q.chars.shape(), [7, 1, 1, 16]);
        assert!(runtime.query("river").is_err());
    }

    #[test]
    fn test_serve_with_injected_engine() {
        let (targets, queries) = capital();
        let mut runtime = BidafRuntime::new(&targets, &queries, &settings())
            .unwrap()
            .with_engine(Box::new(FixedSpanEngine::new(0, 0)));
        assert!(runtime.is_ready());
        let answers = runtime.serve("Paris is the capital of France.").unwrap();
        assert_eq!(answers.get("capital"), Some("paris"));
    }

    #[test]
    fn test_bounds_error_surfaces_from_serve() {
        let (targets, queries) = capital();
        let mut runtime = BidafRuntime::new(&targets, &queries, &settings())
            .unwrap()
            .with_engine(Box::new(FixedSpanEngine::new(3, 99)));
        let err = runtime.serve("Paris is lovely.").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<QaError>(),
            Some(QaError::Bounds { len: 4, .. })
        ));
    }
}
