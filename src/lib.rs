//! # Passage QA
//!
//! Answers a fixed set of named questions about any passage of text using
//! the pretrained BiDAF (bidirectional attention flow) ONNX model.
//!
//! ## Architecture
//!
//! ```text
//!   questions ──▶ Preprocessor ──▶ QueryCache (once, at construction)
//!                                       │
//!   context ───▶ Preprocessor ──┐       │
//!                               ▼       ▼
//!                          InferenceEngine (tract) ──▶ (start, end)
//!                                                           │
//!                                                           ▼
//!                                         SpanDecoder ──▶ label → answer
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! pqa setup                                    # download model/bidaf.onnx
//! pqa ask --context "Paris is the capital of France."
//! pqa ask --file passage.txt --json
//! pqa inspect "What is the capital of France?"
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`runtime`] | Model lifecycle and serving |
//! | [`artifact`] | Model file location and download |
//! | [`engine`] | ONNX inference engine loading |
//! | [`tokenizer`] | Word tokenizers |
//! | [`progress`] | Progress reporting on stderr |
//!
//! Tensor layout, span decoding and the query cache live in
//! [`passage_qa_core`].

pub mod artifact;
pub mod ask;
pub mod config;
pub mod engine;
pub mod inspect;
pub mod progress;
pub mod runtime;
pub mod setup;
pub mod targets;
pub mod tokenizer;
