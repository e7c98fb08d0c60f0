//! Inference engine loading.
//!
//! The [`EngineLoader`] turns a model file into a ready
//! [`InferenceEngine`]. The default loader depends on the build:
//! - **`onnx-tract`** (default) — [`TractLoader`], pure-Rust ONNX execution.
//! - no engine feature — loading fails with a descriptive error.
//!
//! # Tensor contract
//!
//! | Name | Direction | Shape | Type |
//! |------|-----------|-------|------|
//! | `context_word` | in | `(N₁, 1)` | string |
//! | `context_char` | in | `(N₁, 1, 1, 16)` | string |
//! | `query_word` | in | `(N₂, 1)` | string |
//! | `query_char` | in | `(N₂, 1, 1, 16)` | string |
//! | `start_pos` | out | one element | integer |
//! | `end_pos` | out | one element | integer |

#[cfg(feature = "onnx-tract")]
mod tract;

use anyhow::Result;
use std::path::Path;

use passage_qa_core::engine::InferenceEngine;

#[cfg(feature = "onnx-tract")]
pub use tract::{TractEngine, TractLoader};

/// Input names in the order the pipeline supplies them.
pub const INPUT_NAMES: [&str; 4] = ["context_word", "context_char", "query_word", "query_char"];
pub const START_OUTPUT: &str = "start_pos";
pub const END_OUTPUT: &str = "end_pos";

/// Builds an inference engine from a model file on disk.
pub trait EngineLoader: Send + Sync {
    /// Short identifier (e.g. `"tract"`).
    fn name(&self) -> &str;
    fn load(&self, model_path: &Path) -> Result<Box<dyn InferenceEngine>>;
}

/// Loader used when no engine feature was compiled in.
pub struct UnavailableLoader;

impl EngineLoader for UnavailableLoader {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn load(&self, _model_path: &Path) -> Result<Box<dyn InferenceEngine>> {
        anyhow::bail!("ONNX inference requires building with --features onnx-tract")
    }
}

/// The loader for this build.
pub fn default_loader() -> Box<dyn EngineLoader> {
    #[cfg(feature = "onnx-tract")]
    {
        Box::new(TractLoader)
    }
    #[cfg(not(feature = "onnx-tract"))]
    {
        Box::new(UnavailableLoader)
    }
}
