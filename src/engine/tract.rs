//! Tract-based BiDAF inference.
//!
//! Pure-Rust path: loads the ONNX graph with tract-onnx once, then for each
//! new input shape pins the four string inputs, optimizes and keeps the
//! runnable plan. No ONNX Runtime or system deps.

use anyhow::{bail, Result};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};
use tract_onnx::prelude::*;

use passage_qa_core::engine::InferenceEngine;
use passage_qa_core::models::{CharTensor, EncodedText, WordTensor};
use passage_qa_core::QaError;

use super::{EngineLoader, END_OUTPUT, INPUT_NAMES, START_OUTPUT};

/// Loads [`TractEngine`]s.
pub struct TractLoader;

impl EngineLoader for TractLoader {
    fn name(&self) -> &str {
        "tract"
    }

    fn load(&self, model_path: &Path) -> Result<Box<dyn InferenceEngine>> {
        Ok(Box::new(TractEngine::load(model_path)?))
    }
}

/// Optimized plans kept before the cache is cleared.
const PLAN_CACHE_LIMIT: usize = 64;

type Plan = Arc<TypedRunnableModel<TypedModel>>;

/// `(context words, query words, char width)`.
type PlanKey = (usize, usize, usize);

/// BiDAF graph held in tract's inference form.
///
/// Sequence lengths differ per call, so the graph is kept unpinned and
/// specialized to the actual shapes on first use. Plans are cached by
/// shape: one `serve` optimizes at most once per distinct query length.
pub struct TractEngine {
    model: InferenceModel,
    /// `positions[i]` is the graph input index for `INPUT_NAMES[i]`.
    positions: [usize; 4],
    plans: RwLock<HashMap<PlanKey, Plan>>,
}

impl TractEngine {
    pub fn load(model_path: &Path) -> Result<Self> {
        let model = tract_onnx::onnx()
            .model_for_path(model_path)
            .map_err(|e| anyhow::anyhow!("Load ONNX {}: {}", model_path.display(), e))?;
        Self::from_model(model)
    }

    /// Wrap an already-parsed graph, selecting its outputs and binding inputs by name.
    pub fn from_model(mut model: InferenceModel) -> Result<Self> {
        model
            .set_output_names([START_OUTPUT, END_OUTPUT])
            .map_err(|e| anyhow::anyhow!("Select outputs: {}", e))?;
        let positions = input_positions(&model)?;
        Ok(Self {
            model,
            positions,
            plans: RwLock::new(HashMap::new()),
        })
    }

    fn run(&self, context: &EncodedText, query: &EncodedText) -> Result<(i64, i64)> {
        let tensors = [
            word_tensor(&context.words)?,
            char_tensor(&context.chars)?,
            word_tensor(&query.words)?,
            char_tensor(&query.chars)?,
        ];
        let key = (context.words.len(), query.words.len(), context.chars.width());
        let plan = self.plan_for(key, &tensors)?;

        let mut ordered: Vec<Option<Tensor>> = vec![None; INPUT_NAMES.len()];
        for (slot, tensor) in tensors.into_iter().enumerate() {
            ordered[self.positions[slot]] = Some(tensor);
        }
        let inputs = ordered
            .into_iter()
            .map(|t| {
                t.map(TValue::from)
                    .ok_or_else(|| anyhow::anyhow!("Missing input tensor"))
            })
            .collect::<Result<TVec<TValue>>>()?;
        let outputs = plan.run(inputs)?;

        if outputs.len() != 2 {
            bail!("Expected 2 output tensors, got {}", outputs.len());
        }
        let start = scalar_position(&outputs[0], START_OUTPUT)?;
        let end = scalar_position(&outputs[1], END_OUTPUT)?;
        Ok((start, end))
    }

    /// Cached plan for these input shapes, optimizing the graph on a miss.
    fn plan_for(&self, key: PlanKey, tensors: &[Tensor; 4]) -> Result<Plan> {
        if let Some(plan) = self
            .plans
            .read()
            .map_err(|_| anyhow::anyhow!("Plan cache poisoned"))?
            .get(&key)
        {
            return Ok(plan.clone());
        }

        let mut model = self.model.clone();
        for (slot, tensor) in tensors.iter().enumerate() {
            let shape: TVec<usize> = tensor.shape().iter().copied().collect();
            model = model
                .with_input_fact(
                    self.positions[slot],
                    InferenceFact::dt_shape(String::datum_type(), shape),
                )
                .map_err(|e| anyhow::anyhow!("Input {} shape: {}", INPUT_NAMES[slot], e))?;
        }
        let plan = Arc::new(
            model
                .into_optimized()
                .map_err(|e| anyhow::anyhow!("Optimize: {}", e))?
                .into_runnable()
                .map_err(|e| anyhow::anyhow!("Build tract runnable: {}", e))?,
        );

        let mut plans = self
            .plans
            .write()
            .map_err(|_| anyhow::anyhow!("Plan cache poisoned"))?;
        if plans.len() >= PLAN_CACHE_LIMIT {
            plans.clear();
        }
        plans.insert(key, plan.clone());
        Ok(plan)
    }
}

impl InferenceEngine for TractEngine {
    fn predict(
        &self,
        context: &EncodedText,
        query: &EncodedText,
    ) -> Result<(i64, i64), QaError> {
        self.run(context, query)
            .map_err(|e| QaError::Inference(format!("{:#}", e)))
    }
}

/// Map each expected input name to its position among the graph inputs.
fn input_positions(model: &InferenceModel) -> Result<[usize; 4]> {
    let outlets = model
        .input_outlets()
        .map_err(|e| anyhow::anyhow!("Read model inputs: {}", e))?;
    let names: Vec<&str> = outlets
        .iter()
        .map(|o| model.node(o.node).name.as_str())
        .collect();
    if names.len() != INPUT_NAMES.len() {
        bail!(
            "Expected {} model inputs ({}), found {:?}",
            INPUT_NAMES.len(),
            INPUT_NAMES.join(", "),
            names
        );
    }

    let mut positions = [0usize; 4];
    for (slot, wanted) in INPUT_NAMES.iter().enumerate() {
        positions[slot] = names
            .iter()
            .position(|n| n == wanted)
            .ok_or_else(|| anyhow::anyhow!("Model has no input named '{}'", wanted))?;
    }
    Ok(positions)
}

fn word_tensor(words: &WordTensor) -> Result<Tensor> {
    let array = ndarray::Array2::from_shape_vec((words.len(), 1), words.words().to_vec())
        .map_err(|e| anyhow::anyhow!("Word tensor shape: {}", e))?;
    Ok(array.into())
}

fn char_tensor(chars: &CharTensor) -> Result<Tensor> {
    let array = ndarray::Array4::from_shape_vec(
        (chars.len(), 1, 1, chars.width()),
        chars.cells().to_vec(),
    )
    .map_err(|e| anyhow::anyhow!("Char tensor shape: {}", e))?;
    Ok(array.into())
}

/// Read a position output that must hold exactly one integer.
///
/// Float outputs are rejected rather than truncated.
fn scalar_position(value: &Tensor, name: &str) -> Result<i64> {
    if !value.datum_type().is_integer() {
        bail!(
            "Output '{}' is not an integer: {:?}",
            name,
            value.datum_type()
        );
    }
    let cast = value
        .cast_to::<i64>()
        .map_err(|e| anyhow::anyhow!("Output '{}' is not an integer: {}", name, e))?;
    let values = cast
        .as_slice::<i64>()
        .map_err(|e| anyhow::anyhow!("Output '{}': {}", name, e))?;
    match values {
        [v] => Ok(*v),
        _ => bail!(
            "Output '{}' is not a scalar: shape {:?}",
            name,
            value.shape()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use passage_qa_core::preprocess::encode_tokens;

    fn encoded(tokens: &[&str]) -> EncodedText {
        encode_tokens(tokens.iter().map(|t| t.to_string()).collect(), 16)
    }

    #[test]
    fn test_word_tensor_layout() {
        let t = word_tensor(&encoded(&["Paris", "is"]).words).unwrap();
        assert_eq!(t.shape(), &[2, 1]);
        assert_eq!(t.datum_type(), String::datum_type());
        assert_eq!(t.as_slice::<String>().unwrap(), &["paris", "is"]);
    }

    #[test]
    fn test_char_tensor_layout() {
        let t = char_tensor(&encoded(&["Paris", "is"]).chars).unwrap();
        assert_eq!(t.shape(), &[2, 1, 1, 16]);
        let cells = t.as_slice::<String>().unwrap();
        assert_eq!(&cells[..5], &["P", "a", "r", "i", "s"]);
        assert_eq!(cells[5], "");
        assert_eq!(&cells[16..18], &["i", "s"]);
    }

    #[test]
    fn test_scalar_position_accepts_single_int() {
        let t = tensor1(&[7i32]);
        assert_eq!(scalar_position(&t, START_OUTPUT).unwrap(), 7);
        assert_eq!(scalar_position(&tensor0(3i64), END_OUTPUT).unwrap(), 3);
    }

    #[test]
    fn test_scalar_position_rejects_vectors() {
        let t = tensor1(&[1i32, 2]);
        let err = scalar_position(&t, START_OUTPUT).unwrap_err();
        assert!(err.to_string().contains("not a scalar"));
    }

    #[test]
    fn test_scalar_position_rejects_floats() {
        let err = scalar_position(&tensor0(2.7f32), START_OUTPUT).unwrap_err();
        assert!(err.to_string().contains("not an integer"));
        assert!(scalar_position(&tensor1(&[3.0f64]), END_OUTPUT).is_err());
    }

    #[test]
    fn test_scalar_position_rejects_strings() {
        let t = tensor0("2".to_string());
        assert!(scalar_position(&t, START_OUTPUT).is_err());
    }

    fn graph_with_inputs(names: &[&str]) -> InferenceModel {
        let mut model = InferenceModel::default();
        for name in names {
            model.add_source(*name, InferenceFact::default()).unwrap();
        }
        model
    }

    #[test]
    fn test_input_positions_follow_graph_order() {
        let model = graph_with_inputs(&["query_char", "context_word", "query_word", "context_char"]);
        // INPUT_NAMES: context_word, context_char, query_word, query_char
        assert_eq!(input_positions(&model).unwrap(), [1, 3, 2, 0]);
    }

    #[test]
    fn test_input_positions_identity_when_ordered() {
        let model = graph_with_inputs(&INPUT_NAMES);
        assert_eq!(input_positions(&model).unwrap(), [0, 1, 2, 3]);
    }

    #[test]
    fn test_input_positions_missing_name() {
        let model = graph_with_inputs(&["context_word", "context_char", "query_word", "question"]);
        let err = input_positions(&model).unwrap_err();
        assert!(err.to_string().contains("no input named 'query_char'"));
    }

    #[test]
    fn test_input_positions_wrong_count() {
        let model = graph_with_inputs(&["context_word", "context_char", "query_word"]);
        let err = input_positions(&model).unwrap_err();
        assert!(err.to_string().contains("Expected 4 model inputs"));
    }

    /// Graph with the four BiDAF inputs whose outputs are constants.
    fn constant_graph(start: Tensor, end: Tensor) -> InferenceModel {
        let mut model = graph_with_inputs(&["query_word", "query_char", "context_word", "context_char"]);
        model.add_const(START_OUTPUT, start).unwrap();
        model.add_const(END_OUTPUT, end).unwrap();
        model
    }

    #[test]
    fn test_predict_binds_shuffled_inputs_and_caches_plans() {
        let engine = TractEngine::from_model(constant_graph(tensor0(1i64), tensor0(3i64))).unwrap();
        assert_eq!(engine.positions, [2, 3, 0, 1]);

        let context = encoded(&["Paris", "is", "the", "capital"]);
        let short_query = encoded(&["Capital", "?"]);
        let long_query = encoded(&["What", "is", "the", "capital", "?"]);

        assert_eq!(engine.predict(&context, &short_query).unwrap(), (1, 3));
        assert_eq!(engine.predict(&context, &short_query).unwrap(), (1, 3));
        assert_eq!(engine.plans.read().unwrap().len(), 1);

        assert_eq!(engine.predict(&context, &long_query).unwrap(), (1, 3));
        assert_eq!(engine.plans.read().unwrap().len(), 2);
    }

    #[test]
    fn test_predict_float_output_is_inference_error() {
        let engine =
            TractEngine::from_model(constant_graph(tensor0(2.7f32), tensor0(3i64))).unwrap();
        let err = engine
            .predict(&encoded(&["a", "b", "c"]), &encoded(&["b", "?"]))
            .unwrap_err();
        assert!(matches!(err, QaError::Inference(msg) if msg.contains("not an integer")));
    }

    #[test]
    fn test_missing_model_file_fails_to_load() {
        let err = TractEngine::load(Path::new("/nonexistent/bidaf.onnx"))
            .err()
            .unwrap();
        assert!(err.to_string().contains("Load ONNX"));
    }
}
