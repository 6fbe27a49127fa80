use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use ndarray::Array2;
use ort::session::Session;
use ort::value::Tensor;
use log::info;

use super::error::DetectorError;
use crate::runtime::{create_session_builder, RuntimeConfig};

/// Number of columns the fraud model consumes.
pub const FEATURE_COUNT: usize = 5;

/// Anything that turns one feature row into a fraud probability.
///
/// The shipped implementation is [`OnnxModel`]; the trait is the seam that lets
/// the detector run over any pre-trained artifact.
pub trait ProbabilityModel: Send + Sync + fmt::Debug {
    fn predict_probability(&self, input: &[f32; FEATURE_COUNT]) -> Result<f32, DetectorError>;
}

/// A binary classifier exported to ONNX.
///
/// The graph is expected to take one `[batch, 5]` f32 input and produce the
/// fraud probability as the first element of its first output (a Keras
/// sigmoid head exports as `[batch, 1]`).
#[derive(Debug)]
pub struct OnnxModel {
    session: Session,
    input_name: String,
}

impl OnnxModel {
    pub fn load(path: &Path, config: &RuntimeConfig) -> Result<Self, DetectorError> {
        if !path.exists() {
            return Err(DetectorError::ModelError(format!(
                "Model file not found: {}",
                path.display()
            )));
        }

        let session = create_session_builder(config)?
            .commit_from_file(path)
            .map_err(|e| DetectorError::ModelError(format!("Failed to load {}: {}", path.display(), e)))?;

        Self::validate_model(&session)?;
        let input_name = session.inputs[0].name.clone();
        info!("Loaded fraud model from {} (input '{}')", path.display(), input_name);

        Ok(Self { session, input_name })
    }

    fn validate_model(session: &Session) -> Result<(), DetectorError> {
        if session.inputs.is_empty() {
            return Err(DetectorError::ModelError(
                "Model must have an input for the feature row".to_string(),
            ));
        }
        if session.outputs.is_empty() {
            return Err(DetectorError::ModelError(
                "Model must have at least 1 output for the probability".to_string(),
            ));
        }
        Ok(())
    }
}

impl ProbabilityModel for OnnxModel {
    fn predict_probability(&self, input: &[f32; FEATURE_COUNT]) -> Result<f32, DetectorError> {
        let row = Array2::from_shape_vec((1, FEATURE_COUNT), input.to_vec())
            .map_err(|e| DetectorError::InferenceError(format!("Failed to create input array: {}", e)))?;

        let mut input_tensors = HashMap::new();
        input_tensors.insert(
            self.input_name.as_str(),
            Tensor::from_array(row)
                .map_err(|e| DetectorError::InferenceError(format!("Failed to create input tensor: {}", e)))?,
        );

        let outputs = self
            .session
            .run(input_tensors)
            .map_err(|e| DetectorError::InferenceError(format!("Failed to run model: {}", e)))?;
        let output_tensor = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| DetectorError::InferenceError(format!("Failed to extract output tensor: {}", e)))?;

        output_tensor
            .iter()
            .next()
            .copied()
            .ok_or_else(|| DetectorError::InferenceError("Model produced an empty output".to_string()))
    }
}
