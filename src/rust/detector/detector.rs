use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info};

use super::builder::DetectorBuilder;
use super::error::DetectorError;
use super::features::AppFeatures;
use super::model::ProbabilityModel;
use super::verdict::ClassificationResult;

/// Fraud detector: runs the pre-trained model and applies the verdict thresholds.
///
/// A detector is built once per process and shared read-only. It is `Send + Sync`,
/// so an `Arc<Detector>` can be handed to every submission without locking.
///
/// ```
/// # use fraudgate::{Detector, DetectorError, ProbabilityModel, AppFeatures, Verdict};
/// # #[derive(Debug)]
/// # struct Always(f32);
/// # impl ProbabilityModel for Always {
/// #     fn predict_probability(&self, _: &[f32; 5]) -> Result<f32, DetectorError> { Ok(self.0) }
/// # }
/// # fn main() -> Result<(), DetectorError> {
/// let detector = Detector::builder().with_model(Always(0.55))?.build()?;
/// let result = detector.predict(&AppFeatures::default())?;
/// assert_eq!(result.verdict, Verdict::Suspected);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Detector {
    model: Arc<dyn ProbabilityModel>,
    model_path: Option<PathBuf>,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<Detector>();
    }
};

impl Detector {
    pub fn builder() -> DetectorBuilder {
        DetectorBuilder::new()
    }

    pub(crate) fn new(model: Arc<dyn ProbabilityModel>, model_path: Option<PathBuf>) -> Self {
        Self { model, model_path }
    }

    /// Path of the ONNX artifact, when the detector was loaded from one.
    pub fn model_path(&self) -> Option<&Path> {
        self.model_path.as_deref()
    }

    /// Scores one app.
    ///
    /// # Errors
    /// * `InferenceError` if the model fails or returns something that is not
    ///   a probability in `[0, 1]`
    pub fn predict(&self, features: &AppFeatures) -> Result<ClassificationResult, DetectorError> {
        let input = features.to_input();
        debug!("Model input: {:?}", input);

        let probability = self.model.predict_probability(&input)?;
        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(DetectorError::InferenceError(format!(
                "Model returned {} which is not a probability",
                probability
            )));
        }

        // Widening 0.4f32 directly gives 0.4000000059604645, which lands inside the
        // suspect band; go through the shortest decimal form instead.
        let probability = probability.to_string().parse::<f64>().map_err(|e| {
            DetectorError::InferenceError(format!("Unreadable probability {}: {}", probability, e))
        })?;
        let result = ClassificationResult::from_probability(probability);
        info!("Fraud probability {:.4} -> preliminary verdict '{}'", result.probability, result.verdict);
        Ok(result)
    }
}
