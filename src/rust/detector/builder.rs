use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::info;

use super::detector::Detector;
use super::error::DetectorError;
use super::model::{OnnxModel, ProbabilityModel};
use crate::runtime::RuntimeConfig;

/// A builder for constructing a [`Detector`] with a fluent interface.
#[derive(Default, Debug)]
pub struct DetectorBuilder {
    model_path: Option<PathBuf>,
    model: Option<Arc<dyn ProbabilityModel>>,
    runtime_config: RuntimeConfig,
}

impl DetectorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the runtime configuration used when the ONNX artifact is loaded.
    pub fn with_runtime_config(mut self, config: RuntimeConfig) -> Self {
        self.runtime_config = config;
        self
    }

    /// Points the detector at an ONNX model file. The file is loaded by [`build`](Self::build).
    ///
    /// # Errors
    /// * `BuildError` if the path is empty or a model source is already set
    pub fn with_model_path(mut self, path: impl AsRef<Path>) -> Result<Self, DetectorError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(DetectorError::BuildError("Model path cannot be empty".to_string()));
        }
        self.ensure_unset()?;
        self.model_path = Some(path.to_path_buf());
        Ok(self)
    }

    /// Uses an already constructed probability model instead of an ONNX file.
    ///
    /// # Example
    /// ```
    /// use fraudgate::{Detector, DetectorError, ProbabilityModel};
    ///
    /// #[derive(Debug)]
    /// struct Always(f32);
    ///
    /// impl ProbabilityModel for Always {
    ///     fn predict_probability(&self, _: &[f32; 5]) -> Result<f32, DetectorError> {
    ///         Ok(self.0)
    ///     }
    /// }
    ///
    /// # fn main() -> Result<(), DetectorError> {
    /// let detector = Detector::builder().with_model(Always(0.9))?.build()?;
    /// assert_eq!(detector.model_path(), None);
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_model(mut self, model: impl ProbabilityModel + 'static) -> Result<Self, DetectorError> {
        self.ensure_unset()?;
        self.model = Some(Arc::new(model));
        Ok(self)
    }

    fn ensure_unset(&self) -> Result<(), DetectorError> {
        if self.model_path.is_some() || self.model.is_some() {
            return Err(DetectorError::BuildError("Model source already set".to_string()));
        }
        Ok(())
    }

    pub fn build(self) -> Result<Detector, DetectorError> {
        match (self.model, self.model_path) {
            (Some(model), _) => Ok(Detector::new(model, None)),
            (None, Some(path)) => {
                info!("Loading fraud model from {}", path.display());
                let model = OnnxModel::load(&path, &self.runtime_config)?;
                Ok(Detector::new(Arc::new(model), Some(path)))
            }
            (None, None) => Err(DetectorError::BuildError("A model path or model must be set".to_string())),
        }
    }
}
