use std::fmt;

/// Errors raised while loading the fraud model or running inference.
#[derive(Debug)]
pub enum DetectorError {
    /// The ONNX Runtime environment or session could not be set up
    Runtime(String),
    /// The model artifact is missing or has an unexpected structure
    ModelError(String),
    /// Error occurred during the build phase
    BuildError(String),
    /// The model ran but its output could not be turned into a probability
    InferenceError(String),
}

impl fmt::Display for DetectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Runtime(msg) => write!(f, "Runtime error: {}", msg),
            Self::ModelError(msg) => write!(f, "Model error: {}", msg),
            Self::BuildError(msg) => write!(f, "Build error: {}", msg),
            Self::InferenceError(msg) => write!(f, "Inference error: {}", msg),
        }
    }
}

impl std::error::Error for DetectorError {}

impl From<ort::Error> for DetectorError {
    fn from(err: ort::Error) -> Self {
        DetectorError::Runtime(err.to_string())
    }
}
