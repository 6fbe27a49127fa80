//! App fraud screening: a pre-trained ONNX classifier produces a fraud
//! probability, fixed thresholds turn it into a preliminary verdict, and a
//! hosted text-generation service cross-checks the verdict and explains it.
//!
//! # Basic Usage
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use std::time::Duration;
//! use fraudgate::{AppFeatures, Assessor, Detector, GeminiClient, DEFAULT_ENDPOINT, DEFAULT_MODEL};
//!
//! let detector = Detector::builder()
//!     .with_model_path("models/fraud-ann/model.onnx")?
//!     .build()?;
//! let client = GeminiClient::new(DEFAULT_ENDPOINT, DEFAULT_MODEL, "api-key", Duration::from_secs(20))?;
//! let assessor = Assessor::new(Arc::new(detector), client);
//!
//! let features = AppFeatures::new(3.0, 1000, 5000, 6000, true);
//! let assessment = assessor.assess("Free Robux Generator", features).await?;
//! println!("{} -> {}", assessment.classification.verdict, assessment.explanation.reason);
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! [`Detector`] is `Send + Sync` and is meant to be created once and shared
//! through `Arc`; it is never mutated after [`DetectorBuilder::build`].

pub mod config;
pub mod detector;
pub mod explain;
pub mod form;
pub mod model_manager;
pub mod pipeline;
mod runtime;

pub use config::{Args, ConfigError, ModelSource, Settings};
pub use detector::{
    AppFeatures, AppName, ClassificationResult, Detector, DetectorBuilder, DetectorError, OnnxModel,
    ProbabilityModel, ValidationError, Verdict, APP_NAME_PLACEHOLDER,
};
pub use explain::{
    build_prompt, parse_explanation, response_text, strip_fence, ExplainError, ExplanationResult, GeminiClient,
    DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TIMEOUT,
};
pub use model_manager::{ArtifactSpec, ModelError, ModelManager};
pub use pipeline::{AssessError, Assessment, Assessor};
pub use runtime::RuntimeConfig;

pub fn init_logger() {
    env_logger::init();
}
