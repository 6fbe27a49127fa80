//! One submission, start to finish: validate, classify, explain.

use std::sync::Arc;

use log::{error, info};
use serde::Serialize;

use crate::detector::{AppFeatures, AppName, ClassificationResult, Detector, DetectorError, ValidationError};
use crate::explain::{build_prompt, note_disagreement, parse_explanation, ExplainError, ExplanationResult, GeminiClient};

/// Why a submission stopped. Every variant is reported to the user; none ends the process.
#[derive(Debug, thiserror::Error)]
pub enum AssessError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("Prediction is disabled because the fraud model failed to load")]
    PredictionDisabled,
    #[error("Error during prediction: {0}")]
    Inference(#[from] DetectorError),
    #[error(transparent)]
    Explain(#[from] ExplainError),
}

/// Everything produced for one successful submission.
#[derive(Debug, Clone, Serialize)]
pub struct Assessment {
    pub app_name: String,
    pub classification: ClassificationResult,
    /// Text exactly as the service returned it, before fence-stripping.
    pub raw_text: String,
    pub explanation: ExplanationResult,
}

/// Runs submissions against a detector loaded once at startup.
#[derive(Debug, Clone)]
pub struct Assessor {
    detector: Option<Arc<Detector>>,
    client: GeminiClient,
}

impl Assessor {
    pub fn new(detector: Arc<Detector>, client: GeminiClient) -> Self {
        Self {
            detector: Some(detector),
            client,
        }
    }

    /// An assessor whose model could not be loaded. Names are still validated,
    /// but every valid submission reports [`AssessError::PredictionDisabled`].
    pub fn without_detector(client: GeminiClient) -> Self {
        Self { detector: None, client }
    }

    pub fn prediction_enabled(&self) -> bool {
        self.detector.is_some()
    }

    pub async fn assess(&self, app_name: &str, features: AppFeatures) -> Result<Assessment, AssessError> {
        let name = AppName::parse(app_name)?;
        let detector = self.detector.as_ref().ok_or(AssessError::PredictionDisabled)?;

        let classification = detector.predict(&features).map_err(|e| {
            error!("Prediction failed for '{}': {}", name, e);
            AssessError::Inference(e)
        })?;

        let prompt = build_prompt(&name, &features, classification.verdict);
        let raw_text = self.client.generate(&prompt).await.map_err(|e| {
            error!("Explanation request failed: {}", e);
            e
        })?;
        let explanation = parse_explanation(&raw_text)?;
        note_disagreement(classification.verdict, &explanation);

        info!("Assessed '{}' as '{}'", name, explanation.label);
        Ok(Assessment {
            app_name: name.to_string(),
            classification,
            raw_text,
            explanation,
        })
    }
}
