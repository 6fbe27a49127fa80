mod error;
mod features;
mod model;
mod verdict;
mod builder;
mod detector;

pub use builder::DetectorBuilder;
pub use detector::Detector;
pub use error::DetectorError;
pub use features::{AppFeatures, AppName, ValidationError, APP_NAME_PLACEHOLDER, MAX_RATING};
pub use model::{OnnxModel, ProbabilityModel, FEATURE_COUNT};
pub use verdict::{
    ClassificationResult, UnknownVerdict, Verdict, FRAUD_CUTOFF, SUSPECT_BAND_HIGH, SUSPECT_BAND_LOW,
};
