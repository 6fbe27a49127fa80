use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::detector::{AppFeatures, MAX_RATING};
use crate::explain::{DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TIMEOUT};
use crate::model_manager::ArtifactSpec;

pub const API_KEY_ENV: &str = "FRAUDGATE_API_KEY";
pub const MODEL_PATH_ENV: &str = "FRAUDGATE_MODEL";
pub const DEFAULT_MODEL_NAME: &str = "fraud-ann";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No API key for the text-generation service; set {} or pass --api-key", API_KEY_ENV)]
    MissingApiKey,
    #[error("--model-url and --model-sha256 must be given together")]
    IncompleteArtifact,
    #[error("--timeout-secs must be greater than zero")]
    ZeroTimeout,
}

/// Screen a mobile app for fraud: ONNX classifier plus an LLM cross-check.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// ONNX model file; defaults to the cached `fraud-ann` artifact
    #[arg(long, env = MODEL_PATH_ENV)]
    pub model_path: Option<PathBuf>,

    /// Download URL for the model artifact (requires --model-sha256)
    #[arg(long)]
    pub model_url: Option<String>,

    /// Expected SHA-256 of the downloaded artifact
    #[arg(long)]
    pub model_sha256: Option<String>,

    /// Force a fresh download of the model artifact
    #[arg(short, long)]
    pub fresh: bool,

    /// API key for the text-generation service
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Models collection URL of the text-generation service
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub llm_endpoint: String,

    /// Model name used for the explanation
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub llm_model: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout_secs: u64,

    /// Print the raw service text before the parsed result
    #[arg(long)]
    pub show_raw: bool,

    /// App name; when given, the form is skipped and one assessment is run
    #[arg(long)]
    pub app_name: Option<String>,

    #[arg(long, default_value_t = 3.0, value_parser = parse_rating)]
    pub rating: f64,

    #[arg(long, default_value_t = 1000)]
    pub rating_count: u64,

    #[arg(long, default_value_t = 5000)]
    pub installs: u64,

    #[arg(long, default_value_t = 6000)]
    pub max_installs: u64,

    /// 1 = Yes, 0 = No
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..=1))]
    pub editor_choice: u8,
}

fn parse_rating(raw: &str) -> Result<f64, String> {
    let value: f64 = raw.trim().parse().map_err(|_| format!("`{}` is not a number", raw))?;
    if !(0.0..=MAX_RATING).contains(&value) {
        return Err(format!("rating must be between 0.0 and {:.1}", MAX_RATING));
    }
    Ok(value)
}

/// Where the detector should get its model from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// An explicit file, used as is.
    File(PathBuf),
    /// A cached artifact, downloaded and verified when missing.
    Artifact(ArtifactSpec),
    /// A cached artifact that must already be present.
    Cached(String),
}

/// Resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub model: ModelSource,
    pub fresh: bool,
    pub api_key: String,
    pub llm_endpoint: String,
    pub llm_model: String,
    pub timeout: Duration,
    pub show_raw: bool,
}

impl Settings {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let api_key = args
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?
            .to_string();

        if args.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        let model = match (&args.model_path, &args.model_url, &args.model_sha256) {
            (Some(path), _, _) => ModelSource::File(path.clone()),
            (None, Some(url), Some(sha)) => {
                ModelSource::Artifact(ArtifactSpec::new(DEFAULT_MODEL_NAME, url.clone(), sha.clone()))
            }
            (None, None, None) => ModelSource::Cached(DEFAULT_MODEL_NAME.to_string()),
            _ => return Err(ConfigError::IncompleteArtifact),
        };

        Ok(Self {
            model,
            fresh: args.fresh,
            api_key,
            llm_endpoint: args.llm_endpoint.clone(),
            llm_model: args.llm_model.clone(),
            timeout: Duration::from_secs(args.timeout_secs),
            show_raw: args.show_raw,
        })
    }
}

impl Args {
    /// Features given on the command line (or their form defaults).
    pub fn features(&self) -> AppFeatures {
        AppFeatures::new(
            self.rating,
            self.rating_count,
            self.installs,
            self.max_installs,
            self.editor_choice == 1,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["fraudgate", "--api-key", "k"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        let settings = Settings::from_args(&args).unwrap();
        assert_eq!(settings.timeout, Duration::from_secs(20));
        assert_eq!(settings.llm_endpoint, DEFAULT_ENDPOINT);
        assert_eq!(settings.model, ModelSource::Cached(DEFAULT_MODEL_NAME.to_string()));
        assert_eq!(args.features(), AppFeatures::default());
    }

    #[test]
    fn test_missing_api_key() {
        let mut args = parse(&[]);
        args.api_key = Some("   ".to_string());
        assert!(matches!(Settings::from_args(&args), Err(ConfigError::MissingApiKey)));
        args.api_key = None;
        assert!(matches!(Settings::from_args(&args), Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn test_model_sources() {
        let args = parse(&["--model-path", "/srv/model.onnx", "--model-url", "http://x"]);
        assert_eq!(
            Settings::from_args(&args).unwrap().model,
            ModelSource::File(PathBuf::from("/srv/model.onnx"))
        );

        let args = parse(&["--model-url", "http://x/m.onnx", "--model-sha256", "ABCD"]);
        match Settings::from_args(&args).unwrap().model {
            ModelSource::Artifact(spec) => assert_eq!(spec.sha256, "abcd"),
            other => panic!("unexpected source {:?}", other),
        }

        let args = parse(&["--model-url", "http://x/m.onnx"]);
        assert!(matches!(Settings::from_args(&args), Err(ConfigError::IncompleteArtifact)));
    }

    #[test]
    fn test_field_flags_are_bounded() {
        assert!(Args::try_parse_from(["fraudgate", "--rating", "5.1"]).is_err());
        assert!(Args::try_parse_from(["fraudgate", "--installs", "-3"]).is_err());
        assert!(Args::try_parse_from(["fraudgate", "--editor-choice", "2"]).is_err());

        let args = parse(&["--rating", "4.2", "--editor-choice", "0", "--installs", "9"]);
        let features = args.features();
        assert_eq!(features.rating(), 4.2);
        assert!(!features.editor_choice());
        assert_eq!(features.installs(), 9);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let args = parse(&["--timeout-secs", "0"]);
        assert!(matches!(Settings::from_args(&args), Err(ConfigError::ZeroTimeout)));
    }
}
