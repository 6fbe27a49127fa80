use std::time::Duration;

/// Failures of the explanation step. None of them is retried.
#[derive(Debug, thiserror::Error)]
pub enum ExplainError {
    #[error("Request to the text-generation service timed out after {0:?}")]
    Timeout(Duration),
    #[error("Request to the text-generation service failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("Text-generation service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Failed to parse explanation as JSON: {source}")]
    Parse {
        raw: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Explanation JSON does not have the expected shape: {source}")]
    Schema {
        raw: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ExplainError {
    /// Raw response text for parse and schema failures, shown for diagnosis.
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            Self::Parse { raw, .. } | Self::Schema { raw, .. } => Some(raw),
            _ => None,
        }
    }

    pub(crate) fn from_transport(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else {
            Self::Transport(err)
        }
    }
}
