use std::time::Duration;

use log::{info, warn};
use serde::Serialize;
use serde_json::Value;

use super::error::ExplainError;
use super::response::response_text;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

/// Client for a Gemini-style `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
    timeout: Duration,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiClient {
    /// Creates a client. `endpoint` is the models collection URL (no trailing slash needed).
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ExplainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ExplainError::Transport)?;
        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            timeout,
        })
    }

    pub fn url(&self) -> String {
        format!("{}/{}:generateContent", self.endpoint, self.model)
    }

    /// Sends one prompt at temperature 0 and returns the generated text.
    ///
    /// A success body that is not JSON, or that lacks the text path, yields an
    /// empty string rather than an error; the caller's JSON parse reports it.
    pub async fn generate(&self, prompt: &str) -> Result<String, ExplainError> {
        let body = GenerateRequest {
            contents: [Content { parts: [Part { text: prompt }] }],
            generation_config: GenerationConfig { temperature: 0.0 },
        };

        let url = self.url();
        info!("Requesting explanation from {}", url);
        let resp = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| ExplainError::from_transport(e, self.timeout))?;

        let status = resp.status();
        info!("Explanation response status: {}", status);
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ExplainError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let raw = resp
            .text()
            .await
            .map_err(|e| ExplainError::from_transport(e, self.timeout))?;
        let document: Value = serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Response body is not JSON ({}); treating it as empty", e);
            Value::Null
        });

        Ok(response_text(&document))
    }
}
