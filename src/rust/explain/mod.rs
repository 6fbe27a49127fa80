//! Cross-verification of the preliminary verdict by a hosted text-generation service.

mod client;
mod error;
mod prompt;
mod response;

pub use client::{GeminiClient, DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_TIMEOUT};
pub use error::ExplainError;
pub use prompt::{build_prompt, REASON_SOFT_LIMIT};
pub use response::{parse_explanation, response_text, strip_fence, ExplanationResult, RESPONSE_TEXT_POINTER};
pub(crate) use response::note_disagreement;
