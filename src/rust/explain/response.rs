use lazy_static::lazy_static;
use log::{info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ExplainError;
use super::prompt::REASON_SOFT_LIMIT;
use crate::detector::Verdict;

/// JSON pointer to the generated text in a `generateContent` response.
pub const RESPONSE_TEXT_POINTER: &str = "/candidates/0/content/parts/0/text";

lazy_static! {
    static ref FENCED_BLOCK: Regex =
        Regex::new(r"(?s)```(?i:json)?\s*(.*?)\s*```").expect("fence pattern is valid");
}

/// The justification returned by the text-generation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplanationResult {
    #[serde(rename = "type")]
    pub label: String,
    pub app_name_analysis: String,
    pub reason: String,
}

impl ExplanationResult {
    /// The returned label, if it is one of the three known verdicts.
    pub fn verdict(&self) -> Option<Verdict> {
        self.label.parse().ok()
    }

    pub fn reason_exceeds_limit(&self) -> bool {
        self.reason.chars().count() > REASON_SOFT_LIMIT
    }
}

/// Pulls `candidates[0].content.parts[0].text` out of a response document.
///
/// Any missing step (or a non-string leaf) yields an empty string.
pub fn response_text(document: &Value) -> String {
    document
        .pointer(RESPONSE_TEXT_POINTER)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Returns the body of the first fenced code block, or the trimmed text when
/// there is no fence. Applying it to its own output is a no-op.
pub fn strip_fence(text: &str) -> &str {
    match FENCED_BLOCK.captures(text).and_then(|caps| caps.get(1)) {
        Some(body) => body.as_str(),
        None => text.trim(),
    }
}

/// Fence-strips `text` and parses it into an [`ExplanationResult`].
///
/// # Errors
/// * `Parse` if the stripped text is not JSON
/// * `Schema` if it is JSON but lacks one of `type`, `app_name_analysis`, `reason`
pub fn parse_explanation(text: &str) -> Result<ExplanationResult, ExplainError> {
    let json = strip_fence(text);
    let value: Value = serde_json::from_str(json).map_err(|source| ExplainError::Parse {
        raw: text.to_string(),
        source,
    })?;
    let explanation: ExplanationResult =
        serde_json::from_value(value).map_err(|source| ExplainError::Schema {
            raw: text.to_string(),
            source,
        })?;

    if explanation.reason_exceeds_limit() {
        warn!(
            "Explanation reason is {} characters (limit {})",
            explanation.reason.chars().count(),
            REASON_SOFT_LIMIT
        );
    }
    if explanation.verdict().is_none() {
        warn!("Explanation carries unknown label '{}'", explanation.label);
    }

    Ok(explanation)
}

/// Logs when the service's label differs from the preliminary one.
pub(crate) fn note_disagreement(preliminary: Verdict, explanation: &ExplanationResult) {
    if let Some(returned) = explanation.verdict() {
        if returned != preliminary {
            info!("Service relabelled '{}' as '{}'", preliminary, returned);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_text_happy_path() {
        let doc = json!({
            "candidates": [{ "content": { "parts": [{ "text": "hello" }], "role": "model" } }]
        });
        assert_eq!(response_text(&doc), "hello");
    }

    #[test]
    fn test_response_text_missing_paths() {
        let docs = [
            json!({}),
            json!(null),
            json!({ "candidates": [] }),
            json!({ "candidates": [{}] }),
            json!({ "candidates": [{ "content": {} }] }),
            json!({ "candidates": [{ "content": { "parts": [] } }] }),
            json!({ "candidates": [{ "content": { "parts": [{ "text": 7 }] } }] }),
        ];
        for doc in &docs {
            assert_eq!(response_text(doc), "", "{}", doc);
        }
    }

    #[test]
    fn test_strip_fence_variants() {
        assert_eq!(strip_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_fence("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_fence("Here you go:\n```json\n{\"a\":1}\n```\nThanks"), "{\"a\":1}");
        assert_eq!(strip_fence("  {\"a\":1}\n"), "{\"a\":1}");
        assert_eq!(strip_fence("```JSON\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_fence("```Json\n{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn test_strip_fence_is_idempotent() {
        for text in ["{\"a\":1}", "```json\n{\"a\":1}\n```", "  plain  ", ""] {
            let once = strip_fence(text);
            assert_eq!(strip_fence(once), once);
        }
        assert_eq!(strip_fence("{\"a\":1}"), "{\"a\":1}");
    }

    #[test]
    fn test_fenced_and_bare_parse_identically() {
        let bare = r#"{"type":"fraud","app_name_analysis":"Mimics a bank","reason":"Low rating, huge installs"}"#;
        let fenced = format!("```json\n{}\n```", bare);
        assert_eq!(parse_explanation(bare).unwrap(), parse_explanation(&fenced).unwrap());
    }

    #[test]
    fn test_fenced_fraud_scenario() {
        let text = "```json\n{\"type\":\"fraud\",\"app_name_analysis\":\"x\",\"reason\":\"y\"}\n```";
        let explanation = parse_explanation(text).unwrap();
        assert_eq!(explanation.label, "fraud");
        assert_eq!(explanation.verdict(), Some(Verdict::Fraud));
    }

    #[test]
    fn test_malformed_json_keeps_raw_text() {
        let err = parse_explanation("```json\n{\"type\": fraud}\n```").unwrap_err();
        assert!(matches!(err, ExplainError::Parse { .. }));
        assert_eq!(err.raw_text(), Some("```json\n{\"type\": fraud}\n```"));

        assert!(matches!(parse_explanation(""), Err(ExplainError::Parse { .. })));
    }

    #[test]
    fn test_missing_key_is_schema_error() {
        let err = parse_explanation(r#"{"type":"genuine","reason":"fine"}"#).unwrap_err();
        assert!(matches!(err, ExplainError::Schema { .. }));
        assert!(err.raw_text().is_some());
    }

    #[test]
    fn test_long_reason_is_accepted() {
        let text = json!({
            "type": "suspected",
            "app_name_analysis": "generic",
            "reason": "r".repeat(450),
        })
        .to_string();
        let explanation = parse_explanation(&text).unwrap();
        assert!(explanation.reason_exceeds_limit());
    }

    #[test]
    fn test_serializes_with_type_key() {
        let explanation = ExplanationResult {
            label: "genuine".into(),
            app_name_analysis: "ordinary".into(),
            reason: "healthy metrics".into(),
        };
        let value = serde_json::to_value(&explanation).unwrap();
        assert_eq!(value["type"], "genuine");
        assert!(value.get("label").is_none());
    }
}
