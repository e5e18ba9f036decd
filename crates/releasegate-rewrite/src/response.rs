//! Parsing and normalization of model output.

use crate::RewriteError;
use releasegate_types::{Citation, RewriteSuggestion};
use serde::Deserialize;
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimKind {
    Factual,
    Marketing,
    Legal,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Claim {
    pub text: String,
    #[serde(default)]
    pub kind: Option<ClaimKind>,
}

/// Citation as the model reports it. Offsets may be negative or inverted.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawCitation {
    pub sentence_index: i64,
    pub start: i64,
    pub end: i64,
    #[serde(default)]
    pub snippet: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawSuggestion {
    pub citation: RawCitation,
    #[serde(default)]
    pub suggested_text: String,
    #[serde(default)]
    pub rationale: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ModelOutput {
    #[serde(default)]
    pub claims: Vec<Claim>,
    #[serde(default)]
    pub rewrite_suggestions: Vec<RawSuggestion>,
}

/// Collect the model's text from a Responses API payload.
///
/// Prefers the top-level `output_text` convenience field, else joins every
/// `output[].content[]` item of type `output_text`.
pub fn extract_text(response: &Value) -> String {
    if let Some(text) = response.get("output_text").and_then(Value::as_str) {
        return text.to_string();
    }

    let mut parts = Vec::new();
    for item in response
        .get("output")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
    {
        for content in item
            .get("content")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
        {
            if content.get("type").and_then(Value::as_str) == Some("output_text")
                && let Some(text) = content.get("text").and_then(Value::as_str)
            {
                parts.push(text);
            }
        }
    }
    parts.join("")
}

/// The span from the first `{` to the last `}`.
pub fn extract_first_json_object(text: &str) -> Result<&str, RewriteError> {
    let start = text.find('{').ok_or(RewriteError::NoJsonObject)?;
    let end = text.rfind('}').ok_or(RewriteError::NoJsonObject)?;
    if end < start {
        return Err(RewriteError::NoJsonObject);
    }
    Ok(&text[start..=end])
}

pub fn parse_model_output(text: &str) -> Result<ModelOutput, RewriteError> {
    let json = extract_first_json_object(text)?;
    Ok(serde_json::from_str(json)?)
}

fn floor_boundary(text: &str, mut i: usize) -> usize {
    while !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn ceil_boundary(text: &str, mut i: usize) -> usize {
    while !text.is_char_boundary(i) {
        i += 1;
    }
    i
}

/// Clamp offsets into `0 <= start <= end <= text.len()` on char boundaries,
/// trim text, drop empty suggestions.
///
/// A start inside a char moves back to its first byte; an end moves forward
/// past it.
pub fn normalize_suggestions(raw: Vec<RawSuggestion>, text: &str) -> Vec<RewriteSuggestion> {
    let text_len = text.len();
    raw.into_iter()
        .filter_map(|s| {
            let suggested_text = s.suggested_text.trim();
            if suggested_text.is_empty() {
                return None;
            }
            let clamp = |v: i64| (v.max(0) as usize).min(text_len);
            let start = floor_boundary(text, clamp(s.citation.start));
            let end = ceil_boundary(text, clamp(s.citation.end).max(start));
            Some(RewriteSuggestion {
                citation: Citation {
                    sentence_index: s.citation.sentence_index.max(0) as usize,
                    start,
                    end,
                    snippet: s.citation.snippet,
                },
                suggested_text: suggested_text.to_string(),
                rationale: s.rationale.trim().to_string(),
            })
        })
        .collect()
}
