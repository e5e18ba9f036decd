use crate::response::{extract_text, normalize_suggestions, parse_model_output};
use crate::{RewriteError, RewriteRequest, RewriteSuggester};
use releasegate_types::RewriteSuggestion;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

const INSTRUCTIONS: &str = "You review outbound financial marketing copy for compliance. \
Given a draft, the policy violations found in it and the disclosures it requires, \
extract the claims the draft makes and propose minimal rewrites for the cited text. \
Cite offsets into the original draft. Respond with a single JSON object only.";

#[derive(Clone, Debug)]
pub struct HttpSuggesterConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
    pub timeout: Duration,
}

/// Suggestion client for a Responses-style HTTP endpoint.
#[derive(Debug)]
pub struct HttpSuggester {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl HttpSuggester {
    pub fn new(config: HttpSuggesterConfig) -> Result<Self, RewriteError> {
        if config.api_key.trim().is_empty() {
            return Err(RewriteError::NotConfigured("empty API key".to_string()));
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint,
            model: config.model,
            api_key: config.api_key,
        })
    }

    /// The JSON body sent to the endpoint.
    pub fn request_body(&self, request: &RewriteRequest<'_>) -> Value {
        let input = json!({
            "draft": request.text,
            "violations": request.violations,
            "requiredDisclosures": request.required_disclosures,
        });
        json!({
            "model": self.model,
            "input": [
                {"role": "system", "content": INSTRUCTIONS},
                {"role": "user", "content": input.to_string()},
            ],
            "text": {
                "format": {
                    "type": "json_schema",
                    "name": "rewrite_suggestions",
                    "strict": true,
                    "schema": output_schema(),
                }
            }
        })
    }
}

impl RewriteSuggester for HttpSuggester {
    fn suggest(&self, request: &RewriteRequest<'_>) -> Result<Vec<RewriteSuggestion>, RewriteError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(request))
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(RewriteError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = resp.json()?;
        let text = extract_text(&payload);
        let output = parse_model_output(&text)?;
        debug!(
            claims = output.claims.len(),
            suggestions = output.rewrite_suggestions.len(),
            "model output parsed"
        );
        Ok(normalize_suggestions(output.rewrite_suggestions, request.text))
    }
}

/// Strict JSON schema for the model's reply.
fn output_schema() -> Value {
    let citation = json!({
        "type": "object",
        "additionalProperties": false,
        "required": ["sentenceIndex", "start", "end", "snippet"],
        "properties": {
            "sentenceIndex": {"type": "integer"},
            "start": {"type": "integer"},
            "end": {"type": "integer"},
            "snippet": {"type": "string"}
        }
    });
    json!({
        "type": "object",
        "additionalProperties": false,
        "required": ["claims", "rewriteSuggestions"],
        "properties": {
            "claims": {
                "type": "array",
                "items": {
                    "type": "object",
                    "additionalProperties": false,
                    "required": ["text", "kind"],
                    "properties": {
                        "text": {"type": "string"},
                        "kind": {"type": "string", "enum": ["factual", "marketing", "legal"]}
                    }
                }
            },
            "rewriteSuggestions": {
                "type": "array",
                "items": {
                    "type": "object",
                    "additionalProperties": false,
                    "required": ["citation", "suggestedText", "rationale"],
                    "properties": {
                        "citation": citation,
                        "suggestedText": {"type": "string"},
                        "rationale": {"type": "string"}
                    }
                }
            }
        }
    })
}
