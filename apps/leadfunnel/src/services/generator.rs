//! # Assessment Generator
//!
//! One call to a hosted language model per qualified lead: render the
//! prompt, declare the output schema, parse the answer strictly.
//! No retry, no caching, no streaming.

use crate::config::ModelConfig;
use async_trait::async_trait;
use leadfunnel_core::{AssessmentRequest, AssessmentResult, FunnelError};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;

/// Produces an assessment from the model input.
#[async_trait]
pub trait AssessmentGenerator: Send + Sync {
    async fn generate(&self, request: &AssessmentRequest) -> Result<AssessmentResult, FunnelError>;
}

// =============================================================================
// OUTPUT SCHEMA
// =============================================================================

/// Response schema declared to the model: three required strings.
pub fn output_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "maturityLevel": {
                "type": "STRING",
                "description": "An assessment of the business marketing maturity level (e.g., Beginner, Intermediate, Advanced)."
            },
            "suggestedSolutions": {
                "type": "STRING",
                "description": "Tailored solutions and recommendations to improve the marketing funnel."
            },
            "suggestedTactics": {
                "type": "STRING",
                "description": "Suggested marketing tactics and platform prioritization for funnel mastery based on algorithmic insights."
            }
        },
        "required": ["maturityLevel", "suggestedSolutions", "suggestedTactics"]
    })
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Extract and validate the structured answer from a model response body.
///
/// A missing candidate, missing text, or text that is not a complete
/// assessment object is a schema violation.
pub fn parse_generation(body: &str) -> Result<AssessmentResult, FunnelError> {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| FunnelError::Generation(format!("Malformed model response: {}", e)))?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect::<String>())
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| FunnelError::Generation("Model returned no output".to_string()))?;

    serde_json::from_str::<AssessmentResult>(&text)
        .map_err(|e| FunnelError::Generation(format!("Model output violates schema: {}", e)))
}

// =============================================================================
// GEMINI CLIENT
// =============================================================================

/// Generator backed by the Gemini `generateContent` REST endpoint.
#[derive(Clone)]
pub struct GeminiGenerator {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
    timeout_secs: u64,
}

impl GeminiGenerator {
    /// Build a client with the configured request timeout.
    pub fn new(config: &ModelConfig, api_key: impl Into<String>) -> Result<Self, FunnelError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FunnelError::Configuration(format!("HTTP client: {}", e)))?;
        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: api_key.into(),
            timeout_secs: config.timeout_secs,
        })
    }

    fn url(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.endpoint, self.model)
    }

    fn body(request: &AssessmentRequest) -> Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.render() }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": output_schema()
            }
        })
    }
}

#[async_trait]
impl AssessmentGenerator for GeminiGenerator {
    async fn generate(&self, request: &AssessmentRequest) -> Result<AssessmentResult, FunnelError> {
        tracing::debug!(model = %self.model, "Requesting marketing maturity assessment");

        let resp = self
            .http
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::body(request))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FunnelError::Generation(format!("Model call timed out after {}s", self.timeout_secs))
                } else {
                    FunnelError::Generation(format!("Model call failed: {}", e))
                }
            })?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| FunnelError::Generation(format!("Reading model response: {}", e)))?;

        if !status.is_success() {
            return Err(FunnelError::Generation(format!(
                "Model returned {}: {}",
                status.as_u16(),
                body
            )));
        }

        parse_generation(&body)
    }
}

// =============================================================================
// TESTS
// =============================================================================
