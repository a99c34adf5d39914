//! # API Request/Response Types
//!
//! JSON structures for the HTTP API. The submit endpoint speaks the core
//! types directly (`RawLeadSubmission` in, `SubmissionOutcome` out).

use leadfunnel_core::{Challenge, FieldError, FunnelStep, LeadField, MonthlyBudget, RawLeadSubmission};
use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// FORM DEFINITION
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldJson {
    pub name: LeadField,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepJson {
    pub number: usize,
    pub key: FunnelStep,
    pub title: String,
    pub fields: Vec<FieldJson>,
}

/// A selectable value for an enumerated field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionJson {
    pub value: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

/// Everything a client needs to render the multi-step form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormResponse {
    pub steps: Vec<StepJson>,
    pub challenges: Vec<OptionJson>,
    pub budgets: Vec<OptionJson>,
}

impl FormResponse {
    pub fn describe() -> Self {
        let steps = FunnelStep::ALL
            .into_iter()
            .map(|step| StepJson {
                number: step.number(),
                key: step,
                title: step.title().to_string(),
                fields: step
                    .fields()
                    .iter()
                    .map(|f| FieldJson {
                        name: *f,
                        label: f.label().to_string(),
                    })
                    .collect(),
            })
            .collect();

        let challenges = Challenge::ALL
            .into_iter()
            .map(|c| OptionJson {
                value: c.as_str().to_string(),
                label: c.label().to_string(),
                placeholder: Some(c.goals_placeholder().to_string()),
            })
            .collect();

        let budgets = MonthlyBudget::ALL
            .into_iter()
            .map(|b| OptionJson {
                value: b.as_str().to_string(),
                label: b.label().to_string(),
                placeholder: None,
            })
            .collect();

        Self {
            steps,
            challenges,
            budgets,
        }
    }
}

// =============================================================================
// STEP VALIDATION
// =============================================================================

/// Per-step validation request: the step number and the form values so far.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateStepRequest {
    pub step: usize,
    #[serde(default)]
    pub fields: RawLeadSubmission,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateStepResponse {
    pub valid: bool,
    pub errors: Vec<FieldError>,
    pub error: Option<String>,
}

impl ValidateStepResponse {
    pub fn checked(errors: Vec<FieldError>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            valid: false,
            errors: vec![],
            error: Some(msg.into()),
        }
    }
}
