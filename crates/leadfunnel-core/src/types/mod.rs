//! # Core Type Definitions
//!
//! The lead funnel data model: what a prospect submits, what the assessment
//! looks like, and the single outcome contract returned to the presentation
//! layer.

use crate::primitives::{GENERATION_FAILED_MESSAGE, GENERIC_SUBMISSION_ERROR, SERVICE_UNAVAILABLE_MESSAGE};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// CHALLENGE
// =============================================================================

/// The prospect's primary marketing challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Challenge {
    LeadGeneration,
    BrandAwareness,
    SalesConversion,
    Other,
}

impl Challenge {
    /// Every challenge, in form display order.
    pub const ALL: [Challenge; 4] = [
        Challenge::LeadGeneration,
        Challenge::BrandAwareness,
        Challenge::SalesConversion,
        Challenge::Other,
    ];

    /// Wire name, as submitted by the form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LeadGeneration => "lead-generation",
            Self::BrandAwareness => "brand-awareness",
            Self::SalesConversion => "sales-conversion",
            Self::Other => "other",
        }
    }

    /// Parse a wire name. Unknown names yield `None`.
    pub fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }

    /// Human label shown next to the radio option.
    pub fn label(&self) -> &'static str {
        match self {
            Self::LeadGeneration => "Lead Generation",
            Self::BrandAwareness => "Brand Awareness",
            Self::SalesConversion => "Sales Conversion",
            Self::Other => "Other",
        }
    }

    /// Example goal offered as a hint on the goals step.
    pub fn goals_placeholder(&self) -> &'static str {
        match self {
            Self::LeadGeneration => "e.g. Generate 50 new qualified leads per month.",
            Self::BrandAwareness => "e.g. Grow website traffic by 30% next quarter.",
            Self::SalesConversion => "e.g. Improve our funnel conversion rate by 15%.",
            Self::Other => "e.g. Launch a new product and win market share.",
        }
    }
}

impl fmt::Display for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// MONTHLY BUDGET
// =============================================================================

/// Declared monthly advertising budget bracket (USD).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MonthlyBudget {
    #[serde(rename = "<1500")]
    Under1500,
    #[serde(rename = "1500-5000")]
    From1500To5000,
    #[serde(rename = "5000-10000")]
    From5000To10000,
    #[serde(rename = ">10000")]
    Over10000,
}

impl MonthlyBudget {
    /// Every bracket, lowest first.
    pub const ALL: [MonthlyBudget; 4] = [
        MonthlyBudget::Under1500,
        MonthlyBudget::From1500To5000,
        MonthlyBudget::From5000To10000,
        MonthlyBudget::Over10000,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Under1500 => "<1500",
            Self::From1500To5000 => "1500-5000",
            Self::From5000To10000 => "5000-10000",
            Self::Over10000 => ">10000",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.as_str() == value)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Under1500 => "Less than $1,500",
            Self::From1500To5000 => "$1,500 - $5,000",
            Self::From5000To10000 => "$5,000 - $10,000",
            Self::Over10000 => "More than $10,000",
        }
    }

    /// Whether this bracket is withheld from the full assessment.
    pub fn is_gated(&self) -> bool {
        matches!(self, Self::Under1500)
    }
}

impl fmt::Display for MonthlyBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// LEAD SUBMISSION
// =============================================================================

/// A validated lead.
///
/// Only obtainable through [`crate::validation::RawLeadSubmission::validate`],
/// and read-only afterwards. Lives for one request; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSubmission {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) company_name: String,
    pub(crate) challenge: Challenge,
    pub(crate) monthly_budget: MonthlyBudget,
    pub(crate) business_description: String,
    pub(crate) marketing_efforts: String,
    pub(crate) marketing_goals: String,
}

impl LeadSubmission {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    pub fn challenge(&self) -> Challenge {
        self.challenge
    }

    pub fn monthly_budget(&self) -> MonthlyBudget {
        self.monthly_budget
    }

    pub fn business_description(&self) -> &str {
        &self.business_description
    }

    pub fn marketing_efforts(&self) -> &str {
        &self.marketing_efforts
    }

    pub fn marketing_goals(&self) -> &str {
        &self.marketing_goals
    }
}

// =============================================================================
// ASSESSMENT RESULT
// =============================================================================

/// Marketing maturity assessment.
///
/// Also the output contract of the language model: all three fields are
/// required strings, so a missing or `null` field fails deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
    pub maturity_level: String,
    pub suggested_solutions: String,
    pub suggested_tactics: String,
}

impl AssessmentResult {
    pub fn new(
        maturity_level: impl Into<String>,
        suggested_solutions: impl Into<String>,
        suggested_tactics: impl Into<String>,
    ) -> Self {
        Self {
            maturity_level: maturity_level.into(),
            suggested_solutions: suggested_solutions.into(),
            suggested_tactics: suggested_tactics.into(),
        }
    }
}

// =============================================================================
// SUBMISSION OUTCOME
// =============================================================================

/// The sole return contract of the submission orchestrator.
///
/// Invariant: `success` implies `data` is present and `error` absent;
/// otherwise `data` is absent and `error` present. Use the constructors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionOutcome {
    pub success: bool,
    pub contact_will_be_made: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<AssessmentResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubmissionOutcome {
    pub fn success(data: AssessmentResult, contact_will_be_made: bool) -> Self {
        Self {
            success: true,
            contact_will_be_made,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            contact_will_be_made: false,
            data: None,
            error: Some(msg.into()),
        }
    }

    /// Fold an error into the user-facing contract.
    pub fn from_error(err: &FunnelError) -> Self {
        Self::failure(err.user_message())
    }

    /// True when the invariant between `success`, `data` and `error` holds.
    pub fn is_well_formed(&self) -> bool {
        if self.success {
            self.data.is_some() && self.error.is_none()
        } else {
            self.data.is_none() && self.error.as_deref().is_some_and(|e| !e.is_empty())
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur while handling a lead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FunnelError {
    /// A field failed schema validation.
    #[error("Validation failed on {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// A required credential is missing.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The language model failed or returned an unusable answer.
    #[error("Generation error: {0}")]
    Generation(String),

    /// The operator notification could not be delivered.
    #[error("Notification error: {0}")]
    Notification(String),
}

impl FunnelError {
    /// Message safe to show to the prospect.
    ///
    /// Remote detail never leaves the server: only validation messages are
    /// passed through verbatim.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { message, .. } => message.clone(),
            Self::Configuration(_) => SERVICE_UNAVAILABLE_MESSAGE.to_string(),
            Self::Generation(_) => GENERATION_FAILED_MESSAGE.to_string(),
            Self::Notification(_) => GENERIC_SUBMISSION_ERROR.to_string(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
