//! # Assessment Post-processing
//!
//! Call-to-action augmentation and maturity tier classification.

use crate::primitives::CALL_TO_ACTION;
use crate::types::AssessmentResult;
use serde::{Deserialize, Serialize};

impl AssessmentResult {
    /// Append [`CALL_TO_ACTION`] to both recommendation fields.
    ///
    /// Applied once per generated assessment; model text is never inspected.
    #[must_use]
    pub fn with_call_to_action(mut self) -> Self {
        self.suggested_solutions.push_str(CALL_TO_ACTION);
        self.suggested_tactics.push_str(CALL_TO_ACTION);
        self
    }

    pub fn tier(&self) -> MaturityTier {
        MaturityTier::from_label(&self.maturity_level)
    }
}

// =============================================================================
// MATURITY TIER
// =============================================================================

/// Coarse classification of the free-text maturity label, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaturityTier {
    Advanced,
    Intermediate,
    Beginner,
    /// Anything else, including the gated "Basic Analysis".
    Unrated,
}

impl MaturityTier {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "advanced" => Self::Advanced,
            "intermediate" => Self::Intermediate,
            "beginner" => Self::Beginner,
            _ => Self::Unrated,
        }
    }

    /// Badge marker used by the text renderer.
    pub fn badge(&self) -> &'static str {
        match self {
            Self::Advanced => "[+++]",
            Self::Intermediate => "[++ ]",
            Self::Beginner => "[+  ]",
            Self::Unrated => "[   ]",
        }
    }
}
