//! # Budget Gate
//!
//! Lead qualification rule: prospects below the lowest budget bracket get a
//! fixed, generic assessment instead of a model-generated one.

use crate::primitives::{BASIC_MATURITY_LEVEL, BASIC_SUGGESTED_SOLUTIONS, BASIC_SUGGESTED_TACTICS};
use crate::types::{AssessmentResult, LeadSubmission, MonthlyBudget};

/// Result of applying the gate to a lead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Proceed to the language model.
    Qualified,
    /// Return this canned assessment; no model call, no operator contact.
    Withheld(AssessmentResult),
}

/// Stateless budget gate.
#[derive(Debug, Default, Clone, Copy)]
pub struct BudgetGate;

impl BudgetGate {
    pub fn new() -> Self {
        Self
    }

    pub fn evaluate(&self, lead: &LeadSubmission) -> GateDecision {
        self.evaluate_budget(lead.monthly_budget())
    }

    pub fn evaluate_budget(&self, budget: MonthlyBudget) -> GateDecision {
        if budget.is_gated() {
            GateDecision::Withheld(basic_assessment())
        } else {
            GateDecision::Qualified
        }
    }
}

/// The canned assessment shown to gated leads.
pub fn basic_assessment() -> AssessmentResult {
    AssessmentResult::new(
        BASIC_MATURITY_LEVEL,
        BASIC_SUGGESTED_SOLUTIONS,
        BASIC_SUGGESTED_TACTICS,
    )
}
