//! # Funnel Form State Machine
//!
//! Presentation-side flow that collects a lead across sequential steps and
//! consumes the orchestrator's outcome.
//!
//! ```text
//! Collecting(Contact) -> ... -> Collecting(Goals) -> Submitting
//!                                                      |
//!                                  ShowingResult <-----+-----> ShowingError
//!                                        |                          |
//!                                        +------- reset ------------+--> Collecting(Contact)
//! ```
//!
//! Forward navigation is gated by the current step's fields; backward
//! navigation is unconditional.

use crate::primitives::GENERIC_SUBMISSION_ERROR;
use crate::types::{AssessmentResult, Challenge, SubmissionOutcome};
use crate::validation::{FieldError, LeadField, RawLeadSubmission};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// STEPS
// =============================================================================

/// One page of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunnelStep {
    Contact,
    Challenge,
    Budget,
    Business,
    Efforts,
    Goals,
}

impl FunnelStep {
    pub const ALL: [FunnelStep; 6] = [
        FunnelStep::Contact,
        FunnelStep::Challenge,
        FunnelStep::Budget,
        FunnelStep::Business,
        FunnelStep::Efforts,
        FunnelStep::Goals,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// 1-based position.
    pub fn number(&self) -> usize {
        match self {
            Self::Contact => 1,
            Self::Challenge => 2,
            Self::Budget => 3,
            Self::Business => 4,
            Self::Efforts => 5,
            Self::Goals => 6,
        }
    }

    pub fn from_number(number: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.number() == number)
    }

    pub fn fields(&self) -> &'static [LeadField] {
        match self {
            Self::Contact => &[LeadField::Name, LeadField::Email, LeadField::CompanyName],
            Self::Challenge => &[LeadField::Challenge],
            Self::Budget => &[LeadField::MonthlyBudget],
            Self::Business => &[LeadField::BusinessDescription],
            Self::Efforts => &[LeadField::MarketingEfforts],
            Self::Goals => &[LeadField::MarketingGoals],
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Contact => "About you",
            Self::Challenge => "Your challenge",
            Self::Budget => "Your budget",
            Self::Business => "Your business",
            Self::Efforts => "Your marketing today",
            Self::Goals => "Your goals",
        }
    }

    /// Step holding the given field.
    pub fn of_field(field: LeadField) -> Self {
        Self::ALL
            .into_iter()
            .find(|s| s.fields().contains(&field))
            .unwrap_or(Self::Contact)
    }

    fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    fn prev(self) -> Option<Self> {
        self.number().checked_sub(1).and_then(Self::from_number)
    }

    pub fn is_last(&self) -> bool {
        self.number() == Self::COUNT
    }
}

impl fmt::Display for FunnelStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} {}", self.number(), Self::COUNT, self.title())
    }
}

// =============================================================================
// STATE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunnelState {
    Collecting(FunnelStep),
    Submitting,
    ShowingResult {
        assessment: AssessmentResult,
        contact_will_be_made: bool,
    },
    ShowingError(String),
}

impl FunnelState {
    fn name(&self) -> &'static str {
        match self {
            Self::Collecting(_) => "collecting",
            Self::Submitting => "submitting",
            Self::ShowingResult { .. } => "showing a result",
            Self::ShowingError(_) => "showing an error",
        }
    }
}

/// Rejected transition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// The step's fields did not validate; the form stays on `step`.
    #[error("Step {step} has {} invalid field(s)", .errors.len())]
    InvalidStep {
        step: FunnelStep,
        errors: Vec<FieldError>,
    },

    #[error("Cannot {action} while {state}")]
    NotAllowed {
        action: &'static str,
        state: &'static str,
    },
}

// =============================================================================
// FORM
// =============================================================================

/// Multi-step lead form for one session.
#[derive(Debug, Clone)]
pub struct FunnelForm {
    fields: RawLeadSubmission,
    state: FunnelState,
}

impl Default for FunnelForm {
    fn default() -> Self {
        Self::new()
    }
}

impl FunnelForm {
    pub fn new() -> Self {
        Self {
            fields: RawLeadSubmission::default(),
            state: FunnelState::Collecting(FunnelStep::Contact),
        }
    }

    pub fn state(&self) -> &FunnelState {
        &self.state
    }

    pub fn fields(&self) -> &RawLeadSubmission {
        &self.fields
    }

    /// Current step, when collecting.
    pub fn step(&self) -> Option<FunnelStep> {
        match self.state {
            FunnelState::Collecting(step) => Some(step),
            _ => None,
        }
    }

    /// Integer completion percentage of the collecting phase.
    pub fn progress_percent(&self) -> u8 {
        match &self.state {
            FunnelState::Collecting(step) => (step.number() * 100 / FunnelStep::COUNT) as u8,
            _ => 100,
        }
    }

    /// Placeholder for the goals step, tailored to the selected challenge.
    pub fn goals_placeholder(&self) -> &'static str {
        self.fields
            .challenge
            .as_deref()
            .and_then(Challenge::from_wire)
            .unwrap_or(Challenge::Other)
            .goals_placeholder()
    }

    fn not_allowed(&self, action: &'static str) -> TransitionError {
        TransitionError::NotAllowed {
            action,
            state: self.state.name(),
        }
    }

    pub fn set_field(&mut self, field: LeadField, value: impl Into<String>) -> Result<(), TransitionError> {
        if self.step().is_none() {
            return Err(self.not_allowed("edit a field"));
        }
        self.fields.set(field, value);
        Ok(())
    }

    /// Advance if the current step validates.
    pub fn next(&mut self) -> Result<FunnelStep, TransitionError> {
        let step = self.step().ok_or_else(|| self.not_allowed("go forward"))?;
        let errors = self.fields.validate_fields(step.fields());
        if !errors.is_empty() {
            return Err(TransitionError::InvalidStep { step, errors });
        }
        let next = step.next().ok_or_else(|| self.not_allowed("go past the last step"))?;
        self.state = FunnelState::Collecting(next);
        Ok(next)
    }

    /// Go back one step; stays on the first step.
    pub fn back(&mut self) -> Result<FunnelStep, TransitionError> {
        let step = self.step().ok_or_else(|| self.not_allowed("go back"))?;
        let prev = step.prev().unwrap_or(step);
        self.state = FunnelState::Collecting(prev);
        Ok(prev)
    }

    /// Validate the complete record and enter `Submitting`.
    ///
    /// Returns the assembled record for the orchestrator. On failure the
    /// form moves to the step that owns the first invalid field.
    pub fn begin_submit(&mut self) -> Result<RawLeadSubmission, TransitionError> {
        let step = self.step().ok_or_else(|| self.not_allowed("submit"))?;
        if !step.is_last() {
            return Err(self.not_allowed("submit before the last step"));
        }

        let errors = self.fields.validate_fields(&LeadField::ALL);
        if let Some(first) = errors.first() {
            let target = FunnelStep::of_field(first.field);
            let errors = self.fields.validate_fields(target.fields());
            self.state = FunnelState::Collecting(target);
            return Err(TransitionError::InvalidStep { step: target, errors });
        }

        self.state = FunnelState::Submitting;
        Ok(self.fields.clone())
    }

    /// Consume the orchestrator's outcome.
    pub fn complete(&mut self, outcome: SubmissionOutcome) -> Result<(), TransitionError> {
        if self.state != FunnelState::Submitting {
            return Err(self.not_allowed("complete a submission"));
        }
        self.state = match outcome.data {
            Some(assessment) if outcome.success => FunnelState::ShowingResult {
                assessment,
                contact_will_be_made: outcome.contact_will_be_made,
            },
            _ => FunnelState::ShowingError(
                outcome
                    .error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| GENERIC_SUBMISSION_ERROR.to_string()),
            ),
        };
        Ok(())
    }

    /// Start a new session.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

// =============================================================================
// TESTS
// =============================================================================
