//! # leadfunnel-core
//!
//! The lead funnel domain - THE LOGIC.
//!
//! Everything the submission flow decides is decided here, synchronously
//! and without I/O:
//!
//! - `validation`: schema checks on untrusted form input
//! - `gate`: the budget gate that withholds the full assessment
//! - `prompt`: model input and the consultant instruction template
//! - `assessment`: call-to-action suffix and maturity tiers
//! - `notification`: operator e-mail payload
//! - `funnel`: the multi-step form state machine
//! - `report`: text rendering of the outcome
//!
//! The app crate sequences the remote calls around these rules.

// =============================================================================
// MODULES
// =============================================================================

pub mod assessment;
pub mod funnel;
pub mod gate;
pub mod notification;
pub mod primitives;
pub mod prompt;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// RE-EXPORTS
// =============================================================================

pub use assessment::MaturityTier;
pub use funnel::{FunnelForm, FunnelState, FunnelStep, TransitionError};
pub use gate::{BudgetGate, GateDecision, basic_assessment};
pub use notification::NotificationPayload;
pub use prompt::AssessmentRequest;
pub use report::render_outcome;
pub use types::{
    AssessmentResult, Challenge, FunnelError, LeadSubmission, MonthlyBudget, SubmissionOutcome,
};
pub use validation::{FieldError, LeadField, RawLeadSubmission, is_valid_email};
