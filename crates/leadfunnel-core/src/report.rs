//! # Result Rendering
//!
//! Plain-text rendering of a [`SubmissionOutcome`] for terminals and logs.

use crate::assessment::MaturityTier;
use crate::primitives::GENERIC_SUBMISSION_ERROR;
use crate::types::SubmissionOutcome;

const CONTACT_NOTICE: &str = "Analysis complete! Raul will contact you soon.";

/// Render the result card, or the error state.
pub fn render_outcome(outcome: &SubmissionOutcome) -> String {
    let Some(data) = outcome.data.as_ref().filter(|_| outcome.success) else {
        let message = outcome.error.as_deref().unwrap_or(GENERIC_SUBMISSION_ERROR);
        return format!("Error: {message}\n");
    };

    let tier = MaturityTier::from_label(&data.maturity_level);
    let mut out = String::new();
    out.push_str("Your Personalized Marketing Analysis\n");
    out.push_str("====================================\n\n");
    out.push_str(&format!(
        "Marketing Maturity Level: {} {}\n\n",
        tier.badge(),
        data.maturity_level
    ));
    out.push_str("Suggested Solutions\n-------------------\n");
    out.push_str(&data.suggested_solutions);
    out.push_str("\n\nSuggested Tactics\n-----------------\n");
    out.push_str(&data.suggested_tactics);
    out.push('\n');
    if outcome.contact_will_be_made {
        out.push('\n');
        out.push_str(CONTACT_NOTICE);
        out.push('\n');
    }
    out
}
