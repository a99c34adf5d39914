//! # Fixed Copy and Limits
//!
//! Constants compiled into the binary: validation bounds, the canned
//! low-budget assessment, the call-to-action suffix and the user-facing
//! error strings.

// =============================================================================
// FIELD LENGTH LIMITS (Unicode scalar values)
// =============================================================================

pub const MIN_NAME_LENGTH: usize = 2;
pub const MIN_COMPANY_NAME_LENGTH: usize = 2;
pub const MIN_BUSINESS_DESCRIPTION_LENGTH: usize = 20;
pub const MIN_MARKETING_EFFORTS_LENGTH: usize = 20;
pub const MIN_MARKETING_GOALS_LENGTH: usize = 10;

/// Upper bound for short identity fields (name, company).
pub const MAX_SHORT_FIELD_LENGTH: usize = 200;

/// RFC 5321 path limit.
pub const MAX_EMAIL_LENGTH: usize = 320;

/// Upper bound for the free-text fields that end up in the prompt and e-mail.
pub const MAX_FREE_TEXT_LENGTH: usize = 5000;

// =============================================================================
// BUDGET GATE COPY
// =============================================================================

pub const BASIC_MATURITY_LEVEL: &str = "Basic Analysis";

pub const BASIC_SUGGESTED_SOLUTIONS: &str = "To unlock advanced strategies and maximize your return on investment, a larger budget is recommended. Contact Raul to get your personalized results.";

pub const BASIC_SUGGESTED_TACTICS: &str = "Personalized tactical recommendations are available for partners ready to invest in significant growth. Contact Raul to get your personalized results.";

// =============================================================================
// CALL TO ACTION
// =============================================================================

/// Appended to both recommendation fields of every generated assessment.
pub const CALL_TO_ACTION: &str = "\n\nBy partnering with a media buyer specialist like Raul, you can implement these strategies effectively and achieve your expected results.";

// =============================================================================
// USER-FACING MESSAGES
// =============================================================================

pub const SERVICE_UNAVAILABLE_MESSAGE: &str =
    "The analysis service is temporarily unavailable. Please try again later.";

pub const GENERATION_FAILED_MESSAGE: &str =
    "An unexpected error occurred while analyzing your data. Please try again later.";

/// Reported for a text field missing from the submitted record.
pub const REQUIRED_MESSAGE: &str = "Required";

pub const INVALID_FORM_MESSAGE: &str = "Invalid form data provided.";

pub const GENERIC_SUBMISSION_ERROR: &str =
    "There was an issue with your submission. Please check your inputs and try again.";
