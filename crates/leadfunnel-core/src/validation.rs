//! # Lead Validation
//!
//! Schema validation for untrusted form input.
//!
//! Fields are checked in declaration order and the first failure wins for a
//! full submission. Per-step checks report every failing field of the step.
//! Lengths are counted in Unicode scalar values; values are kept verbatim.

use crate::primitives::{
    MAX_EMAIL_LENGTH, MAX_FREE_TEXT_LENGTH, MAX_SHORT_FIELD_LENGTH, MIN_BUSINESS_DESCRIPTION_LENGTH,
    MIN_COMPANY_NAME_LENGTH, MIN_MARKETING_EFFORTS_LENGTH, MIN_MARKETING_GOALS_LENGTH,
    MIN_NAME_LENGTH, REQUIRED_MESSAGE,
};
use crate::types::{Challenge, FunnelError, LeadSubmission, MonthlyBudget};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// FIELDS
// =============================================================================

/// A form field, named by its camelCase wire key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LeadField {
    Name,
    Email,
    CompanyName,
    Challenge,
    MonthlyBudget,
    BusinessDescription,
    MarketingEfforts,
    MarketingGoals,
}

impl LeadField {
    /// Declaration order; also the order in which errors are reported.
    pub const ALL: [LeadField; 8] = [
        LeadField::Name,
        LeadField::Email,
        LeadField::CompanyName,
        LeadField::Challenge,
        LeadField::MonthlyBudget,
        LeadField::BusinessDescription,
        LeadField::MarketingEfforts,
        LeadField::MarketingGoals,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::CompanyName => "companyName",
            Self::Challenge => "challenge",
            Self::MonthlyBudget => "monthlyBudget",
            Self::BusinessDescription => "businessDescription",
            Self::MarketingEfforts => "marketingEfforts",
            Self::MarketingGoals => "marketingGoals",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == value)
    }

    /// Question shown to the prospect for this field.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Full name",
            Self::Email => "Email",
            Self::CompanyName => "Company name",
            Self::Challenge => "What is your biggest marketing challenge?",
            Self::MonthlyBudget => "What is your monthly advertising budget?",
            Self::BusinessDescription => "Describe your business",
            Self::MarketingEfforts => "What are your current marketing efforts?",
            Self::MarketingGoals => "What are your marketing goals?",
        }
    }
}

impl fmt::Display for LeadField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single failing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: LeadField,
    pub message: String,
}

impl FieldError {
    fn new(field: LeadField, message: &str) -> Self {
        Self {
            field,
            message: message.to_string(),
        }
    }
}

impl From<FieldError> for FunnelError {
    fn from(err: FieldError) -> Self {
        FunnelError::Validation {
            field: err.field.as_str(),
            message: err.message,
        }
    }
}

// =============================================================================
// RAW SUBMISSION
// =============================================================================

/// Untrusted form input. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawLeadSubmission {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company_name: Option<String>,
    pub challenge: Option<String>,
    pub monthly_budget: Option<String>,
    pub business_description: Option<String>,
    pub marketing_efforts: Option<String>,
    pub marketing_goals: Option<String>,
}

impl RawLeadSubmission {
    /// Current value of a field, if any.
    pub fn get(&self, field: LeadField) -> Option<&str> {
        match field {
            LeadField::Name => self.name.as_deref(),
            LeadField::Email => self.email.as_deref(),
            LeadField::CompanyName => self.company_name.as_deref(),
            LeadField::Challenge => self.challenge.as_deref(),
            LeadField::MonthlyBudget => self.monthly_budget.as_deref(),
            LeadField::BusinessDescription => self.business_description.as_deref(),
            LeadField::MarketingEfforts => self.marketing_efforts.as_deref(),
            LeadField::MarketingGoals => self.marketing_goals.as_deref(),
        }
    }

    /// Overwrite a field.
    pub fn set(&mut self, field: LeadField, value: impl Into<String>) {
        let slot = match field {
            LeadField::Name => &mut self.name,
            LeadField::Email => &mut self.email,
            LeadField::CompanyName => &mut self.company_name,
            LeadField::Challenge => &mut self.challenge,
            LeadField::MonthlyBudget => &mut self.monthly_budget,
            LeadField::BusinessDescription => &mut self.business_description,
            LeadField::MarketingEfforts => &mut self.marketing_efforts,
            LeadField::MarketingGoals => &mut self.marketing_goals,
        };
        *slot = Some(value.into());
    }

    /// Validate one field.
    ///
    /// An absent text field is reported as required; an absent selection
    /// gets its "select" message.
    pub fn check(&self, field: LeadField) -> Result<(), FieldError> {
        let value = match (self.get(field), field) {
            (Some(value), _) => value,
            (None, LeadField::Challenge | LeadField::MonthlyBudget) => "",
            (None, _) => return Err(FieldError::new(field, REQUIRED_MESSAGE)),
        };
        match field {
            LeadField::Name => check_length(
                field,
                value,
                MIN_NAME_LENGTH,
                MAX_SHORT_FIELD_LENGTH,
                "Name must be at least 2 characters.",
            ),
            LeadField::Email => {
                if value.chars().count() <= MAX_EMAIL_LENGTH && is_valid_email(value) {
                    Ok(())
                } else {
                    Err(FieldError::new(field, "Please enter a valid email."))
                }
            }
            LeadField::CompanyName => check_length(
                field,
                value,
                MIN_COMPANY_NAME_LENGTH,
                MAX_SHORT_FIELD_LENGTH,
                "Company name must be at least 2 characters.",
            ),
            LeadField::Challenge => Challenge::from_wire(value).map(|_| ()).ok_or_else(|| {
                FieldError::new(field, "You need to select your primary challenge.")
            }),
            LeadField::MonthlyBudget => MonthlyBudget::from_wire(value).map(|_| ()).ok_or_else(|| {
                FieldError::new(field, "You need to select your monthly budget.")
            }),
            LeadField::BusinessDescription => check_length(
                field,
                value,
                MIN_BUSINESS_DESCRIPTION_LENGTH,
                MAX_FREE_TEXT_LENGTH,
                "Please describe your business in at least 20 characters.",
            ),
            LeadField::MarketingEfforts => check_length(
                field,
                value,
                MIN_MARKETING_EFFORTS_LENGTH,
                MAX_FREE_TEXT_LENGTH,
                "Please describe your marketing efforts in at least 20 characters.",
            ),
            LeadField::MarketingGoals => check_length(
                field,
                value,
                MIN_MARKETING_GOALS_LENGTH,
                MAX_FREE_TEXT_LENGTH,
                "Please describe your marketing goals in at least 10 characters.",
            ),
        }
    }

    /// Validate a subset of fields, reporting every failure in declaration order.
    pub fn validate_fields(&self, fields: &[LeadField]) -> Vec<FieldError> {
        LeadField::ALL
            .into_iter()
            .filter(|f| fields.contains(f))
            .filter_map(|f| self.check(f).err())
            .collect()
    }

    /// Validate the whole record, returning the first field error.
    pub fn validate(&self) -> Result<LeadSubmission, FunnelError> {
        for field in LeadField::ALL {
            self.check(field)?;
        }

        let challenge = self
            .challenge
            .as_deref()
            .and_then(Challenge::from_wire)
            .ok_or_else(|| FieldError::new(LeadField::Challenge, "You need to select your primary challenge."))?;
        let monthly_budget = self
            .monthly_budget
            .as_deref()
            .and_then(MonthlyBudget::from_wire)
            .ok_or_else(|| FieldError::new(LeadField::MonthlyBudget, "You need to select your monthly budget."))?;

        Ok(LeadSubmission {
            name: self.name.clone().unwrap_or_default(),
            email: self.email.clone().unwrap_or_default(),
            company_name: self.company_name.clone().unwrap_or_default(),
            challenge,
            monthly_budget,
            business_description: self.business_description.clone().unwrap_or_default(),
            marketing_efforts: self.marketing_efforts.clone().unwrap_or_default(),
            marketing_goals: self.marketing_goals.clone().unwrap_or_default(),
        })
    }
}

impl From<&LeadSubmission> for RawLeadSubmission {
    fn from(lead: &LeadSubmission) -> Self {
        Self {
            name: Some(lead.name.clone()),
            email: Some(lead.email.clone()),
            company_name: Some(lead.company_name.clone()),
            challenge: Some(lead.challenge.as_str().to_string()),
            monthly_budget: Some(lead.monthly_budget.as_str().to_string()),
            business_description: Some(lead.business_description.clone()),
            marketing_efforts: Some(lead.marketing_efforts.clone()),
            marketing_goals: Some(lead.marketing_goals.clone()),
        }
    }
}

fn check_length(
    field: LeadField,
    value: &str,
    min: usize,
    max: usize,
    too_short: &str,
) -> Result<(), FieldError> {
    let len = value.chars().count();
    if len < min {
        return Err(FieldError::new(field, too_short));
    }
    if len > max {
        return Err(FieldError {
            field,
            message: format!("{} must be at most {} characters.", field.label(), max),
        });
    }
    Ok(())
}

// =============================================================================
// EMAIL SYNTAX
// =============================================================================

/// Syntactic e-mail check, equivalent to zod's email pattern.
///
/// Local part: `[A-Za-z0-9_'+.-]`, no leading dot, no `..`, ending in
/// `[A-Za-z0-9_+-]`. Domain: labels `[A-Za-z0-9][A-Za-z0-9-]*` joined by
/// dots, then an alphabetic TLD of at least two letters.
pub fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };

    let local_ok = !local.starts_with('.')
        && !local.contains("..")
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_'+-.".contains(c))
        && local
            .chars()
            .last()
            .is_some_and(|c| c.is_ascii_alphanumeric() || "_+-".contains(c));
    if !local_ok {
        return false;
    }

    let Some((hosts, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    let hosts_ok = hosts.split('.').all(|label| {
        label.starts_with(|c: char| c.is_ascii_alphanumeric())
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });
    let tld_ok = tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic());

    hosts_ok && tld_ok
}

// =============================================================================
// TESTS
// =============================================================================
