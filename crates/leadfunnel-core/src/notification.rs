//! # Operator Notification Payload
//!
//! The human-readable summary of a captured lead, in the two shapes e-mail
//! providers accept: a flat template map, or a subject plus HTML body.

use crate::types::{AssessmentResult, LeadSubmission};
use serde::Serialize;
use std::collections::BTreeMap;

/// Lead plus assessment, flattened for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationPayload {
    params: BTreeMap<&'static str, String>,
}

impl NotificationPayload {
    pub fn new(lead: &LeadSubmission, assessment: &AssessmentResult) -> Self {
        let mut params = BTreeMap::new();
        params.insert("name", lead.name().to_string());
        params.insert("email", lead.email().to_string());
        params.insert("company_name", lead.company_name().to_string());
        params.insert("challenge", lead.challenge().to_string());
        params.insert("monthly_budget", lead.monthly_budget().to_string());
        params.insert("business_description", lead.business_description().to_string());
        params.insert("marketing_efforts", lead.marketing_efforts().to_string());
        params.insert("marketing_goals", lead.marketing_goals().to_string());
        params.insert("maturity_level", assessment.maturity_level.clone());
        params.insert("suggested_solutions", assessment.suggested_solutions.clone());
        params.insert("suggested_tactics", assessment.suggested_tactics.clone());
        Self { params }
    }

    /// Flat snake_case template parameters.
    pub fn template_params(&self) -> &BTreeMap<&'static str, String> {
        &self.params
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn subject(&self) -> String {
        format!(
            "New lead: {} ({})",
            self.get("company_name").unwrap_or_default(),
            self.get("monthly_budget").unwrap_or_default()
        )
    }

    /// HTML body with every value escaped.
    pub fn to_html(&self) -> String {
        let mut html = String::from("<h2>New lead captured</h2>\n<table>\n");
        for (key, value) in &self.params {
            html.push_str(&format!(
                "<tr><th align=\"left\">{}</th><td>{}</td></tr>\n",
                key,
                escape_html(value).replace('\n', "<br>")
            ));
        }
        html.push_str("</table>\n");
        html
    }
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
