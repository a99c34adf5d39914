//! # Assessment Prompt
//!
//! The model input and the fixed consultant instruction template.
//! Inputs are interpolated verbatim; escaping is the transport's concern.

use crate::types::LeadSubmission;
use serde::{Deserialize, Serialize};

/// Language-model boundary input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRequest {
    pub business_description: String,
    pub marketing_efforts: String,
    /// Stated goals, prefixed with the primary challenge.
    pub marketing_goals: String,
    pub monthly_budget: String,
}

impl AssessmentRequest {
    /// Build the model input, folding the challenge into the goals.
    pub fn from_submission(lead: &LeadSubmission) -> Self {
        Self {
            business_description: lead.business_description().to_string(),
            marketing_efforts: lead.marketing_efforts().to_string(),
            marketing_goals: format!(
                "Primary challenge is \"{}\". Stated goals: {}",
                lead.challenge(),
                lead.marketing_goals()
            ),
            monthly_budget: lead.monthly_budget().to_string(),
        }
    }

    /// Render the full instruction sent to the model.
    pub fn render(&self) -> String {
        format!(
            "You are an expert marketing consultant specializing in marketing funnel optimization.

You will analyze the provided information about the business, its marketing efforts, and goals to determine its marketing maturity level and suggest tailored solutions.

Business Description: {}
Marketing Efforts: {}
Marketing Goals: {}
Monthly Budget: {}

Based on this information, assess the marketing maturity level and provide specific, actionable solutions to improve their marketing funnel and achieve their goals. Also suggest specific marketing tactics and platform prioritization.

Ensure your response is clear, concise, and directly addresses the business needs.

Here's an outline on how to approach the prompt:
1.  Acknowledge receipt of the business description, marketing efforts and marketing goals.
2.  Based on the info provided, assess the marketing maturity level of the business (Beginner, Intermediate, Advanced).
3.  Provide tailored solutions and recommendations to improve the marketing funnel.
4.  Suggest specific marketing tactics and platform prioritization for funnel mastery based on algorithmic insights.
",
            self.business_description, self.marketing_efforts, self.marketing_goals, self.monthly_budget
        )
    }
}
