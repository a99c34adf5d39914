//! # Submission Orchestrator
//!
//! The single server-side entry point for a completed lead form.
//!
//! ```text
//! raw input -> validate -> budget gate -> credential check -> generate
//!                 |             |               |                |
//!              error      canned result      error      error | + call to action
//!                                                                 + detached e-mail
//! ```
//!
//! Every failure becomes a [`SubmissionOutcome`]; nothing panics past
//! this boundary.

use super::generator::{AssessmentGenerator, GeminiGenerator};
use super::notifier::{EmailJsDispatcher, NotificationDispatcher, spawn_dispatch};
use crate::config::AppConfig;
use leadfunnel_core::{
    AssessmentRequest, BudgetGate, FunnelError, GateDecision, NotificationPayload,
    RawLeadSubmission, SubmissionOutcome,
};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// A handled submission.
#[derive(Debug)]
pub struct Processed {
    pub outcome: SubmissionOutcome,
    /// The detached notification task, when one was started.
    ///
    /// Dropping it does not cancel the send.
    pub notification: Option<JoinHandle<()>>,
}

/// Sequences validation, the budget gate, the model call and the operator
/// notification for one lead.
#[derive(Clone)]
pub struct SubmissionOrchestrator {
    gate: BudgetGate,
    generator: Option<Arc<dyn AssessmentGenerator>>,
    notifier: Option<Arc<dyn NotificationDispatcher>>,
}

impl SubmissionOrchestrator {
    /// `None` stands for a missing credential.
    pub fn new(
        generator: Option<Arc<dyn AssessmentGenerator>>,
        notifier: Option<Arc<dyn NotificationDispatcher>>,
    ) -> Self {
        Self {
            gate: BudgetGate::new(),
            generator,
            notifier,
        }
    }

    /// Wire the Gemini generator and EmailJS dispatcher from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, FunnelError> {
        let generator: Option<Arc<dyn AssessmentGenerator>> = match config.model.api_key() {
            Some(key) => {
                tracing::info!(model = %config.model.model, "Assessment generator configured");
                Some(Arc::new(GeminiGenerator::new(&config.model, key)?))
            }
            None => {
                tracing::warn!("GOOGLE_API_KEY not set - qualified leads will get a service-unavailable error");
                None
            }
        };

        let notifier: Option<Arc<dyn NotificationDispatcher>> = match config.email.credentials() {
            Some(creds) => {
                tracing::info!("Lead notifications enabled");
                Some(Arc::new(EmailJsDispatcher::new(config.email.endpoint.clone(), creds)?))
            }
            None => {
                for (key, present) in config.email.presence() {
                    tracing::debug!(key, present, "EmailJS credential");
                }
                tracing::warn!("EmailJS credentials incomplete - lead notifications disabled");
                None
            }
        };

        Ok(Self::new(generator, notifier))
    }

    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    pub fn has_notifier(&self) -> bool {
        self.notifier.is_some()
    }

    /// Handle one submission, exposing the error kind.
    pub async fn process(&self, raw: &RawLeadSubmission) -> Result<Processed, FunnelError> {
        let lead = raw.validate().inspect_err(|e| {
            tracing::info!(event = "lead_rejected", reason = %e, "Form validation failed");
        })?;

        if let GateDecision::Withheld(canned) = self.gate.evaluate(&lead) {
            tracing::info!(
                event = "lead_gated",
                budget = %lead.monthly_budget(),
                "Budget below threshold - returning basic analysis"
            );
            return Ok(Processed {
                outcome: SubmissionOutcome::success(canned, false),
                notification: None,
            });
        }

        let Some(generator) = self.generator.as_ref() else {
            tracing::error!("Language model API key is not configured. AI analysis cannot proceed.");
            return Err(FunnelError::Configuration(
                "language model credential missing".to_string(),
            ));
        };

        let request = AssessmentRequest::from_submission(&lead);
        let assessment = generator
            .generate(&request)
            .await
            .inspect_err(|e| {
                tracing::error!(event = "generation_failed", error = %e, "Error calling assessment model");
            })?
            .with_call_to_action();

        tracing::info!(
            event = "lead_captured",
            name = lead.name(),
            email = lead.email(),
            company = lead.company_name(),
            maturity = %assessment.maturity_level,
            "New lead captured"
        );

        let notification = self.notifier.as_ref().map(|notifier| {
            spawn_dispatch(
                Arc::clone(notifier),
                NotificationPayload::new(&lead, &assessment),
            )
        });
        let contact_will_be_made = notification.is_some();

        Ok(Processed {
            outcome: SubmissionOutcome::success(assessment, contact_will_be_made),
            notification,
        })
    }

    /// Handle one submission, folding any error into the outcome contract.
    pub async fn submit(&self, raw: &RawLeadSubmission) -> SubmissionOutcome {
        match self.process(raw).await {
            Ok(processed) => processed.outcome,
            Err(e) => SubmissionOutcome::from_error(&e),
        }
    }
}
