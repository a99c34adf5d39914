//! # Notification Dispatcher
//!
//! Best-effort e-mail to the human sales contact. One attempt per lead,
//! detached from the request: failures are logged and swallowed.

use crate::config::EmailCredentials;
use async_trait::async_trait;
use leadfunnel_core::{FunnelError, NotificationPayload};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Timeout for one e-mail API call.
const EMAIL_TIMEOUT: Duration = Duration::from_secs(15);

/// Delivers a lead summary to the operator.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn dispatch(&self, payload: &NotificationPayload) -> Result<(), FunnelError>;
}

/// Run one delivery attempt in the background.
///
/// The returned handle may be dropped; the task keeps running. Nothing is
/// reported back: errors end up in the log only.
pub fn spawn_dispatch(
    dispatcher: Arc<dyn NotificationDispatcher>,
    payload: NotificationPayload,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        match dispatcher.dispatch(&payload).await {
            Ok(()) => tracing::info!(
                event = "lead_notification_sent",
                subject = %payload.subject(),
                "Lead notification sent"
            ),
            Err(e) => tracing::error!(
                event = "lead_notification_failed",
                error = %e,
                "Failed to send lead notification"
            ),
        }
    })
}

// =============================================================================
// EMAILJS
// =============================================================================

#[derive(Debug, Serialize)]
struct EmailJsRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    #[serde(rename = "accessToken")]
    access_token: &'a str,
    template_params: &'a BTreeMap<&'static str, String>,
}

/// Dispatcher backed by the EmailJS REST API.
#[derive(Clone)]
pub struct EmailJsDispatcher {
    http: reqwest::Client,
    endpoint: String,
    credentials: EmailCredentials,
}

impl EmailJsDispatcher {
    pub fn new(endpoint: impl Into<String>, credentials: EmailCredentials) -> Result<Self, FunnelError> {
        let http = reqwest::Client::builder()
            .timeout(EMAIL_TIMEOUT)
            .build()
            .map_err(|e| FunnelError::Configuration(format!("HTTP client: {}", e)))?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            credentials,
        })
    }
}

#[async_trait]
impl NotificationDispatcher for EmailJsDispatcher {
    async fn dispatch(&self, payload: &NotificationPayload) -> Result<(), FunnelError> {
        let body = EmailJsRequest {
            service_id: &self.credentials.service_id,
            template_id: &self.credentials.template_id,
            user_id: &self.credentials.public_key,
            access_token: &self.credentials.private_key,
            template_params: payload.template_params(),
        };

        tracing::debug!(endpoint = %self.endpoint, "Sending lead notification via EmailJS");

        let resp = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| FunnelError::Notification(format!("EmailJS unreachable: {}", e)))?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), body = %text, "EmailJS response");

        if status.is_success() {
            Ok(())
        } else {
            Err(FunnelError::Notification(format!(
                "EmailJS returned {}: {}",
                status.as_u16(),
                text
            )))
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
