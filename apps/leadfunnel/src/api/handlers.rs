//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.

use super::{
    AppState,
    types::{FormResponse, HealthResponse, ValidateStepRequest, ValidateStepResponse},
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use leadfunnel_core::primitives::INVALID_FORM_MESSAGE;
use leadfunnel_core::{FunnelError, FunnelStep, RawLeadSubmission, SubmissionOutcome};

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// FORM HANDLERS
// =============================================================================

/// Describe the form steps and selectable options.
pub async fn form_handler() -> impl IntoResponse {
    Json(FormResponse::describe())
}

/// Validate the fields of one step.
pub async fn validate_step_handler(Json(request): Json<ValidateStepRequest>) -> impl IntoResponse {
    let Some(step) = FunnelStep::from_number(request.step) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ValidateStepResponse::error(format!(
                "Unknown step {}; expected 1..={}",
                request.step,
                FunnelStep::COUNT
            ))),
        );
    };

    let errors = request.fields.validate_fields(step.fields());
    (StatusCode::OK, Json(ValidateStepResponse::checked(errors)))
}

// =============================================================================
// SUBMIT HANDLER
// =============================================================================

/// HTTP status for a failed submission.
pub fn status_for(err: &FunnelError) -> StatusCode {
    match err {
        FunnelError::Validation { .. } => StatusCode::BAD_REQUEST,
        FunnelError::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
        FunnelError::Generation(_) | FunnelError::Notification(_) => StatusCode::BAD_GATEWAY,
    }
}

/// Submit a completed lead form.
///
/// A body that is not a lead record (bad JSON, wrong field types) still
/// gets a `SubmissionOutcome`. The operator notification runs detached;
/// its handle is dropped here.
pub async fn submit_handler(
    State(state): State<AppState>,
    payload: Result<Json<RawLeadSubmission>, JsonRejection>,
) -> impl IntoResponse {
    let raw = match payload {
        Ok(Json(raw)) => raw,
        Err(rejection) => {
            tracing::info!(
                event = "lead_rejected",
                status = rejection.status().as_u16(),
                reason = %rejection.body_text(),
                "Submission body is not a lead record"
            );
            let status = match rejection.status() {
                StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
                _ => StatusCode::BAD_REQUEST,
            };
            return (status, Json(SubmissionOutcome::failure(INVALID_FORM_MESSAGE)));
        }
    };

    match state.orchestrator.process(&raw).await {
        Ok(processed) => (StatusCode::OK, Json(processed.outcome)),
        Err(e) => (status_for(&e), Json(SubmissionOutcome::from_error(&e))),
    }
}
