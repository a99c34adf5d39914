//! Integration tests for the lead funnel HTTP API.
//!
//! Uses axum-test to test the API handlers without starting a real server.
//! The model and e-mail provider are replaced by in-process stubs.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use leadfunnel::api::{
    AppState, FormResponse, HealthResponse, ValidateStepResponse, create_router,
};
use leadfunnel::config::ServerConfig;
use leadfunnel::services::{AssessmentGenerator, NotificationDispatcher, SubmissionOrchestrator};
use leadfunnel_core::primitives::{
    BASIC_MATURITY_LEVEL, CALL_TO_ACTION, GENERATION_FAILED_MESSAGE, INVALID_FORM_MESSAGE,
    SERVICE_UNAVAILABLE_MESSAGE,
};
use leadfunnel_core::{
    AssessmentRequest, AssessmentResult, FunnelError, NotificationPayload, SubmissionOutcome,
};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

// =============================================================================
// STUBS
// =============================================================================

#[derive(Default)]
struct StubGenerator {
    calls: AtomicUsize,
    fail: bool,
}

#[async_trait]
impl AssessmentGenerator for StubGenerator {
    async fn generate(&self, _request: &AssessmentRequest) -> Result<AssessmentResult, FunnelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(FunnelError::Generation("upstream returned 500".to_string()));
        }
        Ok(AssessmentResult::new("Intermediate", "Do X.", "Do Y."))
    }
}

#[derive(Default)]
struct StubNotifier {
    calls: AtomicUsize,
}

#[async_trait]
impl NotificationDispatcher for StubNotifier {
    async fn dispatch(&self, _payload: &NotificationPayload) -> Result<(), FunnelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

fn unlimited() -> ServerConfig {
    ServerConfig {
        rate_limit: 0,
        ..ServerConfig::default()
    }
}

fn server_with(orchestrator: SubmissionOrchestrator, config: &ServerConfig) -> TestServer {
    TestServer::new(create_router(AppState::new(orchestrator), config)).unwrap()
}

/// Server with a working generator and notifier; the stubs are returned for
/// call counting.
fn create_test_server() -> (TestServer, Arc<StubGenerator>, Arc<StubNotifier>) {
    let generator = Arc::new(StubGenerator::default());
    let notifier = Arc::new(StubNotifier::default());
    let orchestrator = SubmissionOrchestrator::new(
        Some(generator.clone() as Arc<dyn AssessmentGenerator>),
        Some(notifier.clone() as Arc<dyn NotificationDispatcher>),
    );
    (server_with(orchestrator, &unlimited()), generator, notifier)
}

fn valid_lead(budget: &str) -> Value {
    json!({
        "name": "John",
        "email": "john@acme.io",
        "companyName": "Acme",
        "challenge": "lead-generation",
        "monthlyBudget": budget,
        "businessDescription": "We sell widgets to small shops.",
        "marketingEfforts": "Some Facebook ads and a newsletter.",
        "marketingGoals": "Double qualified leads in six months."
    })
}

// =============================================================================
// HEALTH AND FORM ENDPOINTS
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (server, _, _) = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_form_describes_six_steps_and_options() {
    let (server, _, _) = create_test_server();

    let response = server.get("/form").await;

    response.assert_status_ok();
    let form: FormResponse = response.json();
    assert_eq!(form.steps.len(), 6);
    assert_eq!(form.steps[0].fields.len(), 3);
    assert_eq!(form.challenges.len(), 4);
    assert!(form.budgets.iter().any(|b| b.value == "<1500"));
}

#[tokio::test]
async fn test_validate_step_reports_field_errors() {
    let (server, _, _) = create_test_server();

    let response = server
        .post("/form/validate")
        .json(&json!({ "step": 1, "fields": { "name": "J", "email": "bad", "companyName": "Acme" } }))
        .await;

    response.assert_status_ok();
    let body: ValidateStepResponse = response.json();
    assert!(!body.valid);
    assert_eq!(body.errors.len(), 2);
    assert_eq!(body.errors[0].message, "Name must be at least 2 characters.");
    assert_eq!(body.errors[1].message, "Please enter a valid email.");
}

#[tokio::test]
async fn test_validate_step_accepts_valid_step() {
    let (server, _, _) = create_test_server();

    let response = server
        .post("/form/validate")
        .json(&json!({ "step": 2, "fields": { "challenge": "brand-awareness" } }))
        .await;

    let body: ValidateStepResponse = response.json();
    assert!(body.valid);
    assert!(body.errors.is_empty());
}

#[tokio::test]
async fn test_validate_unknown_step_is_bad_request() {
    let (server, _, _) = create_test_server();

    let response = server
        .post("/form/validate")
        .json(&json!({ "step": 7, "fields": {} }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: ValidateStepResponse = response.json();
    assert!(body.error.is_some());
}

// =============================================================================
// SUBMIT ENDPOINT
// =============================================================================

#[tokio::test]
async fn test_submit_qualified_lead_appends_call_to_action() {
    let (server, generator, notifier) = create_test_server();

    let response = server.post("/submit").json(&valid_lead("1500-5000")).await;

    response.assert_status_ok();
    let outcome: SubmissionOutcome = response.json();
    assert!(outcome.success);
    assert!(outcome.contact_will_be_made);
    let data = outcome.data.unwrap();
    assert_eq!(data.maturity_level, "Intermediate");
    assert_eq!(data.suggested_solutions, format!("Do X.{CALL_TO_ACTION}"));
    assert_eq!(data.suggested_tactics, format!("Do Y.{CALL_TO_ACTION}"));
    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);

    // The notification is detached; give it a moment to run.
    for _ in 0..50 {
        if notifier.calls.load(Ordering::SeqCst) == 1 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert_eq!(notifier.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_submit_uses_camel_case_wire_names() {
    let (server, _, _) = create_test_server();

    let response = server.post("/submit").json(&valid_lead(">10000")).await;

    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["contactWillBeMade"], true);
    assert!(body["data"]["maturityLevel"].is_string());
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_submit_low_budget_gets_basic_analysis() {
    let (server, generator, notifier) = create_test_server();

    let response = server.post("/submit").json(&valid_lead("<1500")).await;

    response.assert_status_ok();
    let outcome: SubmissionOutcome = response.json();
    assert!(outcome.success);
    assert!(!outcome.contact_will_be_made);
    assert_eq!(outcome.data.unwrap().maturity_level, BASIC_MATURITY_LEVEL);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    assert_eq!(notifier.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_submit_invalid_lead_is_bad_request() {
    let (server, generator, _) = create_test_server();
    let mut lead = valid_lead("1500-5000");
    lead["email"] = json!("not-an-email");

    let response = server.post("/submit").json(&lead).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let outcome: SubmissionOutcome = response.json();
    assert!(!outcome.success);
    assert!(outcome.data.is_none());
    assert_eq!(outcome.error.as_deref(), Some("Please enter a valid email."));
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_submit_wrong_field_type_returns_outcome() {
    let (server, generator, _) = create_test_server();

    let response = server
        .post("/submit")
        .json(&json!({ "name": 5, "email": "john@x.com" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let outcome: SubmissionOutcome = response.json();
    assert!(!outcome.success);
    assert!(!outcome.contact_will_be_made);
    assert!(outcome.is_well_formed());
    assert_eq!(outcome.error.as_deref(), Some(INVALID_FORM_MESSAGE));
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_submit_malformed_json_returns_outcome() {
    let (server, _, _) = create_test_server();

    let response = server
        .post("/submit")
        .bytes(axum::body::Bytes::from_static(b"{\"name\": "))
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let outcome: SubmissionOutcome = response.json();
    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some(INVALID_FORM_MESSAGE));
}

#[tokio::test]
async fn test_submit_without_model_credential_is_unavailable() {
    let server = server_with(SubmissionOrchestrator::new(None, None), &unlimited());

    let response = server.post("/submit").json(&valid_lead("5000-10000")).await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let outcome: SubmissionOutcome = response.json();
    assert!(!outcome.success);
    assert!(!outcome.contact_will_be_made);
    assert_eq!(outcome.error.as_deref(), Some(SERVICE_UNAVAILABLE_MESSAGE));
}

#[tokio::test]
async fn test_submit_low_budget_needs_no_credentials() {
    let server = server_with(SubmissionOrchestrator::new(None, None), &unlimited());

    let response = server.post("/submit").json(&valid_lead("<1500")).await;

    response.assert_status_ok();
    let outcome: SubmissionOutcome = response.json();
    assert!(outcome.success);
}

#[tokio::test]
async fn test_submit_generation_failure_is_bad_gateway() {
    let generator = Arc::new(StubGenerator {
        fail: true,
        ..StubGenerator::default()
    });
    let notifier = Arc::new(StubNotifier::default());
    let orchestrator = SubmissionOrchestrator::new(
        Some(generator as Arc<dyn AssessmentGenerator>),
        Some(notifier.clone() as Arc<dyn NotificationDispatcher>),
    );
    let server = server_with(orchestrator, &unlimited());

    let response = server.post("/submit").json(&valid_lead("1500-5000")).await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let outcome: SubmissionOutcome = response.json();
    assert_eq!(outcome.error.as_deref(), Some(GENERATION_FAILED_MESSAGE));
    assert!(!outcome.contact_will_be_made);
    assert_eq!(notifier.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_submit_without_notifier_still_succeeds() {
    let generator = Arc::new(StubGenerator::default());
    let orchestrator =
        SubmissionOrchestrator::new(Some(generator as Arc<dyn AssessmentGenerator>), None);
    let server = server_with(orchestrator, &unlimited());

    let response = server.post("/submit").json(&valid_lead("1500-5000")).await;

    response.assert_status_ok();
    let outcome: SubmissionOutcome = response.json();
    assert!(outcome.success);
    assert!(!outcome.contact_will_be_made);
}

// =============================================================================
// MIDDLEWARE
// =============================================================================

#[tokio::test]
async fn test_rate_limit_rejects_burst() {
    let config = ServerConfig {
        rate_limit: 1,
        ..ServerConfig::default()
    };
    let server = server_with(SubmissionOrchestrator::new(None, None), &config);

    let first = server.get("/health").await;
    first.assert_status_ok();

    let second = server.get("/health").await;
    second.assert_status(StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let (server, generator, _) = create_test_server();
    let mut lead = valid_lead("1500-5000");
    lead["businessDescription"] = json!("x".repeat(128 * 1024));

    let response = server.post("/submit").json(&lead).await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    let outcome: SubmissionOutcome = response.json();
    assert_eq!(outcome.error.as_deref(), Some(INVALID_FORM_MESSAGE));
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}
