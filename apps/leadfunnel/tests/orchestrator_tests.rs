//! Integration tests for the submission orchestrator and its HTTP clients.
//!
//! The Gemini and EmailJS clients are pointed at a local axum server that
//! records what it receives.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use async_trait::async_trait;
use axum::{Json, Router, extract::State, http::HeaderMap, http::StatusCode, routing::post};
use leadfunnel::config::{AppConfig, ModelConfig};
use leadfunnel::services::{
    AssessmentGenerator, EmailJsDispatcher, GeminiGenerator, NotificationDispatcher,
    SubmissionOrchestrator, spawn_dispatch,
};
use leadfunnel_core::primitives::{CALL_TO_ACTION, REQUIRED_MESSAGE};
use leadfunnel_core::{
    AssessmentRequest, AssessmentResult, FunnelError, NotificationPayload, RawLeadSubmission,
};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// =============================================================================
// MOCK PROVIDER
// =============================================================================

#[derive(Clone, Default)]
struct Recorded {
    bodies: Arc<Mutex<Vec<Value>>>,
    api_keys: Arc<Mutex<Vec<String>>>,
}

/// Answer every model call with the given status and JSON text part.
async fn spawn_provider(status: StatusCode, model_text: &'static str) -> (String, Recorded) {
    let recorded = Recorded::default();

    let app = Router::new()
        .route(
            "/v1beta/models/{call}",
            post(
                move |State(rec): State<Recorded>, headers: HeaderMap, Json(body): Json<Value>| async move {
                    if let Some(key) = headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()) {
                        rec.api_keys.lock().unwrap().push(key.to_string());
                    }
                    rec.bodies.lock().unwrap().push(body);
                    let reply = json!({ "candidates": [{ "content": { "parts": [{ "text": model_text }] } }] });
                    (status, Json(reply))
                },
            ),
        )
        .route(
            "/email/send",
            post(move |State(rec): State<Recorded>, Json(body): Json<Value>| async move {
                rec.bodies.lock().unwrap().push(body);
                (status, "OK")
            }),
        )
        .with_state(recorded.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), recorded)
}

const MODEL_OK: &str =
    r#"{"maturityLevel":"Intermediate","suggestedSolutions":"Do X.","suggestedTactics":"Do Y."}"#;

fn model_config(endpoint: &str) -> ModelConfig {
    ModelConfig {
        api_key: Some("test-key".to_string()),
        endpoint: endpoint.to_string(),
        timeout_secs: 5,
        ..ModelConfig::default()
    }
}

fn lead(budget: &str) -> RawLeadSubmission {
    serde_json::from_value(json!({
        "name": "John",
        "email": "john@acme.io",
        "companyName": "Acme",
        "challenge": "sales-conversion",
        "monthlyBudget": budget,
        "businessDescription": "We sell widgets to small shops.",
        "marketingEfforts": "Some Facebook ads and a newsletter.",
        "marketingGoals": "Close more deals from demo calls."
    }))
    .unwrap()
}

// =============================================================================
// STUBS
// =============================================================================

#[derive(Default)]
struct CountingGenerator {
    calls: AtomicUsize,
}

#[async_trait]
impl AssessmentGenerator for CountingGenerator {
    async fn generate(&self, _request: &AssessmentRequest) -> Result<AssessmentResult, FunnelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(AssessmentResult::new("Advanced", "Scale.", "Test."))
    }
}

struct FailingNotifier {
    calls: AtomicUsize,
}

#[async_trait]
impl NotificationDispatcher for FailingNotifier {
    async fn dispatch(&self, _payload: &NotificationPayload) -> Result<(), FunnelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(FunnelError::Notification("provider rejected the send".to_string()))
    }
}

// =============================================================================
// ORCHESTRATOR
// =============================================================================

#[tokio::test]
async fn notification_failure_does_not_change_outcome() {
    let notifier = Arc::new(FailingNotifier {
        calls: AtomicUsize::new(0),
    });
    let orchestrator = SubmissionOrchestrator::new(
        Some(Arc::new(CountingGenerator::default()) as Arc<dyn AssessmentGenerator>),
        Some(notifier.clone() as Arc<dyn NotificationDispatcher>),
    );

    let processed = orchestrator.process(&lead("5000-10000")).await.unwrap();
    assert!(processed.outcome.success);
    assert!(processed.outcome.contact_will_be_made);

    processed.notification.unwrap().await.unwrap();
    assert_eq!(notifier.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn gated_submission_starts_no_notification() {
    let generator = Arc::new(CountingGenerator::default());
    let orchestrator = SubmissionOrchestrator::new(
        Some(generator.clone() as Arc<dyn AssessmentGenerator>),
        Some(Arc::new(FailingNotifier {
            calls: AtomicUsize::new(0),
        }) as Arc<dyn NotificationDispatcher>),
    );

    let processed = orchestrator.process(&lead("<1500")).await.unwrap();
    assert!(processed.notification.is_none());
    assert!(!processed.outcome.contact_will_be_made);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn submit_folds_errors_into_outcome() {
    let orchestrator = SubmissionOrchestrator::new(None, None);

    let outcome = orchestrator.submit(&RawLeadSubmission::default()).await;
    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some(REQUIRED_MESSAGE));
    assert!(outcome.is_well_formed());
}

#[tokio::test]
async fn from_config_without_credentials_wires_nothing() {
    let orchestrator = SubmissionOrchestrator::from_config(&AppConfig::default()).unwrap();
    assert!(!orchestrator.has_generator());
    assert!(!orchestrator.has_notifier());
}

// =============================================================================
// GEMINI CLIENT
// =============================================================================

#[tokio::test]
async fn gemini_sends_prompt_and_schema() {
    let (endpoint, recorded) = spawn_provider(StatusCode::OK, MODEL_OK).await;
    let generator = GeminiGenerator::new(&model_config(&endpoint), "test-key").unwrap();
    let request = AssessmentRequest::from_submission(&lead("1500-5000").validate().unwrap());

    let result = generator.generate(&request).await.unwrap();
    assert_eq!(result, AssessmentResult::new("Intermediate", "Do X.", "Do Y."));

    let bodies = recorded.bodies.lock().unwrap();
    let body = &bodies[0];
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("Acme"));
    assert!(prompt.contains(r#"Primary challenge is "sales-conversion""#));
    assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
    assert_eq!(recorded.api_keys.lock().unwrap().as_slice(), ["test-key"]);
}

#[tokio::test]
async fn gemini_error_status_is_generation_error() {
    let (endpoint, _) = spawn_provider(StatusCode::INTERNAL_SERVER_ERROR, MODEL_OK).await;
    let generator = GeminiGenerator::new(&model_config(&endpoint), "test-key").unwrap();
    let request = AssessmentRequest::from_submission(&lead("1500-5000").validate().unwrap());

    let err = generator.generate(&request).await.unwrap_err();
    assert!(matches!(err, FunnelError::Generation(_)));
}

#[tokio::test]
async fn gemini_slow_provider_times_out() {
    let app = Router::new().route(
        "/v1beta/models/{call}",
        post(|| async {
            tokio::time::sleep(std::time::Duration::from_secs(3)).await;
            Json(json!({ "candidates": [{ "content": { "parts": [{ "text": MODEL_OK }] } }] }))
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = ModelConfig {
        timeout_secs: 1,
        ..model_config(&endpoint)
    };
    let generator = GeminiGenerator::new(&config, "test-key").unwrap();
    let request = AssessmentRequest::from_submission(&lead("1500-5000").validate().unwrap());

    let started = std::time::Instant::now();
    let err = generator.generate(&request).await.unwrap_err();
    assert_eq!(err, FunnelError::Generation("Model call timed out after 1s".to_string()));
    assert!(started.elapsed() < std::time::Duration::from_secs(3));
}

#[tokio::test]
async fn gemini_null_output_is_generation_error() {
    let (endpoint, _) = spawn_provider(StatusCode::OK, "null").await;
    let generator = GeminiGenerator::new(&model_config(&endpoint), "test-key").unwrap();
    let request = AssessmentRequest::from_submission(&lead("1500-5000").validate().unwrap());

    assert!(generator.generate(&request).await.is_err());
}

#[tokio::test]
async fn end_to_end_through_mock_provider() {
    let (endpoint, recorded) = spawn_provider(StatusCode::OK, MODEL_OK).await;
    let config = AppConfig::default()
        .with_overrides(|key| match key {
            "GOOGLE_API_KEY" => Some("test-key".to_string()),
            "LEADFUNNEL_MODEL_ENDPOINT" => Some(endpoint.clone()),
            "EMAILJS_SERVICE_ID" => Some("svc".to_string()),
            "EMAILJS_TEMPLATE_ID" => Some("tpl".to_string()),
            "EMAILJS_PUBLIC_KEY" => Some("pub".to_string()),
            "EMAILJS_PRIVATE_KEY" => Some("priv".to_string()),
            "LEADFUNNEL_EMAIL_ENDPOINT" => Some(format!("{endpoint}/email/send")),
            _ => None,
        })
        .unwrap();
    let orchestrator = SubmissionOrchestrator::from_config(&config).unwrap();

    let processed = orchestrator.process(&lead("1500-5000")).await.unwrap();
    processed.notification.unwrap().await.unwrap();

    let data = processed.outcome.data.unwrap();
    assert_eq!(data.suggested_solutions, format!("Do X.{CALL_TO_ACTION}"));

    let bodies = recorded.bodies.lock().unwrap();
    assert_eq!(bodies.len(), 2);
    let email = &bodies[1];
    assert_eq!(email["service_id"], "svc");
    assert_eq!(email["accessToken"], "priv");
    assert_eq!(email["template_params"]["company_name"], "Acme");
    assert_eq!(email["template_params"]["maturity_level"], "Intermediate");
}

// =============================================================================
// EMAILJS CLIENT
// =============================================================================

#[tokio::test]
async fn emailjs_rejection_is_notification_error() {
    let (endpoint, _) = spawn_provider(StatusCode::FORBIDDEN, MODEL_OK).await;
    let config = AppConfig::default()
        .with_overrides(|key| match key {
            "EMAILJS_SERVICE_ID" | "EMAILJS_TEMPLATE_ID" | "EMAILJS_PUBLIC_KEY"
            | "EMAILJS_PRIVATE_KEY" => Some("x".to_string()),
            _ => None,
        })
        .unwrap();
    let dispatcher = EmailJsDispatcher::new(
        format!("{endpoint}/email/send"),
        config.email.credentials().unwrap(),
    )
    .unwrap();
    let lead = lead("1500-5000").validate().unwrap();
    let payload = NotificationPayload::new(&lead, &AssessmentResult::new("Advanced", "S", "T"));

    let err = dispatcher.dispatch(&payload).await.unwrap_err();
    assert!(matches!(err, FunnelError::Notification(_)));

    // Detached dispatch swallows the same failure.
    spawn_dispatch(Arc::new(dispatcher), payload).await.unwrap();
}
