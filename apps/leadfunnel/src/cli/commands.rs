//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use super::CliError;
use crate::api;
use crate::config::AppConfig;
use crate::services::SubmissionOrchestrator;
use leadfunnel_core::{
    Challenge, FunnelForm, FunnelState, LeadField, MonthlyBudget, RawLeadSubmission,
    SubmissionOutcome, TransitionError, render_outcome,
};
use std::io::Write;
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Maximum size of a lead file for `assess` (1 MB).
const MAX_LEAD_FILE_SIZE: u64 = 1024 * 1024;

// =============================================================================
// SERVE COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_serve(
    mut config: AppConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), CliError> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let orchestrator = SubmissionOrchestrator::from_config(&config)?;

    println!("Lead Funnel Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:          {}", config.server.host);
    println!("  Port:          {}", config.server.port);
    println!("  Model:         {}", config.model.model);
    println!("  Assessments:   {}", enabled(orchestrator.has_generator()));
    println!("  Notifications: {}", enabled(orchestrator.has_notifier()));
    println!();
    println!("Endpoints:");
    println!("  GET  /health        - Health check");
    println!("  GET  /form          - Form definition");
    println!("  POST /form/validate - Validate one step");
    println!("  POST /submit        - Submit a lead");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(&config.server, orchestrator).await?;
    Ok(())
}

fn enabled(on: bool) -> &'static str {
    if on { "enabled" } else { "disabled (credentials missing)" }
}

// =============================================================================
// ASSESS COMMAND
// =============================================================================

/// Read a lead from a JSON file.
pub fn read_lead_file(path: &Path) -> Result<RawLeadSubmission, CliError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| CliError::Io(format!("Cannot read '{}': {}", path.display(), e)))?;
    if !metadata.is_file() {
        return Err(CliError::Input(format!("'{}' is not a regular file", path.display())));
    }
    if metadata.len() > MAX_LEAD_FILE_SIZE {
        return Err(CliError::Input(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            MAX_LEAD_FILE_SIZE
        )));
    }

    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|e| CliError::Input(format!("Invalid lead JSON: {}", e)))
}

/// Submit one lead and print the outcome.
///
/// Unlike the server, the command waits for the operator notification to
/// finish so the process does not exit underneath it.
pub async fn cmd_assess(config: &AppConfig, file: &Path, json_mode: bool) -> Result<(), CliError> {
    let raw = read_lead_file(file)?;
    let orchestrator = SubmissionOrchestrator::from_config(config)?;

    let outcome = match orchestrator.process(&raw).await {
        Ok(processed) => {
            if let Some(handle) = processed.notification {
                if let Err(e) = handle.await {
                    tracing::warn!("Notification task ended abnormally: {}", e);
                }
            }
            processed.outcome
        }
        Err(e) => SubmissionOutcome::from_error(&e),
    };

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&outcome).unwrap_or_default()
        );
    } else {
        print!("{}", render_outcome(&outcome));
    }
    Ok(())
}

// =============================================================================
// INTERVIEW COMMAND
// =============================================================================

/// Walk through the form on stdin/stdout.
pub async fn cmd_interview(config: &AppConfig) -> Result<(), CliError> {
    let orchestrator = SubmissionOrchestrator::from_config(config)?;
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    run_interview(&orchestrator, stdin, &mut stdout).await?;
    Ok(())
}

/// Drive a [`FunnelForm`] from line input.
///
/// Typing `:back` returns to the previous step, `:quit` (or end of input)
/// stops. After a result the prospect may start over. Returns the outcome
/// of the last submission, if any.
pub async fn run_interview<R, W>(
    orchestrator: &SubmissionOrchestrator,
    input: R,
    out: &mut W,
) -> Result<Option<SubmissionOutcome>, CliError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut form = FunnelForm::new();
    let mut last = None;

    writeln!(out, "Type :back to return to the previous step, :quit to stop.")?;

    loop {
        let step = match form.state().clone() {
            FunnelState::Collecting(step) => step,
            FunnelState::Submitting => {
                return Err(CliError::Input("form left in submitting state".to_string()));
            }
            FunnelState::ShowingResult { .. } | FunnelState::ShowingError(_) => {
                writeln!(out, "Start a new analysis? [y/N]")?;
                let again = lines.next_line().await?.unwrap_or_default();
                if again.trim().eq_ignore_ascii_case("y") {
                    form.reset();
                    continue;
                }
                return Ok(last);
            }
        };

        writeln!(out)?;
        writeln!(out, "Step {} ({}%)", step, form.progress_percent())?;

        let mut went_back = false;
        for field in step.fields() {
            print_prompt(out, &form, *field)?;
            let Some(line) = lines.next_line().await? else {
                return Ok(last);
            };
            match line.trim() {
                ":quit" => return Ok(last),
                ":back" => {
                    form.back().map_err(transition)?;
                    went_back = true;
                    break;
                }
                answer => {
                    let value = resolve_choice(*field, answer);
                    form.set_field(*field, value).map_err(transition)?;
                }
            }
        }
        if went_back {
            continue;
        }

        let advanced = if step.is_last() {
            form.begin_submit().map(Some)
        } else {
            form.next().map(|_| None)
        };

        match advanced {
            Ok(Some(raw)) => {
                writeln!(out, "Analyzing your business...")?;
                let outcome = match orchestrator.process(&raw).await {
                    Ok(processed) => {
                        if let Some(handle) = processed.notification {
                            handle.await.ok();
                        }
                        processed.outcome
                    }
                    Err(e) => SubmissionOutcome::from_error(&e),
                };
                write!(out, "{}", render_outcome(&outcome))?;
                form.complete(outcome.clone()).map_err(transition)?;
                last = Some(outcome);
            }
            Ok(None) => {}
            Err(TransitionError::InvalidStep { errors, .. }) => {
                for err in errors {
                    writeln!(out, "  ! {}", err.message)?;
                }
            }
            Err(other) => return Err(transition(other)),
        }
    }
}

fn transition(err: TransitionError) -> CliError {
    CliError::Input(err.to_string())
}

fn print_prompt<W: Write>(out: &mut W, form: &FunnelForm, field: LeadField) -> std::io::Result<()> {
    writeln!(out, "{}", field.label())?;
    match field {
        LeadField::Challenge => {
            for (i, c) in Challenge::ALL.iter().enumerate() {
                writeln!(out, "  {}) {}", i + 1, c.label())?;
            }
        }
        LeadField::MonthlyBudget => {
            for (i, b) in MonthlyBudget::ALL.iter().enumerate() {
                writeln!(out, "  {}) {}", i + 1, b.label())?;
            }
        }
        LeadField::MarketingGoals => writeln!(out, "  ({})", form.goals_placeholder())?,
        _ => {}
    }
    write!(out, "> ")?;
    out.flush()
}

/// Map a numbered menu answer to its wire value; anything else is kept as typed.
fn resolve_choice(field: LeadField, answer: &str) -> String {
    let index = answer.parse::<usize>().ok().and_then(|n| n.checked_sub(1));
    let chosen = match field {
        LeadField::Challenge => index.and_then(|i| Challenge::ALL.get(i)).map(|c| c.as_str()),
        LeadField::MonthlyBudget => index.and_then(|i| MonthlyBudget::ALL.get(i)).map(|b| b.as_str()),
        _ => None,
    };
    chosen.unwrap_or(answer).to_string()
}

// =============================================================================
// CONFIG COMMAND
// =============================================================================

/// Show configuration with secrets redacted.
pub fn cmd_config(config: &AppConfig, json_mode: bool) -> Result<(), CliError> {
    let model_key = config.model.api_key().is_some();
    let email = config.email.presence();

    if json_mode {
        let credentials: serde_json::Map<String, serde_json::Value> = std::iter::once(("GOOGLE_API_KEY", model_key))
            .chain(email)
            .map(|(k, v)| (k.to_string(), serde_json::Value::Bool(v)))
            .collect();
        let output = serde_json::json!({
            "server": { "host": config.server.host, "port": config.server.port, "rate_limit": config.server.rate_limit },
            "model": { "name": config.model.model, "endpoint": config.model.endpoint, "timeout_secs": config.model.timeout_secs },
            "email_endpoint": config.email.endpoint,
            "credentials": credentials,
            "assessments_enabled": model_key,
            "notifications_enabled": config.email.credentials().is_some(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Lead Funnel Configuration");
    println!("=========================");
    println!("Server:   {}:{}", config.server.host, config.server.port);
    println!("Rate:     {} req/s", config.server.rate_limit);
    println!("Model:    {} ({})", config.model.model, config.model.endpoint);
    println!("Timeout:  {}s", config.model.timeout_secs);
    println!();
    println!("Credentials:");
    println!("  GOOGLE_API_KEY       {}", present(model_key));
    for (key, set) in email {
        println!("  {:<20} {}", key, present(set));
    }

    Ok(())
}

fn present(set: bool) -> &'static str {
    if set { "set" } else { "missing" }
}
