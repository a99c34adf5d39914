//! # Lead Funnel - Marketing Maturity Assessments
//!
//! The main binary for the landing page lead funnel.
//!
//! This application provides:
//! - HTTP REST API server (axum-based) for the multi-step form
//! - CLI interface for one-off assessments and a terminal interview
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                   apps/leadfunnel (THE BINARY)                  │
//! │                                                                 │
//! │  ┌─────────────┐    ┌─────────────┐    ┌──────────────────┐   │
//! │  │   CLI       │    │   HTTP API  │    │   Orchestrator   │   │
//! │  │  (clap)     │    │   (axum)    │    │ (model + e-mail) │   │
//! │  └──────┬──────┘    └──────┬──────┘    └────────┬─────────┘   │
//! │         │                  │                    │              │
//! │         └──────────────────┼────────────────────┘              │
//! │                            ▼                                   │
//! │                  ┌──────────────────┐                          │
//! │                  │ leadfunnel-core  │                          │
//! │                  │  (THE RULES)     │                          │
//! │                  └──────────────────┘                          │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! GOOGLE_API_KEY=... leadfunnel serve --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! leadfunnel config
//! leadfunnel assess -f lead.json
//! leadfunnel interview
//! ```

use clap::Parser;
use leadfunnel::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // LEADFUNNEL_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("LEADFUNNEL_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "leadfunnel=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the startup banner.
fn print_banner() {
    println!(
        r#"
  Lead Funnel v{}

  Marketing maturity assessments for landing page leads
"#,
        env!("CARGO_PKG_VERSION")
    );
}
