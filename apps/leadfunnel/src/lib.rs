//! # leadfunnel
//!
//! Library half of the lead funnel binary: configuration, the submission
//! services, the HTTP API and the CLI. `main.rs` only sets up logging and
//! dispatches to [`cli::execute`].

pub mod api;
pub mod cli;
pub mod config;
pub mod services;
