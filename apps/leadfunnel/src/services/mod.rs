//! # Services
//!
//! The async side of a submission: the remote model, the operator e-mail,
//! and the orchestrator that sequences them around the core rules.

pub mod generator;
pub mod notifier;
pub mod orchestrator;

pub use generator::{AssessmentGenerator, GeminiGenerator, output_schema, parse_generation};
pub use notifier::{EmailJsDispatcher, NotificationDispatcher, spawn_dispatch};
pub use orchestrator::{Processed, SubmissionOrchestrator};
