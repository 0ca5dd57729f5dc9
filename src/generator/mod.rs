//! Dashboard generation.
//!
//! This module turns raw metric samples into a Grafana dashboard and
//! Prometheus alert rules by asking a chat completion model, with fallback
//! across a priority-ordered list of models.

pub mod client;
mod fallback;
pub mod prompt;
pub mod schema;
pub mod types;

pub use client::{CompletionClient, OpenAiClient, ProviderError};
pub use fallback::{
    attempted_models, in_flight_model, new_attempt_log, AttemptError, AttemptLog,
    AttemptOutcome, AttemptRecord, DashboardGenerator, GenerateError, MAX_TOKENS, TEMPERATURE,
};
pub use types::ConversionResult;
