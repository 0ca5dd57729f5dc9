//! Multi-model fallback for dashboard generation.
//!
//! Each configured model is tried once, in order. The first reply that
//! parses into a result with a non-empty dashboard wins; every other outcome
//! is recorded and the next model is tried.
//!
//! Attempts are pushed into a caller-owned [`AttemptLog`] as they start, so
//! the history survives (including the model still in flight) if the
//! caller's deadline cancels this future.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use super::client::{CompletionClient, ProviderError};
use super::schema::{self, ParseError};
use super::types::{ChatCompletionRequest, ConversionResult, Message};
use crate::config::ModelCandidates;

/// Sampling temperature: close to deterministic.
pub const TEMPERATURE: f32 = 0.1;

/// 64k output tokens, enough for large dashboards.
pub const MAX_TOKENS: u32 = 65_536;

/// Shared record of attempts made for one request.
pub type AttemptLog = Arc<Mutex<Vec<AttemptRecord>>>;

/// Create an empty attempt log.
pub fn new_attempt_log() -> AttemptLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// How a model attempt ended, or that it has not yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    InFlight,
    Succeeded,
    Failed(String),
}

/// One model attempt and how it ended.
#[derive(Debug, Clone)]
pub struct AttemptRecord {
    pub model: String,
    pub outcome: AttemptOutcome,
    /// Zero while the attempt is in flight.
    pub duration: Duration,
}

impl AttemptRecord {
    pub fn succeeded(&self) -> bool {
        self.outcome == AttemptOutcome::Succeeded
    }

    pub fn in_flight(&self) -> bool {
        self.outcome == AttemptOutcome::InFlight
    }

    /// The failure message, if the attempt failed.
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            AttemptOutcome::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Model names from an attempt log, in attempt order.
pub fn attempted_models(attempts: &AttemptLog) -> Vec<String> {
    attempts
        .lock()
        .map(|records| records.iter().map(|r| r.model.clone()).collect())
        .unwrap_or_default()
}

/// Model whose attempt was still running when the log was read.
pub fn in_flight_model(attempts: &AttemptLog) -> Option<String> {
    attempts.lock().ok().and_then(|records| {
        records
            .iter()
            .find(|r| r.in_flight())
            .map(|r| r.model.clone())
    })
}

/// Why a single model attempt was rejected.
#[derive(Debug, thiserror::Error)]
pub enum AttemptError {
    #[error("model {model} failed: {source}")]
    Provider {
        model: String,
        #[source]
        source: ProviderError,
    },

    #[error("no response from model {model}")]
    NoChoices { model: String },

    #[error("failed to parse response from {model}: {source}")]
    Parse {
        model: String,
        #[source]
        source: ParseError,
    },

    #[error("empty dashboard from model {model}")]
    EmptyDashboard { model: String },
}

/// Dashboard generation failure, after all candidates were tried.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("all models failed (tried: {}), last error: {last_error}", .attempted.join(", "))]
    Exhausted {
        attempted: Vec<String>,
        #[source]
        last_error: AttemptError,
    },
}

/// Generates dashboards by calling the configured models in priority order.
pub struct DashboardGenerator {
    client: Arc<dyn CompletionClient>,
    candidates: ModelCandidates,
    system_prompt: String,
}

impl DashboardGenerator {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        candidates: ModelCandidates,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            client,
            candidates,
            system_prompt: system_prompt.into(),
        }
    }

    pub fn candidates(&self) -> &ModelCandidates {
        &self.candidates
    }

    /// Build the request sent to `model`: system prompt, user metrics, schema.
    pub fn build_request(&self, model: &str, metrics: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: model.to_string(),
            messages: vec![
                Message::system(self.system_prompt.as_str()),
                Message::user(metrics),
            ],
            temperature: Some(TEMPERATURE),
            max_tokens: Some(MAX_TOKENS),
            response_format: Some(schema::response_format()),
        }
    }

    /// Generate a dashboard and alert rules for `metrics`.
    ///
    /// Every attempt is appended to `attempts` when it starts and updated
    /// when it ends.
    pub async fn generate(
        &self,
        metrics: &str,
        attempts: &AttemptLog,
    ) -> Result<ConversionResult, GenerateError> {
        tracing::info!(models = %self.candidates, "Models configured for fallback");

        let (first, rest) = self.candidates.split_first();
        let mut attempted = vec![first.to_string()];
        let mut last_error = match self.tracked_attempt(first, metrics, attempts).await {
            Ok(result) => return Ok(result),
            Err(e) => e,
        };

        for model in rest {
            attempted.push(model.clone());
            match self.tracked_attempt(model, metrics, attempts).await {
                Ok(result) => return Ok(result),
                Err(e) => last_error = e,
            }
        }

        Err(GenerateError::Exhausted {
            attempted,
            last_error,
        })
    }

    /// Run one model, recording it in `attempts` and logging the outcome.
    async fn tracked_attempt(
        &self,
        model: &str,
        metrics: &str,
        attempts: &AttemptLog,
    ) -> Result<ConversionResult, AttemptError> {
        tracing::info!(model = %model, max_tokens = MAX_TOKENS, "Trying model");

        let slot = attempts.lock().ok().map(|mut records| {
            records.push(AttemptRecord {
                model: model.to_string(),
                outcome: AttemptOutcome::InFlight,
                duration: Duration::ZERO,
            });
            records.len() - 1
        });

        let start = Instant::now();
        let outcome = self.attempt(model, metrics).await;
        let duration = start.elapsed();

        if let (Some(slot), Ok(mut records)) = (slot, attempts.lock()) {
            if let Some(record) = records.get_mut(slot) {
                record.outcome = match &outcome {
                    Ok(_) => AttemptOutcome::Succeeded,
                    Err(e) => AttemptOutcome::Failed(e.to_string()),
                };
                record.duration = duration;
            }
        }

        match &outcome {
            Ok(result) => tracing::info!(
                model = %model,
                duration_ms = duration.as_millis() as u64,
                dashboard_size = result.grafana_dashboard.len(),
                alerts_size = result.prometheus_alerts.len(),
                "Model succeeded"
            ),
            Err(e) => tracing::warn!(
                model = %model,
                error = %e,
                duration_ms = duration.as_millis() as u64,
                "Model failed"
            ),
        }

        outcome
    }

    /// Run one model and validate its reply.
    async fn attempt(&self, model: &str, metrics: &str) -> Result<ConversionResult, AttemptError> {
        let request = self.build_request(model, metrics);

        let response = self
            .client
            .complete(&request)
            .await
            .map_err(|source| AttemptError::Provider {
                model: model.to_string(),
                source,
            })?;

        let content = response
            .first_content()
            .ok_or_else(|| AttemptError::NoChoices {
                model: model.to_string(),
            })?;
        tracing::debug!(model = %model, response_length = content.len(), "AI response received");

        let result = schema::parse_conversion(content).map_err(|source| AttemptError::Parse {
            model: model.to_string(),
            source,
        })?;

        if result.grafana_dashboard.is_empty() {
            return Err(AttemptError::EmptyDashboard {
                model: model.to_string(),
            });
        }

        Ok(result)
    }
}
