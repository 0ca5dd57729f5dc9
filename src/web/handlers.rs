//! HTTP request handlers.

use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, State},
    http::{header, Method, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Json,
};

use super::assets;
use super::server::AppState;
use super::types::{ConvertRequest, HealthResponse};
use crate::error::Error;
use crate::generator::{attempted_models, in_flight_model, new_attempt_log, ConversionResult};

/// Handle POST /convert
///
/// Validation short-circuits in order: body size, JSON shape, empty metrics.
/// The generator then runs under the state's deadline.
pub async fn convert(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ConversionResult>, Error> {
    let start = Instant::now();
    tracing::info!("Handling convert request");

    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            tracing::error!(error = %rejection.body_text(), "Request body too large");
            Error::PayloadTooLarge
        } else {
            tracing::error!(error = %rejection.body_text(), "Failed to read request body");
            Error::InvalidBody
        }
    })?;

    let request: ConvertRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::error!(error = %e, "Failed to decode request body");
        Error::InvalidBody
    })?;

    if request.metrics.trim().is_empty() {
        tracing::debug!("Empty metrics provided");
        return Err(Error::EmptyMetrics);
    }

    tracing::info!(metrics_length = request.metrics.len(), "Request validated");

    let attempts = new_attempt_log();
    let outcome = tokio::time::timeout(
        state.request_timeout,
        state.generator.generate(&request.metrics, &attempts),
    )
    .await;

    match outcome {
        Err(_) => {
            tracing::error!(
                timeout_ms = state.request_timeout.as_millis() as u64,
                attempted = ?attempted_models(&attempts),
                in_flight = ?in_flight_model(&attempts),
                "API request timeout"
            );
            Err(Error::Timeout)
        }
        Ok(Err(e)) => {
            tracing::error!(error = %e, "AI generation failed");
            Err(Error::Generation(e))
        }
        Ok(Ok(result)) => {
            tracing::info!(
                dashboard_size = result.grafana_dashboard.len(),
                alerts_size = result.prometheus_alerts.len(),
                total_duration_ms = start.elapsed().as_millis() as u64,
                "Request completed successfully"
            );
            Ok(Json(result))
        }
    }
}

/// Any method other than POST on /convert.
pub async fn method_not_allowed(method: Method) -> Error {
    tracing::debug!(method = %method, "Invalid method");
    Error::MethodNotAllowed
}

/// Handle GET /
pub async fn index() -> Html<&'static str> {
    Html(assets::INDEX_HTML)
}

/// Handle GET /static/*path
pub async fn static_asset(Path(path): Path<String>) -> Result<Response, Error> {
    let asset = assets::lookup(&path).ok_or(Error::NotFound)?;
    Ok(([(header::CONTENT_TYPE, asset.content_type())], asset.body).into_response())
}

/// Handle GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        models: state.generator.candidates().as_slice().to_vec(),
    })
}

/// Unknown routes.
pub async fn not_found(uri: Uri) -> Error {
    tracing::debug!(path = %uri.path(), "No route");
    Error::NotFound
}
