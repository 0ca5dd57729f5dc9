//! Structured output schema for the conversion result.
//!
//! The schema is sent in non-strict mode, so providers treat it as guidance.
//! Parsing on our side is strict: both fields must be present as strings.
//! The only repair applied is removing a Markdown code fence that some
//! models wrap around their JSON.

use serde_json::json;

use super::types::{ConversionResult, JsonSchemaFormat, ResponseFormat};

/// Name under which the schema is registered with the provider.
pub const SCHEMA_NAME: &str = "dashboard_generator";

/// JSON schema describing [`ConversionResult`].
pub fn conversion_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "grafana_dashboard": {
                "type": "string",
                "description": "Complete Grafana dashboard JSON as a string"
            },
            "prometheus_alerts": {
                "type": "string",
                "description": "Prometheus alerts in YAML format"
            }
        },
        "required": ["grafana_dashboard", "prometheus_alerts"],
        "additionalProperties": false
    })
}

/// `response_format` value requesting the conversion schema, non-strict.
pub fn response_format() -> ResponseFormat {
    ResponseFormat {
        kind: "json_schema".to_string(),
        json_schema: JsonSchemaFormat {
            name: SCHEMA_NAME.to_string(),
            schema: conversion_schema(),
            strict: false,
        },
    }
}

/// Failure to read a model reply as a [`ConversionResult`].
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("response content is empty")]
    Empty,

    #[error("response does not match the schema: {0}")]
    Schema(#[from] serde_json::Error),
}

/// Parse model output into a [`ConversionResult`].
pub fn parse_conversion(content: &str) -> Result<ConversionResult, ParseError> {
    let body = strip_code_fence(content.trim());
    if body.is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(serde_json::from_str(body)?)
}

/// Remove a surrounding ```` ``` ```` or ```` ```json ```` fence, if present.
fn strip_code_fence(content: &str) -> &str {
    let Some(rest) = content.strip_prefix("```") else {
        return content;
    };
    let Some(inner) = rest.trim_end().strip_suffix("```") else {
        return content;
    };
    // Drop the info string ("json") on the opening fence line.
    match inner.split_once('\n') {
        Some((info, body)) if !info.trim().contains(char::is_whitespace) => body.trim(),
        _ => inner.trim(),
    }
}
