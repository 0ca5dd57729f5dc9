//! The fixed system prompt sent with every conversion.

/// Grafana dashboard and alerting reference embedded at build time.
const DASHBOARD_REFERENCE: &str = include_str!("../../prompts/grafana_dashboard_prompt.md");

const PREAMBLE: &str = "You are an expert Site-Reliability Engineer who specializes in \
Grafana dashboards and Prometheus-based alerting.";

const INSTRUCTIONS: &str = r#"The user will paste a block of Prometheus metric samples.

You must generate a JSON response with two fields:

1. "grafana_dashboard" - A complete Grafana dashboard JSON as a STRING (not an object). The dashboard must be a valid JSON string that can be imported into Grafana based on the reference above.

2. "prometheus_alerts" - Prometheus alerts in YAML format as a STRING. Include:
   - Meaningful alert rules based on the metrics
   - Annotations with summary and description
   - Labels with severity: warning or critical
   - Appropriate thresholds based on metric types

IMPORTANT: The grafana_dashboard field must contain the ENTIRE dashboard JSON as a string, not just a number or placeholder."#;

/// Build the system prompt.
pub fn system_prompt() -> String {
    format!("{PREAMBLE}\n\n{DASHBOARD_REFERENCE}\n\n{INSTRUCTIONS}")
}
