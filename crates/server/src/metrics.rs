//! Prometheus metrics
//!
//! Counters and histograms are recorded through the `metrics` facade and
//! rendered by the Prometheus exporter at `GET /metrics`.

use std::time::Duration;

use axum::{extract::State, http::StatusCode};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use support_bot_agent::TurnOutcome;

use crate::state::AppState;
use crate::ServerError;

/// Install the global Prometheus recorder
pub fn init_metrics() -> Result<PrometheusHandle, ServerError> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ServerError::Metrics(e.to_string()))?;

    metrics::describe_counter!(
        "support_bot_messages_total",
        "Messages handled, by intent and reply language"
    );
    metrics::describe_counter!(
        "support_bot_turn_failures_total",
        "Turns answered with an unsuccessful reply, by failure kind"
    );
    metrics::describe_counter!(
        "support_bot_sessions_evicted_total",
        "Caller states evicted from the session store"
    );
    metrics::describe_histogram!(
        "support_bot_turn_duration_seconds",
        "Time to handle one message, including order lookups"
    );

    Ok(handle)
}

/// Record one handled message
pub fn record_turn(outcome: &TurnOutcome, elapsed: Duration) {
    metrics::counter!(
        "support_bot_messages_total",
        "intent" => outcome.intent_label(),
        "lang" => outcome.language().code()
    )
    .increment(1);

    if let Some(failure) = outcome.failure {
        metrics::counter!("support_bot_turn_failures_total", "kind" => failure.as_str())
            .increment(1);
    }

    metrics::histogram!("support_bot_turn_duration_seconds").record(elapsed.as_secs_f64());
}

/// GET /metrics
pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    match &state.metrics {
        Some(handle) => Ok(handle.render()),
        None => Err(ServerError::MetricsDisabled.into()),
    }
}
