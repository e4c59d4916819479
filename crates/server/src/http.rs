//! HTTP Endpoints
//!
//! REST API for the support assistant.

use std::time::{Duration, Instant};

use axum::{
    extract::{Json, State},
    http::{HeaderValue, Method, StatusCode},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use uuid::Uuid;

use support_bot_core::{CallerRole, InboundMessage, Reply};

use crate::metrics::{metrics_handler, record_turn};
use crate::state::AppState;

/// Create the application router
///
/// `/api/chat` enforces `server.timeout_seconds` itself so that a turn cut
/// short still answers with the reply envelope; the other routes use
/// `TimeoutLayer`.
pub fn create_router(state: AppState) -> Router {
    let server = &state.config.server;
    let cors_layer = build_cors_layer(&server.cors_origins, server.cors_enabled);
    let timeout = Duration::from_secs(server.timeout_seconds);

    let bounded = Router::new()
        .route("/api/sessions", get(session_stats))
        // Health check
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        // Prometheus metrics
        .route("/metrics", get(metrics_handler))
        .layer(TimeoutLayer::new(timeout));

    Router::new()
        .route("/api/chat", post(chat))
        .merge(bounded)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// - If cors_enabled is false, returns permissive layer (for dev)
/// - If cors_origins is empty or all invalid, defaults to localhost:3000
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins (NOT FOR PRODUCTION)");
        return CorsLayer::permissive();
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    let parsed_origins = if parsed_origins.is_empty() {
        tracing::info!("No usable CORS origins configured, defaulting to localhost:3000");
        vec![HeaderValue::from_static("http://localhost:3000")]
    } else {
        tracing::info!("CORS configured with {} origins", parsed_origins.len());
        parsed_origins
    };

    CorsLayer::new()
        .allow_origin(parsed_origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

/// Chat request body
///
/// `message` is kept as raw JSON so that non-text payloads reach the
/// controller as non-textual input instead of failing deserialization.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub caller_id: Option<String>,
    #[serde(default)]
    pub message: serde_json::Value,
    #[serde(default)]
    pub caller_name: Option<String>,
    #[serde(default)]
    pub caller_role: Option<String>,
}

impl ChatRequest {
    fn into_message(self) -> InboundMessage {
        InboundMessage {
            caller_id: self.caller_id,
            text: self.message.as_str().map(str::to_string),
            caller_name: self.caller_name.unwrap_or_default(),
            caller_role: self
                .caller_role
                .as_deref()
                .map(CallerRole::from_str_loose)
                .unwrap_or_default(),
        }
    }
}

/// POST /api/chat
async fn chat(State(state): State<AppState>, Json(request): Json<ChatRequest>) -> Json<Reply> {
    let request_id = Uuid::new_v4();
    let message = request.into_message();
    let deadline = Duration::from_secs(state.config.server.timeout_seconds);
    let span = tracing::info_span!("chat", %request_id);

    async move {
        let started = Instant::now();
        let outcome =
            match tokio::time::timeout(deadline, state.controller.handle(&message)).await {
                Ok(outcome) => outcome,
                Err(_) => state.controller.deadline_exceeded(&message),
            };
        record_turn(&outcome, started.elapsed());
        Json(outcome.reply)
    }
    .instrument(span)
    .await
}

/// GET /api/sessions
async fn session_stats(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "active": state.sessions.len(),
        "max": state.sessions.max_sessions(),
    }))
}

/// GET /health
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// GET /ready
async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let config = &state.config;
    let order_service = match &config.order_service.base_url {
        Some(url) => serde_json::json!({ "status": "ok", "backend": "http", "url": url }),
        None if config.environment.is_production() => {
            serde_json::json!({ "status": "missing", "backend": "in-memory" })
        }
        None => serde_json::json!({ "status": "ok", "backend": "in-memory" }),
    };
    let ready = order_service["status"] == "ok";

    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(serde_json::json!({
            "status": if ready { "ready" } else { "not_ready" },
            "checks": {
                "order_service": order_service,
                "sessions": {
                    "status": "ok",
                    "active": state.sessions.len(),
                    "max": state.sessions.max_sessions(),
                },
                "metrics": { "enabled": state.metrics.is_some() },
            }
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use support_bot_config::Settings;
    use support_bot_core::{InMemoryOrderLookup, Language};

    fn app() -> (Router, AppState) {
        let state = AppState::new(Settings::default(), Arc::new(InMemoryOrderLookup::new()));
        (create_router(state.clone()), state)
    }

    async fn post_chat(router: Router, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/chat")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_chat_request_mapping() {
        let request: ChatRequest = serde_json::from_value(serde_json::json!({
            "caller_id": "u1",
            "message": "hello",
            "caller_name": "Asha",
            "caller_role": "Vendor"
        }))
        .unwrap();
        let message = request.into_message();
        assert_eq!(message.caller_id.as_deref(), Some("u1"));
        assert_eq!(message.text(), "hello");
        assert_eq!(message.caller_role, CallerRole::Vendor);

        let request: ChatRequest = serde_json::from_value(serde_json::json!({
            "message": {"image": "x.png"},
            "caller_role": "superuser"
        }))
        .unwrap();
        let message = request.into_message();
        assert!(message.text.is_none());
        assert_eq!(message.caller_role, CallerRole::Guest);
    }

    #[tokio::test]
    async fn test_chat_envelope() {
        let (router, state) = app();
        let (status, body) = post_chat(
            router,
            serde_json::json!({"caller_id": "u1", "message": "track my order", "caller_role": "user"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["reply"]["lang"], "en");
        assert!(body["reply"]["text"].is_string());
        assert_eq!(state.sessions.len(), 1);
    }

    #[tokio::test]
    async fn test_chat_error_paths_share_envelope() {
        let (router, _) = app();
        let (status, body) = post_chat(
            router.clone(),
            serde_json::json!({"caller_id": "u1", "message": 42}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert!(body["reply"]["text"].is_string());

        post_chat(
            router.clone(),
            serde_json::json!({"caller_id": "u1", "message": "ऑर्डर ट्रैक"}),
        )
        .await;
        let (_, body) = post_chat(
            router,
            serde_json::json!({"caller_id": "u1", "message": "000000000000000000000000"}),
        )
        .await;
        assert_eq!(body["success"], false);
        assert_eq!(body["reply"]["lang"], Language::English.code());
    }

    #[tokio::test]
    async fn test_session_stats() {
        let (router, state) = app();
        state.sessions.get_or_create("u1");
        let (status, body) = get_json(router, "/api/sessions").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["active"], 1);
        assert_eq!(body["max"], state.config.session.max_sessions);
    }

    #[tokio::test]
    async fn test_health_and_ready() {
        let (router, _) = app();
        let (status, body) = get_json(router.clone(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (status, body) = get_json(router, "/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["checks"]["order_service"]["backend"], "in-memory");
    }

    #[tokio::test]
    async fn test_metrics_disabled() {
        let (router, _) = app();
        let response = router
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_metrics_rendered() {
        let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
        let state = AppState::new(Settings::default(), Arc::new(InMemoryOrderLookup::new()))
            .with_metrics(recorder.handle());
        let response = create_router(state)
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    /// Lookup that never answers
    struct StalledLookup;

    #[async_trait::async_trait]
    impl support_bot_core::OrderLookup for StalledLookup {
        async fn find_order_summary(
            &self,
            _order_id: &support_bot_core::OrderId,
        ) -> Result<Option<support_bot_core::OrderSummary>, support_bot_core::OrderLookupError>
        {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_stalled_lookup_still_returns_envelope() {
        let mut settings = Settings::default();
        settings.server.timeout_seconds = 1;
        let state = AppState::new(settings, Arc::new(StalledLookup));
        let router = create_router(state.clone());

        post_chat(
            router.clone(),
            serde_json::json!({"caller_id": "u1", "message": "track my order"}),
        )
        .await;
        let (status, body) = post_chat(
            router,
            serde_json::json!({"caller_id": "u1", "message": "64b7f0c2a1e4d3b2c1a09f8e"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert_eq!(body["reply"]["lang"], "en");
        assert_eq!(
            body["reply"]["text"],
            state
                .controller
                .catalog()
                .template(Language::English, support_bot_agent::TemplateKey::ServerError)
        );
        assert_eq!(
            state.sessions.pending("u1").await,
            Some(support_bot_core::PendingIntent::None)
        );
    }
}
