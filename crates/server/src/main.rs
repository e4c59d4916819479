//! Support Assistant Server Entry Point

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use support_bot_config::{constants::env, load_settings, Settings};
use support_bot_core::{InMemoryOrderLookup, OrderLookup};
use support_bot_server::{create_router, init_metrics, AppState, HttpOrderLookup};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Priority: env vars > config/{env} > config/default > defaults
    let env_name = std::env::var(env::ENVIRONMENT).ok();
    let config = match load_settings(env_name.as_deref()) {
        Ok(settings) => {
            // Tracing not yet initialized, use eprintln for early logging
            eprintln!(
                "Loaded configuration from files (env: {})",
                env_name.as_deref().unwrap_or("default")
            );
            settings
        }
        Err(e) => {
            eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            Settings::default()
        }
    };

    init_tracing(&config);

    tracing::info!("Starting Support Bot Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        environment = ?config.environment,
        config_path = env_name.as_deref().unwrap_or("default"),
        "Configuration loaded"
    );

    let orders: Arc<dyn OrderLookup> = match HttpOrderLookup::from_config(&config.order_service)? {
        Some(lookup) => {
            tracing::info!(
                base_url = config.order_service.base_url.as_deref().unwrap_or_default(),
                "Using order service"
            );
            Arc::new(lookup)
        }
        None => {
            tracing::warn!("No order service configured, using empty in-memory order lookup");
            Arc::new(InMemoryOrderLookup::new())
        }
    };

    let mut state = AppState::new(config.clone(), orders);

    if config.observability.metrics_enabled {
        match init_metrics() {
            Ok(handle) => {
                tracing::info!("Initialized Prometheus metrics at /metrics");
                state = state.with_metrics(handle);
            }
            Err(e) => tracing::warn!("Failed to initialize metrics: {}. Continuing without.", e),
        }
    }

    let cleanup_shutdown = state.sessions.start_cleanup_task();
    tracing::info!(
        max_sessions = state.sessions.max_sessions(),
        idle_timeout_secs = config.session.idle_timeout_seconds,
        share_anonymous_state = config.session.share_anonymous_state,
        "Initialized session store"
    );

    let app = create_router(state);

    let listener =
        tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = cleanup_shutdown.send(true);
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

fn init_tracing(config: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &config.observability.log_level;
        format!("support_bot={},tower_http=debug", level).into()
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);
    let fmt_layer = if config.observability.log_json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };
    subscriber.with(fmt_layer).init();
}
