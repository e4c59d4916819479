//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{env, order_service, server, sessions};
use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - in-memory order lookup allowed
    #[default]
    Development,
    Staging,
    /// Production mode - all validations enforced
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Session State Store configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// Order service (Order Lookup Gateway) configuration
    #[serde(default)]
    pub order_service: OrderServiceConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_session()?;
        self.validate_order_service()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        let server = &self.server;

        if server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }

        if server.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.timeout_seconds".to_string(),
                message: "Timeout must be at least 1 second".to_string(),
            });
        }

        if self.environment.is_production() && server.cors_enabled && server.cors_origins.is_empty()
        {
            tracing::warn!(
                "CORS is enabled in production but no origins are configured. \
                 This may block legitimate requests."
            );
        }

        Ok(())
    }

    fn validate_session(&self) -> Result<(), ConfigError> {
        let session = &self.session;

        if session.max_sessions == 0 {
            return Err(ConfigError::InvalidValue {
                field: "session.max_sessions".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        if session.idle_timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "session.idle_timeout_seconds".to_string(),
                message: "Must be at least 1 second".to_string(),
            });
        }

        if session.cleanup_interval_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "session.cleanup_interval_seconds".to_string(),
                message: "Must be at least 1 second".to_string(),
            });
        }

        if session.cleanup_interval_seconds > session.idle_timeout_seconds {
            return Err(ConfigError::InvalidValue {
                field: "session.cleanup_interval_seconds".to_string(),
                message: format!(
                    "Cannot be larger than idle_timeout_seconds ({})",
                    session.idle_timeout_seconds
                ),
            });
        }

        if session.share_anonymous_state {
            tracing::warn!(
                "session.share_anonymous_state is on: all anonymous callers share one dialogue slot"
            );
        }

        Ok(())
    }

    fn validate_order_service(&self) -> Result<(), ConfigError> {
        let orders = &self.order_service;

        match orders.base_url.as_deref() {
            Some(url) if !(url.starts_with("http://") || url.starts_with("https://")) => {
                Err(ConfigError::InvalidValue {
                    field: "order_service.base_url".to_string(),
                    message: format!("Expected an http(s) URL, got '{}'", url),
                })
            }
            None if self.environment.is_production() => Err(ConfigError::MissingField(
                "order_service.base_url".to_string(),
            )),
            None => {
                tracing::warn!("order_service.base_url not set, order lookups use the in-memory store");
                Ok(())
            }
            Some(_) => Ok(()),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// CORS allowed origins
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    server::DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    server::DEFAULT_PORT
}
fn default_timeout() -> u64 {
    server::DEFAULT_TIMEOUT_SECS
}
fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_seconds: default_timeout(),
            cors_enabled: true,
            cors_origins: Vec::new(),
        }
    }
}

/// Session State Store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Maximum number of callers tracked at once
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Evict a caller's state after this much inactivity
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,

    /// Interval of the background cleanup sweep
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_seconds: u64,

    /// Let every anonymous caller share one state slot instead of a
    /// per-request one
    #[serde(default)]
    pub share_anonymous_state: bool,
}

fn default_max_sessions() -> usize {
    sessions::DEFAULT_MAX_SESSIONS
}
fn default_idle_timeout() -> u64 {
    sessions::DEFAULT_IDLE_TIMEOUT_SECS
}
fn default_cleanup_interval() -> u64 {
    sessions::DEFAULT_CLEANUP_INTERVAL_SECS
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_sessions: default_max_sessions(),
            idle_timeout_seconds: default_idle_timeout(),
            cleanup_interval_seconds: default_cleanup_interval(),
            share_anonymous_state: false,
        }
    }
}

/// Order service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderServiceConfig {
    /// Base URL of the order-management service; `None` selects the
    /// in-memory lookup
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,
}

fn default_connect_timeout() -> u64 {
    order_service::DEFAULT_CONNECT_TIMEOUT_MS
}

impl Default for OrderServiceConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            connect_timeout_ms: default_connect_timeout(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,

    /// Enable metrics
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

/// Load settings from `config/` in the working directory and the environment
///
/// Priority: env vars > config/{env} > config/default > defaults
pub fn load_settings(env_name: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from(Path::new("config"), env_name)
}

/// Load settings from a specific config directory
pub fn load_settings_from(dir: &Path, env_name: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    // Load default config
    builder = builder.add_source(File::from(dir.join("default")).required(false));

    // Load environment-specific config
    if let Some(env_name) = env_name {
        builder = builder.add_source(File::from(dir.join(env_name)).required(false));
    }

    // Load from environment variables
    builder = builder.add_source(
        Environment::with_prefix(env::PREFIX)
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    // Validate
    settings.validate()?;

    Ok(settings)
}
