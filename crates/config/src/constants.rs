//! Centralized defaults for the support assistant
//!
//! Settings defaults and tests read these instead of repeating literals.

/// HTTP server defaults
pub mod server {
    pub const DEFAULT_HOST: &str = "0.0.0.0";
    pub const DEFAULT_PORT: u16 = 8080;

    /// Whole-request deadline (seconds); the only deadline the order lookup sees
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
}

/// Session State Store defaults
pub mod sessions {
    /// Upper bound on tracked callers
    pub const DEFAULT_MAX_SESSIONS: usize = 100_000;

    /// Idle time after which a caller's state is evicted (seconds)
    pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 30 * 60;

    /// How often the cleanup task sweeps (seconds)
    pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 60;

    /// Sentinel key shared by anonymous callers when sharing is enabled
    pub const ANONYMOUS_KEY: &str = "anonymous";
}

/// Order service defaults
pub mod order_service {
    /// Connection establishment limit (ms); request deadlines come from the caller
    pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 2_000;
}

/// Environment variable names
pub mod env {
    /// Selects `config/{env}` on top of `config/default`
    pub const ENVIRONMENT: &str = "SUPPORT_BOT_ENV";

    /// Prefix for per-key overrides, e.g. `SUPPORT_BOT__SERVER__PORT`
    pub const PREFIX: &str = "SUPPORT_BOT";
}
