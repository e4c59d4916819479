//! Support Assistant Server
//!
//! Thin HTTP host around the dialogue controller.

pub mod gateway;
pub mod http;
pub mod metrics;
pub mod state;

pub use gateway::HttpOrderLookup;
pub use http::create_router;
pub use crate::metrics::{init_metrics, record_turn};
pub use state::AppState;

use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Order service error: {0}")]
    OrderService(String),

    #[error("Metrics are disabled")]
    MetricsDisabled,

    #[error("Metrics error: {0}")]
    Metrics(String),
}

impl From<ServerError> for axum::http::StatusCode {
    fn from(err: ServerError) -> Self {
        match err {
            ServerError::OrderService(_) => axum::http::StatusCode::BAD_GATEWAY,
            ServerError::MetricsDisabled => axum::http::StatusCode::NOT_FOUND,
            ServerError::Metrics(_) => axum::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            StatusCode::from(ServerError::Metrics("recorder already installed".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            StatusCode::from(ServerError::OrderService("down".into())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            StatusCode::from(ServerError::MetricsDisabled),
            StatusCode::NOT_FOUND
        );
    }
}
