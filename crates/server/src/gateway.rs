//! HTTP Order Lookup
//!
//! Order Lookup Gateway backed by the order-management service:
//! `GET {base_url}/orders/{id}/summary`. A 404 means the order does not
//! exist; any other non-success status is an upstream failure. Calls are
//! not retried.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use support_bot_config::OrderServiceConfig;
use support_bot_core::{OrderId, OrderLookup, OrderLookupError, OrderSummary};

use crate::ServerError;

/// Order lookup over HTTP
#[derive(Clone)]
pub struct HttpOrderLookup {
    client: Client,
    base_url: String,
}

impl HttpOrderLookup {
    /// Create a lookup against `base_url`
    ///
    /// Only connecting is bounded here; the request as a whole is bounded by
    /// the caller's timeout.
    pub fn new(base_url: &str, connect_timeout: Duration) -> Result<Self, ServerError> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| {
                ServerError::OrderService(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &OrderServiceConfig) -> Result<Option<Self>, ServerError> {
        config
            .base_url
            .as_deref()
            .map(|url| Self::new(url, Duration::from_millis(config.connect_timeout_ms)))
            .transpose()
    }

    fn summary_url(&self, order_id: &OrderId) -> String {
        format!("{}/orders/{}/summary", self.base_url, order_id)
    }
}

fn map_transport_error(err: reqwest::Error) -> OrderLookupError {
    if err.is_timeout() {
        OrderLookupError::Timeout
    } else if err.is_connect() {
        OrderLookupError::ConnectionFailed(err.to_string())
    } else if err.is_decode() {
        OrderLookupError::InvalidResponse(err.to_string())
    } else {
        OrderLookupError::Internal(err.to_string())
    }
}

#[async_trait]
impl OrderLookup for HttpOrderLookup {
    async fn find_order_summary(
        &self,
        order_id: &OrderId,
    ) -> Result<Option<OrderSummary>, OrderLookupError> {
        let response = self
            .client
            .get(self.summary_url(order_id))
            .send()
            .await
            .map_err(map_transport_error)?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let summary: OrderSummary = response
                    .json()
                    .await
                    .map_err(|e| OrderLookupError::InvalidResponse(e.to_string()))?;
                Ok(Some(summary))
            }
            status => Err(OrderLookupError::UnexpectedStatus(status.as_u16())),
        }
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
