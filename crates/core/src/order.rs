//! Order Lookup Gateway contract
//!
//! The order-management subsystem owns the implementation; this module only
//! fixes the call contract the order-tracking flow relies on:
//!
//! - `Ok(Some(summary))` - the order exists
//! - `Ok(None)` - well-formed id, no such order
//! - `Err(_)` - the upstream could not answer
//!
//! Implementations must not retry internally and must not impose their own
//! deadline on top of the caller's.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

static OBJECT_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9a-fA-F]{24}$").unwrap());

/// Primary key of the order store (24 hex digit object id)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct OrderId(String);

/// Returned when text is not a well-formed order id
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("not a well-formed order id: {0:?}")]
pub struct InvalidOrderId(pub String);

impl OrderId {
    pub fn parse(raw: &str) -> Result<Self, InvalidOrderId> {
        if OBJECT_ID.is_match(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(InvalidOrderId(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Line item of an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub price: f64,
}

fn default_quantity() -> u32 {
    1
}

/// What the order-tracking flow shows the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub status: String,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub created_at: DateTime<Utc>,
}

/// Upstream failures of the order lookup
#[derive(Error, Debug)]
pub enum OrderLookupError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Order service timed out")]
    Timeout,

    #[error("Order service returned status {0}")]
    UnexpectedStatus(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Order Lookup Gateway
#[async_trait]
pub trait OrderLookup: Send + Sync {
    /// Find the summary of an order by primary key
    async fn find_order_summary(
        &self,
        order_id: &OrderId,
    ) -> Result<Option<OrderSummary>, OrderLookupError>;

    /// Name used in logs
    fn name(&self) -> &'static str {
        "order-lookup"
    }
}

/// In-memory order lookup
///
/// Used when no order service is configured, and as a test double.
#[derive(Default)]
pub struct InMemoryOrderLookup {
    orders: RwLock<HashMap<OrderId, OrderSummary>>,
}

impl InMemoryOrderLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, id: OrderId, summary: OrderSummary) {
        self.orders.write().insert(id, summary);
    }

    pub fn with_order(self, id: OrderId, summary: OrderSummary) -> Self {
        self.insert(id, summary);
        self
    }

    pub fn len(&self) -> usize {
        self.orders.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.read().is_empty()
    }
}

#[async_trait]
impl OrderLookup for InMemoryOrderLookup {
    async fn find_order_summary(
        &self,
        order_id: &OrderId,
    ) -> Result<Option<OrderSummary>, OrderLookupError> {
        Ok(self.orders.read().get(order_id).cloned())
    }

    fn name(&self) -> &'static str {
        "in-memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const VALID: &str = "64b7f0c2a1e4d3b2c1a09f8e";

    #[test]
    fn test_order_id_accepts_object_ids() {
        assert!(OrderId::parse(VALID).is_ok());
        assert!(OrderId::parse("64B7F0C2A1E4D3B2C1A09F8E").is_ok());
    }

    #[test]
    fn test_order_id_rejects_malformed() {
        assert!(OrderId::parse("abc").is_err());
        assert!(OrderId::parse("").is_err());
        // 23 and 25 characters
        assert!(OrderId::parse(&VALID[..23]).is_err());
        assert!(OrderId::parse(&format!("{}0", VALID)).is_err());
        // right length, non-hex
        assert!(OrderId::parse("zzb7f0c2a1e4d3b2c1a09f8e").is_err());
        assert!(OrderId::parse(&format!(" {}", &VALID[1..])).is_err());
    }

    #[test]
    fn test_summary_wire_format() {
        let json = serde_json::json!({
            "status": "In Transit",
            "items": [{ "name": "Kurta", "quantity": 2, "price": 249.5 }],
            "totalAmount": 499,
            "createdAt": "2026-10-01T10:30:00Z"
        });
        let summary: OrderSummary = serde_json::from_value(json).unwrap();
        assert_eq!(summary.status, "In Transit");
        assert_eq!(summary.total_amount, 499.0);
        assert_eq!(summary.items[0].quantity, 2);
        assert_eq!(
            summary.created_at,
            Utc.with_ymd_and_hms(2026, 10, 1, 10, 30, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn test_in_memory_lookup() {
        let id = OrderId::parse(VALID).unwrap();
        let lookup = InMemoryOrderLookup::new().with_order(
            id.clone(),
            OrderSummary {
                status: "Delivered".to_string(),
                items: vec![],
                total_amount: 120.0,
                created_at: Utc::now(),
            },
        );

        let found = lookup.find_order_summary(&id).await.unwrap();
        assert_eq!(found.map(|s| s.status), Some("Delivered".to_string()));

        let other = OrderId::parse("000000000000000000000000").unwrap();
        assert!(lookup.find_order_summary(&other).await.unwrap().is_none());
        assert_eq!(lookup.len(), 1);
    }
}
