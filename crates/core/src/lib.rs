//! Core types for the support assistant
//!
//! This crate provides the types shared by every other crate:
//! - Reply language detection (English / Hindi)
//! - Inbound message and reply envelope
//! - Per-caller conversation state
//! - The Order Lookup Gateway contract

pub mod conversation;
pub mod language;
pub mod message;
pub mod order;

pub use conversation::{ConversationState, PendingIntent};
pub use language::{Language, Script};
pub use message::{CallerRole, InboundMessage, Reply, ReplyBody};
pub use order::{
    InMemoryOrderLookup, InvalidOrderId, OrderId, OrderItem, OrderLookup, OrderLookupError,
    OrderSummary,
};
