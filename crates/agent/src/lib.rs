//! Conversational core of the support assistant
//!
//! Features:
//! - Ordered pattern intent classification (English, Hinglish, Hindi)
//! - Bilingual reply catalog with exhaustive per-language tables
//! - Bounded, TTL-evicting per-caller session store
//! - Slot-filling dialogue controller that always produces a reply

pub mod catalog;
pub mod dialogue;
pub mod intent;
pub mod session;

pub use catalog::{format_amount, MessageCatalog, TemplateKey};
pub use dialogue::{DialogueController, TurnFailure, TurnOutcome};
pub use intent::{normalize, Intent, IntentClassifier};
pub use session::{SessionHandle, SessionKey, SessionStore};
