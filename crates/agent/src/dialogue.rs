//! Dialogue Controller
//!
//! Per-caller state machine over [`PendingIntent`]. Each turn either resolves
//! the open slot (the whole message is the answer) or classifies the message
//! and dispatches it. Every path produces a [`Reply`]; failures are recorded
//! in the [`TurnOutcome`] and never escape the controller.

use std::sync::Arc;

use support_bot_core::{
    CallerRole, ConversationState, InboundMessage, Language, OrderId, OrderLookup, OrderSummary,
    PendingIntent, Reply,
};

use crate::catalog::{format_amount, MessageCatalog, TemplateKey};
use crate::intent::{normalize, Intent, IntentClassifier};
use crate::session::{SessionKey, SessionStore};

/// Why a turn produced an unsuccessful reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnFailure {
    /// Empty or non-textual message
    InputRejected,
    /// Slot value failed its required format
    ValidationFailed,
    /// Well-formed order id with no matching order
    NotFound,
    /// Order lookup failed or was unavailable
    UpstreamFailure,
}

impl TurnFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InputRejected => "input_rejected",
            Self::ValidationFailed => "validation_failed",
            Self::NotFound => "not_found",
            Self::UpstreamFailure => "upstream_failure",
        }
    }
}

impl std::fmt::Display for TurnFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of handling one message
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub reply: Reply,
    /// Classified intent; `None` when the turn resolved a slot or was rejected
    pub intent: Option<Intent>,
    /// Slot consumed by this turn, if any
    pub resolved: Option<PendingIntent>,
    /// Caller state after the turn; `None` when the store was not consulted
    pub pending: Option<PendingIntent>,
    pub failure: Option<TurnFailure>,
}

impl TurnOutcome {
    pub fn language(&self) -> Language {
        self.reply.language()
    }

    pub fn is_success(&self) -> bool {
        self.reply.success
    }

    /// Label used for the per-intent message counter
    pub fn intent_label(&self) -> &'static str {
        match (self.intent, self.resolved) {
            (Some(intent), _) => intent.as_str(),
            (None, Some(_)) => "slot",
            (None, None) => "none",
        }
    }
}

/// What a classified message leads to
enum Route {
    /// Fixed reply, state stays `None`
    Reply(TemplateKey),
    /// Personalized greeting, state stays `None`
    Greet,
    /// Prompt for a value and open a slot
    Prompt(TemplateKey, PendingIntent),
}

fn menu_for(role: CallerRole) -> TemplateKey {
    match role {
        CallerRole::User => TemplateKey::MenuUser,
        CallerRole::Vendor => TemplateKey::MenuVendor,
        CallerRole::Staff | CallerRole::Guest => TemplateKey::MenuOther,
    }
}

fn route(intent: Intent, role: CallerRole) -> Route {
    match intent {
        Intent::Greet => Route::Greet,
        Intent::Menu => Route::Reply(menu_for(role)),
        Intent::TrackOrder => Route::Prompt(TemplateKey::AskOrderId, PendingIntent::AwaitOrderId),
        Intent::Refund => {
            Route::Prompt(TemplateKey::AskRefundOrderId, PendingIntent::AwaitOrderId)
        }
        Intent::Return => Route::Prompt(TemplateKey::AskReturnId, PendingIntent::AwaitReturnId),
        Intent::VendorVerify if role == CallerRole::Vendor => {
            Route::Prompt(TemplateKey::AskVendorId, PendingIntent::AwaitVendorId)
        }
        Intent::VendorVerify => Route::Reply(TemplateKey::Fallback),
        Intent::Delay => Route::Reply(TemplateKey::Delay),
        Intent::Payment => Route::Reply(TemplateKey::Payment),
        Intent::Damaged => Route::Reply(TemplateKey::Damaged),
        Intent::StockIssue => Route::Reply(TemplateKey::StockIssue),
        Intent::AddProduct => Route::Reply(TemplateKey::AddProduct),
        Intent::Payout => Route::Reply(TemplateKey::Payout),
        Intent::Docs => Route::Reply(TemplateKey::Docs),
        Intent::Rto => Route::Reply(TemplateKey::Rto),
        Intent::Kyc => Route::Reply(TemplateKey::Kyc),
        Intent::Fallback => Route::Reply(TemplateKey::Fallback),
    }
}

/// Dialogue Controller
pub struct DialogueController {
    sessions: Arc<SessionStore>,
    orders: Arc<dyn OrderLookup>,
    classifier: IntentClassifier,
    catalog: MessageCatalog,
    share_anonymous_state: bool,
}

impl DialogueController {
    pub fn new(sessions: Arc<SessionStore>, orders: Arc<dyn OrderLookup>) -> Self {
        Self {
            sessions,
            orders,
            classifier: IntentClassifier::new(),
            catalog: MessageCatalog::new(),
            share_anonymous_state: false,
        }
    }

    /// Let all anonymous callers share one state slot
    pub fn with_shared_anonymous_state(mut self, share: bool) -> Self {
        self.share_anonymous_state = share;
        self
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    pub fn catalog(&self) -> &MessageCatalog {
        &self.catalog
    }

    /// Handle one message and return only the reply envelope
    pub async fn handle_message(&self, message: &InboundMessage) -> Reply {
        self.handle(message).await.reply
    }

    /// Handle one message
    pub async fn handle(&self, message: &InboundMessage) -> TurnOutcome {
        let raw = message.text();
        let lang = Language::detect(raw);
        let text = raw.trim();
        let key = SessionKey::resolve(message.caller_id.as_deref(), self.share_anonymous_state);

        if text.is_empty() {
            tracing::debug!(caller = %key, lang = %lang, "Rejected empty message");
            return TurnOutcome {
                reply: Reply::failed(self.catalog.template(lang, TemplateKey::NotUnderstood), lang),
                intent: None,
                resolved: None,
                pending: None,
                failure: Some(TurnFailure::InputRejected),
            };
        }

        let handle = self.sessions.checkout(&key);
        let mut state = handle.lock().await;

        let outcome = match state.take_pending() {
            PendingIntent::None => self.dispatch(&mut state, message, text, lang),
            slot => self.resolve_slot(slot, text, lang).await,
        };

        let outcome = TurnOutcome {
            pending: Some(state.pending()),
            ..outcome
        };

        tracing::info!(
            caller = %key,
            role = %message.caller_role,
            intent = outcome.intent_label(),
            lang = %lang,
            pending = %state.pending(),
            failure = outcome.failure.map(|f| f.as_str()).unwrap_or("none"),
            text_len = text.len(),
            "Handled message"
        );

        outcome
    }

    /// Reply for a turn abandoned at the host's deadline.
    ///
    /// Only lookups can suspend a turn, and a slot is taken before its lookup
    /// starts, so the caller is already back at `None`.
    pub fn deadline_exceeded(&self, message: &InboundMessage) -> TurnOutcome {
        let lang = Language::detect(message.text());
        tracing::warn!(
            caller = %SessionKey::resolve(message.caller_id.as_deref(), self.share_anonymous_state),
            lang = %lang,
            lookup = self.orders.name(),
            "Turn exceeded its deadline"
        );
        TurnOutcome {
            reply: Reply::failed(self.catalog.template(lang, TemplateKey::ServerError), lang),
            intent: None,
            resolved: None,
            pending: None,
            failure: Some(TurnFailure::UpstreamFailure),
        }
    }

    /// Classify a message arriving with no open slot and dispatch it
    fn dispatch(
        &self,
        state: &mut ConversationState,
        message: &InboundMessage,
        text: &str,
        lang: Language,
    ) -> TurnOutcome {
        let intent = self.classifier.classify(&normalize(text));

        let reply_text = match route(intent, message.caller_role) {
            Route::Reply(key) => self.catalog.template(lang, key).to_string(),
            Route::Greet => self.greeting(lang, &message.caller_name),
            Route::Prompt(key, slot) => {
                state.set_pending(slot);
                self.catalog.template(lang, key).to_string()
            }
        };

        TurnOutcome {
            reply: Reply::ok(reply_text, lang),
            intent: Some(intent),
            resolved: None,
            pending: None,
            failure: None,
        }
    }

    fn greeting(&self, lang: Language, caller_name: &str) -> String {
        let name = match caller_name.trim() {
            "" => self.catalog.template(lang, TemplateKey::GenericName),
            _ => caller_name,
        };
        self.catalog.render(lang, TemplateKey::Greet, &[("name", name)])
    }

    /// Treat the whole message as the answer to `slot`. The slot has already
    /// been taken from the state, so every path leaves the caller at `None`.
    async fn resolve_slot(&self, slot: PendingIntent, value: &str, lang: Language) -> TurnOutcome {
        let (reply, failure) = match slot {
            PendingIntent::AwaitOrderId => self.resolve_order(value, lang).await,
            PendingIntent::AwaitReturnId => (
                Reply::ok(
                    self.catalog.render_value(lang, TemplateKey::ReturnReceived, value),
                    lang,
                ),
                None,
            ),
            PendingIntent::AwaitVendorId => (
                Reply::ok(
                    self.catalog.render_value(lang, TemplateKey::VendorIdReceived, value),
                    lang,
                ),
                None,
            ),
            PendingIntent::None => (
                Reply::failed(self.catalog.template(lang, TemplateKey::NotUnderstood), lang),
                Some(TurnFailure::InputRejected),
            ),
        };

        TurnOutcome {
            reply,
            intent: None,
            resolved: Some(slot),
            pending: None,
            failure,
        }
    }

    async fn resolve_order(&self, value: &str, lang: Language) -> (Reply, Option<TurnFailure>) {
        let order_id = match OrderId::parse(value) {
            Ok(id) => id,
            Err(e) => {
                tracing::debug!(error = %e, "Order id failed validation");
                return (
                    Reply::failed(self.catalog.template(lang, TemplateKey::InvalidOrderId), lang),
                    Some(TurnFailure::ValidationFailed),
                );
            }
        };

        match self.orders.find_order_summary(&order_id).await {
            Ok(Some(summary)) => (Reply::ok(self.order_found(lang, &summary), lang), None),
            Ok(None) => {
                tracing::debug!(order_id = %order_id, "Order not found");
                (
                    Reply::failed(self.catalog.template(lang, TemplateKey::OrderNotFound), lang),
                    Some(TurnFailure::NotFound),
                )
            }
            Err(e) => {
                tracing::warn!(
                    order_id = %order_id,
                    lookup = self.orders.name(),
                    error = %e,
                    "Order lookup failed"
                );
                (
                    Reply::failed(self.catalog.template(lang, TemplateKey::ServerError), lang),
                    Some(TurnFailure::UpstreamFailure),
                )
            }
        }
    }

    fn order_found(&self, lang: Language, summary: &OrderSummary) -> String {
        let items = summary.items.len().to_string();
        let total = format_amount(summary.total_amount);
        let created = summary.created_at.format("%d-%m-%Y").to_string();
        self.catalog.render(
            lang,
            TemplateKey::OrderFound,
            &[
                ("status", summary.status.as_str()),
                ("items", items.as_str()),
                ("total", total.as_str()),
                ("created", created.as_str()),
            ],
        )
    }
}
