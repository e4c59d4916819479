//! Inbound messages and outbound replies

use serde::{Deserialize, Serialize};

use crate::language::Language;

/// Who is talking to the assistant. Supplied by the host, never derived here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CallerRole {
    User,
    Vendor,
    Staff,
    #[default]
    Guest,
}

impl CallerRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Vendor => "vendor",
            Self::Staff => "staff",
            Self::Guest => "guest",
        }
    }

    /// Parse a role name; anything unrecognized is a guest
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "user" | "customer" => Self::User,
            "vendor" | "seller" => Self::Vendor,
            "staff" | "admin" => Self::Staff,
            _ => Self::Guest,
        }
    }
}

impl std::fmt::Display for CallerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One inbound turn
#[derive(Debug, Clone, Default)]
pub struct InboundMessage {
    /// Caller identifier; `None` for anonymous requests
    pub caller_id: Option<String>,
    /// Message text; `None` when the payload was not text
    pub text: Option<String>,
    /// Display name used in greetings
    pub caller_name: String,
    pub caller_role: CallerRole,
}

impl InboundMessage {
    pub fn new(caller_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            caller_id: Some(caller_id.into()),
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn anonymous(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn with_role(mut self, role: CallerRole) -> Self {
        self.caller_role = role;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.caller_name = name.into();
        self
    }

    /// Raw text, or empty for non-textual payloads
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }
}

/// Localized reply text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyBody {
    pub text: String,
    pub lang: Language,
}

/// Reply envelope returned on every path
///
/// Serializes as `{"success": bool, "reply": {"text": ..., "lang": "en"|"hi"}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub success: bool,
    pub reply: ReplyBody,
}

impl Reply {
    pub fn ok(text: impl Into<String>, lang: Language) -> Self {
        Self {
            success: true,
            reply: ReplyBody {
                text: text.into(),
                lang,
            },
        }
    }

    pub fn failed(text: impl Into<String>, lang: Language) -> Self {
        Self {
            success: false,
            reply: ReplyBody {
                text: text.into(),
                lang,
            },
        }
    }

    pub fn text(&self) -> &str {
        &self.reply.text
    }

    pub fn language(&self) -> Language {
        self.reply.lang
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_envelope_shape() {
        let reply = Reply::failed("try later", Language::Hindi);
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": false,
                "reply": { "text": "try later", "lang": "hi" }
            })
        );
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!(CallerRole::from_str_loose("Vendor"), CallerRole::Vendor);
        assert_eq!(CallerRole::from_str_loose("user"), CallerRole::User);
        assert_eq!(CallerRole::from_str_loose("staff"), CallerRole::Staff);
        assert_eq!(CallerRole::from_str_loose("superuser"), CallerRole::Guest);
        assert_eq!(CallerRole::from_str_loose(""), CallerRole::Guest);
    }

    #[test]
    fn test_non_textual_message_reads_empty() {
        let msg = InboundMessage {
            text: None,
            ..Default::default()
        };
        assert_eq!(msg.text(), "");
        assert!(msg.caller_id.is_none());
    }
}
