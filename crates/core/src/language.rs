//! Reply languages and script detection
//!
//! The assistant answers in exactly two languages. The language of a reply is
//! chosen per message from the script of the incoming text, never from earlier
//! turns.

use serde::{Deserialize, Serialize};

/// Supported reply languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "hi")]
    Hindi,
}

impl Language {
    /// Detect the reply language for a message.
    ///
    /// Any Devanagari code point selects Hindi; everything else, including
    /// empty input, is English.
    pub fn detect(text: &str) -> Self {
        if text.chars().any(|c| Script::Devanagari.contains_char(c)) {
            Self::Hindi
        } else {
            Self::English
        }
    }

    /// Get ISO 639-1 code
    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Hindi => "hi",
        }
    }

    /// Get all supported languages
    pub fn all() -> &'static [Language] {
        &[Self::English, Self::Hindi]
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Script systems the detector distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Script {
    Latin,
    Devanagari,
}

impl Script {
    /// Get Unicode range for this script (first block only)
    pub fn unicode_range(&self) -> (u32, u32) {
        match self {
            Self::Latin => (0x0000, 0x007F),
            Self::Devanagari => (0x0900, 0x097F),
        }
    }

    /// Check if a character belongs to this script
    pub fn contains_char(&self, c: char) -> bool {
        let (start, end) = self.unicode_range();
        (start..=end).contains(&(c as u32))
    }
}
