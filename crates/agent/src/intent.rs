//! Intent Classification
//!
//! Maps a normalized message to one intent of a fixed taxonomy. Patterns are
//! tested in priority order and the first match wins, so overlapping phrasings
//! (e.g. "return" vs "return to origin") always resolve the same way.

use regex::Regex;

/// Classified purpose of a single message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Greet,
    Menu,
    TrackOrder,
    Refund,
    Return,
    Delay,
    Payment,
    Damaged,
    VendorVerify,
    StockIssue,
    AddProduct,
    Payout,
    Docs,
    Rto,
    Kyc,
    Fallback,
}

impl Intent {
    pub const ALL: [Intent; 16] = [
        Intent::Greet,
        Intent::Menu,
        Intent::TrackOrder,
        Intent::Refund,
        Intent::Return,
        Intent::Delay,
        Intent::Payment,
        Intent::Damaged,
        Intent::VendorVerify,
        Intent::StockIssue,
        Intent::AddProduct,
        Intent::Payout,
        Intent::Docs,
        Intent::Rto,
        Intent::Kyc,
        Intent::Fallback,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Greet => "greet",
            Self::Menu => "menu",
            Self::TrackOrder => "track_order",
            Self::Refund => "refund",
            Self::Return => "return",
            Self::Delay => "delay",
            Self::Payment => "payment",
            Self::Damaged => "damaged",
            Self::VendorVerify => "vendor_verify",
            Self::StockIssue => "stock_issue",
            Self::AddProduct => "add_product",
            Self::Payout => "payout",
            Self::Docs => "docs",
            Self::Rto => "rto",
            Self::Kyc => "kyc",
            Self::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification priority; `Fallback` is implied when nothing matches
const PRIORITY: [Intent; 15] = [
    Intent::Menu,
    Intent::Greet,
    Intent::TrackOrder,
    Intent::Refund,
    Intent::Return,
    Intent::Delay,
    Intent::Payment,
    Intent::Damaged,
    Intent::VendorVerify,
    Intent::StockIssue,
    Intent::AddProduct,
    Intent::Payout,
    Intent::Docs,
    Intent::Rto,
    Intent::Kyc,
];

/// Pattern source for an intent (English, Hinglish and Devanagari phrasings)
fn pattern_for(intent: Intent) -> Option<&'static str> {
    let pattern = match intent {
        Intent::Menu => {
            r"\b(menu|options?)\b|^(help|start)\b|मेनू|मेन्यू|विकल्प|^\s*(मदद|सहायता)"
        }
        Intent::Greet => {
            r"^(hi+|hello|hey|namaste|namaskar|good\s+(morning|afternoon|evening))\b|नमस्ते|नमस्कार|हेलो|हाय"
        }
        Intent::TrackOrder => {
            r"\btrack(ing)?\b|order\s+status|where\s+is\s+my\s+order|order\s+(kaha|kahan|kab)\b|ट्रैक|ऑर्डर\s*(कहाँ|कहां|स्टेटस|की\s+स्थिति)"
        }
        Intent::Refund => r"\brefunds?\b|money\s+back|paise\s+wapas|रिफंड|पैसे\s+वापस|धनवापसी",
        Intent::Return => r"\breturn(s|ing)?\b|wapas\s+karna|रिटर्न|वापसी|लौटाना",
        Intent::Delay => {
            r"\bdelay(ed)?\b|\blate\b|not\s+(yet\s+)?(delivered|received)|der\s+ho|देरी|देर\s+से|अभी\s+तक\s+नहीं\s+(मिला|आया)"
        }
        Intent::Payment => {
            r"\bpayments?\b|\bpaid\b|\bupi\b|transaction|amount\s+deducted|पेमेंट|भुगतान|पैसे\s+कट"
        }
        Intent::Damaged => {
            r"\bdamaged?\b|\bbroken\b|defective|\bkharab\b|टूटा|टूटी|खराब|ख़राब|क्षतिग्रस्त"
        }
        Intent::VendorVerify => {
            r"\b(vendor|seller)\s+(id|verification|verify)\b|\bverify\s+(vendor|seller)\b|(वेंडर|विक्रेता)\s+(आईडी|सत्यापन)"
        }
        Intent::StockIssue => r"\bstock\b|\binventory\b|स्टॉक",
        Intent::AddProduct => {
            r"\b(add|list|upload)\s+(a\s+|new\s+)?products?\b|\bnew\s+product\b|(प्रोडक्ट|उत्पाद)\s+(जोड़|ऐड)"
        }
        Intent::Payout => r"\bpayouts?\b|\bsettlements?\b|पेआउट|सेटलमेंट",
        Intent::Docs => r"\bdocs?\b|\bdocuments?\b|\bgst\b|pan\s+card|दस्तावेज़|दस्तावेज|कागज़ात|डॉक्यूमेंट",
        Intent::Rto => r"\brto\b|return\s+to\s+origin|आरटीओ",
        Intent::Kyc => r"\bkyc\b|know\s+your\s+customer|केवाईसी",
        Intent::Fallback => return None,
    };
    Some(pattern)
}

/// Normalize raw input for classification: trimmed and case-folded
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Ordered pattern classifier
pub struct IntentClassifier {
    rules: Vec<(Intent, Regex)>,
}

impl IntentClassifier {
    /// Compile the rule table in priority order
    pub fn new() -> Self {
        let rules: Vec<(Intent, Regex)> = PRIORITY
            .iter()
            .filter_map(|&intent| {
                pattern_for(intent).map(|pattern| {
                    let regex = Regex::new(&format!("(?i){}", pattern))
                        .expect("intent patterns are static and valid");
                    (intent, regex)
                })
            })
            .collect();

        tracing::debug!("Compiled {} intent rules", rules.len());

        Self { rules }
    }

    /// Classify normalized text; first matching rule wins
    pub fn classify(&self, normalized: &str) -> Intent {
        self.rules
            .iter()
            .find(|(_, regex)| regex.is_match(normalized))
            .map(|(intent, _)| *intent)
            .unwrap_or(Intent::Fallback)
    }

    /// Convenience for raw input
    pub fn classify_raw(&self, text: &str) -> Intent {
        self.classify(&normalize(text))
    }

    /// Intents in the order they are tested
    pub fn priority(&self) -> impl Iterator<Item = Intent> + '_ {
        self.rules.iter().map(|(intent, _)| *intent)
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> Intent {
        IntentClassifier::new().classify_raw(text)
    }

    #[test]
    fn test_priority_order() {
        let classifier = IntentClassifier::new();
        let order: Vec<Intent> = classifier.priority().collect();
        assert_eq!(order, PRIORITY.to_vec());
        assert_eq!(order.len() + 1, Intent::ALL.len());
        assert!(!order.contains(&Intent::Fallback));
    }

    #[test]
    fn test_every_intent_has_a_pattern_except_fallback() {
        for intent in Intent::ALL {
            assert_eq!(
                pattern_for(intent).is_none(),
                intent == Intent::Fallback,
                "{}",
                intent
            );
        }
    }

    #[test]
    fn test_greeting() {
        assert_eq!(classify("hello"), Intent::Greet);
        assert_eq!(classify("  Hi there "), Intent::Greet);
        assert_eq!(classify("Good Morning"), Intent::Greet);
        assert_eq!(classify("नमस्ते"), Intent::Greet);
        // "hi" only greets at the start of the message
        assert_eq!(classify("hindi"), Intent::Fallback);
    }

    #[test]
    fn test_menu_beats_greeting() {
        assert_eq!(classify("hi, show me the menu"), Intent::Menu);
        assert_eq!(classify("HELP"), Intent::Menu);
        assert_eq!(classify("मदद चाहिए"), Intent::Menu);
    }

    #[test]
    fn test_help_inside_a_question_reaches_its_intent() {
        assert_eq!(classify("I need help with my refund"), Intent::Refund);
        assert_eq!(classify("can you help me track my order"), Intent::TrackOrder);
        assert_eq!(classify("रिफंड में मदद चाहिए"), Intent::Refund);
        assert_eq!(classify("help"), Intent::Menu);
        assert_eq!(classify("start"), Intent::Menu);
    }

    #[test]
    fn test_order_flows() {
        assert_eq!(classify("track my order"), Intent::TrackOrder);
        assert_eq!(classify("where is my order?"), Intent::TrackOrder);
        assert_eq!(classify("mera order kahan hai"), Intent::TrackOrder);
        assert_eq!(classify("मेरा ऑर्डर कहाँ है"), Intent::TrackOrder);
        assert_eq!(classify("I want a refund"), Intent::Refund);
        assert_eq!(classify("रिफंड चाहिए"), Intent::Refund);
        assert_eq!(classify("how do I return this"), Intent::Return);
    }

    #[test]
    fn test_track_beats_refund() {
        assert_eq!(classify("track my refund"), Intent::TrackOrder);
    }

    #[test]
    fn test_return_beats_rto() {
        // Fixed priority: "return" is tested before RTO
        assert_eq!(classify("return to origin"), Intent::Return);
        assert_eq!(classify("what is rto"), Intent::Rto);
        assert_eq!(classify("आरटीओ क्या है"), Intent::Rto);
    }

    #[test]
    fn test_customer_issues() {
        assert_eq!(classify("my parcel is late"), Intent::Delay);
        assert_eq!(classify("order not yet delivered"), Intent::Delay);
        assert_eq!(classify("payment failed"), Intent::Payment);
        assert_eq!(classify("UPI money deducted"), Intent::Payment);
        assert_eq!(classify("item arrived broken"), Intent::Damaged);
        assert_eq!(classify("सामान टूटा हुआ है"), Intent::Damaged);
    }

    #[test]
    fn test_vendor_topics() {
        assert_eq!(classify("vendor id"), Intent::VendorVerify);
        assert_eq!(classify("verify seller account"), Intent::VendorVerify);
        assert_eq!(classify("out of stock"), Intent::StockIssue);
        assert_eq!(classify("how to add a new product"), Intent::AddProduct);
        assert_eq!(classify("when is my payout"), Intent::Payout);
        assert_eq!(classify("which documents are needed"), Intent::Docs);
        assert_eq!(classify("kyc pending"), Intent::Kyc);
        assert_eq!(classify("केवाईसी"), Intent::Kyc);
    }

    #[test]
    fn test_docs_beats_kyc() {
        assert_eq!(classify("upload documents for kyc"), Intent::Docs);
    }

    #[test]
    fn test_fallback() {
        assert_eq!(classify("what is the weather"), Intent::Fallback);
        assert_eq!(classify("abc"), Intent::Fallback);
        assert_eq!(classify(""), Intent::Fallback);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Track MY Order \n"), "track my order");
        assert_eq!(normalize("नमस्ते "), "नमस्ते");
    }
}
