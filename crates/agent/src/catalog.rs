//! Locale Message Catalog
//!
//! Reply templates for English and Hindi. Both tables are exhaustive matches
//! over [`TemplateKey`], so a key missing from either language fails to
//! compile. Placeholders are written `{name}` and are filled in a single pass;
//! substituted values are inserted verbatim and never re-expanded.

use support_bot_core::Language;

/// Every reply the assistant can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKey {
    NotUnderstood,
    Greet,
    GenericName,
    MenuUser,
    MenuVendor,
    MenuOther,
    AskOrderId,
    AskRefundOrderId,
    AskReturnId,
    AskVendorId,
    InvalidOrderId,
    OrderNotFound,
    OrderFound,
    ServerError,
    ReturnReceived,
    VendorIdReceived,
    Delay,
    Payment,
    Damaged,
    StockIssue,
    AddProduct,
    Payout,
    Docs,
    Rto,
    Kyc,
    Fallback,
}

impl TemplateKey {
    pub const ALL: [TemplateKey; 26] = [
        TemplateKey::NotUnderstood,
        TemplateKey::Greet,
        TemplateKey::GenericName,
        TemplateKey::MenuUser,
        TemplateKey::MenuVendor,
        TemplateKey::MenuOther,
        TemplateKey::AskOrderId,
        TemplateKey::AskRefundOrderId,
        TemplateKey::AskReturnId,
        TemplateKey::AskVendorId,
        TemplateKey::InvalidOrderId,
        TemplateKey::OrderNotFound,
        TemplateKey::OrderFound,
        TemplateKey::ServerError,
        TemplateKey::ReturnReceived,
        TemplateKey::VendorIdReceived,
        TemplateKey::Delay,
        TemplateKey::Payment,
        TemplateKey::Damaged,
        TemplateKey::StockIssue,
        TemplateKey::AddProduct,
        TemplateKey::Payout,
        TemplateKey::Docs,
        TemplateKey::Rto,
        TemplateKey::Kyc,
        TemplateKey::Fallback,
    ];
}

fn english(key: TemplateKey) -> &'static str {
    match key {
        TemplateKey::NotUnderstood => {
            "Sorry, I didn't understand that. Please type your question as a text message."
        }
        TemplateKey::Greet => {
            "Hello {name}! How can I help you today? Type 'menu' to see what I can do."
        }
        TemplateKey::GenericName => "there",
        TemplateKey::MenuUser => {
            "Here's what I can help you with:\n\
             1. Track order\n\
             2. Refund\n\
             3. Return\n\
             4. Delivery delay\n\
             5. Payment issue\n\
             6. Damaged product\n\
             Just type your question."
        }
        TemplateKey::MenuVendor => {
            "Vendor support options:\n\
             1. Vendor verification\n\
             2. Stock issue\n\
             3. Add product\n\
             4. Payout\n\
             5. Documents\n\
             6. RTO\n\
             7. KYC\n\
             Just type your question."
        }
        TemplateKey::MenuOther => {
            "I can help with orders, refunds, returns, payments and vendor support. \
             Log in as a customer or vendor to see your options."
        }
        TemplateKey::AskOrderId => "Please share your order ID.",
        TemplateKey::AskRefundOrderId => {
            "Please share the order ID you want a refund for."
        }
        TemplateKey::AskReturnId => {
            "Please share the order ID or return request ID for your return."
        }
        TemplateKey::AskVendorId => "Please share your vendor ID for verification.",
        TemplateKey::InvalidOrderId => {
            "That doesn't look like a valid order ID. Please check it and try again."
        }
        TemplateKey::OrderNotFound => "We couldn't find an order with that ID.",
        TemplateKey::OrderFound => {
            "Order status: {status}\n\
             Items: {items}\n\
             Total amount: ₹{total}\n\
             Placed on: {created}"
        }
        TemplateKey::ServerError => {
            "Something went wrong on our side. Please try again later."
        }
        TemplateKey::ReturnReceived => {
            "We have received your return request for {value}. \
             Our team will contact you within 48 hours."
        }
        TemplateKey::VendorIdReceived => {
            "Thank you! Vendor ID {value} has been submitted for verification. \
             You will be notified once it is verified."
        }
        TemplateKey::Delay => {
            "Sorry for the delay. Most orders arrive within 5-7 business days. \
             If it has been longer, type 'track order' and share your order ID."
        }
        TemplateKey::Payment => {
            "If money was deducted but the order failed, it is refunded automatically \
             to your original payment method within 5-7 business days."
        }
        TemplateKey::Damaged => {
            "Sorry that your product arrived damaged. Please raise a return within \
             7 days of delivery and attach photos of the product."
        }
        TemplateKey::StockIssue => {
            "To update stock, open Vendor Dashboard > Products > Inventory and edit the quantity."
        }
        TemplateKey::AddProduct => {
            "To add a product, open Vendor Dashboard > Products > Add New, fill in the \
             details and submit it for approval."
        }
        TemplateKey::Payout => {
            "Payouts are settled to your registered bank account every 7 days, \
             once the return window of the order has closed."
        }
        TemplateKey::Docs => {
            "Documents needed for vendors: GST certificate, PAN card, cancelled cheque \
             and address proof."
        }
        TemplateKey::Rto => {
            "RTO (Return to Origin) happens when a delivery fails. The product goes back \
             to the vendor and the customer is refunded."
        }
        TemplateKey::Kyc => {
            "Complete your KYC from Vendor Dashboard > Profile > KYC by uploading your PAN \
             and Aadhaar. Verification takes 24-48 hours."
        }
        TemplateKey::Fallback => {
            "Sorry, I couldn't understand that. Type 'menu' to see what I can help with."
        }
    }
}

fn hindi(key: TemplateKey) -> &'static str {
    match key {
        TemplateKey::NotUnderstood => {
            "माफ़ कीजिए, मैं समझ नहीं पाया। कृपया अपना सवाल टेक्स्ट में लिखें।"
        }
        TemplateKey::Greet => {
            "नमस्ते {name}! मैं आज आपकी क्या मदद कर सकता हूँ? विकल्प देखने के लिए 'मेनू' लिखें।"
        }
        TemplateKey::GenericName => "जी",
        TemplateKey::MenuUser => {
            "मैं इनमें आपकी मदद कर सकता हूँ:\n\
             1. ऑर्डर ट्रैक करें\n\
             2. रिफंड\n\
             3. रिटर्न\n\
             4. डिलीवरी में देरी\n\
             5. पेमेंट की समस्या\n\
             6. खराब प्रोडक्ट\n\
             बस अपना सवाल लिखें।"
        }
        TemplateKey::MenuVendor => {
            "वेंडर सहायता विकल्प:\n\
             1. वेंडर सत्यापन\n\
             2. स्टॉक की समस्या\n\
             3. प्रोडक्ट जोड़ें\n\
             4. पेआउट\n\
             5. दस्तावेज़\n\
             6. आरटीओ\n\
             7. केवाईसी\n\
             बस अपना सवाल लिखें।"
        }
        TemplateKey::MenuOther => {
            "मैं ऑर्डर, रिफंड, रिटर्न, पेमेंट और वेंडर सहायता में मदद कर सकता हूँ। \
             अपने विकल्प देखने के लिए ग्राहक या वेंडर के रूप में लॉग इन करें।"
        }
        TemplateKey::AskOrderId => "कृपया अपना ऑर्डर आईडी बताएं।",
        TemplateKey::AskRefundOrderId => {
            "कृपया उस ऑर्डर का आईडी बताएं जिसका रिफंड चाहिए।"
        }
        TemplateKey::AskReturnId => {
            "कृपया रिटर्न के लिए ऑर्डर आईडी या रिटर्न अनुरोध आईडी बताएं।"
        }
        TemplateKey::AskVendorId => "कृपया सत्यापन के लिए अपना वेंडर आईडी बताएं।",
        TemplateKey::InvalidOrderId => {
            "यह ऑर्डर आईडी सही नहीं लग रहा। कृपया जाँच कर फिर से भेजें।"
        }
        TemplateKey::OrderNotFound => "इस आईडी से कोई ऑर्डर नहीं मिला।",
        TemplateKey::OrderFound => {
            "ऑर्डर की स्थिति: {status}\n\
             आइटम: {items}\n\
             कुल राशि: ₹{total}\n\
             ऑर्डर की तारीख: {created}"
        }
        TemplateKey::ServerError => {
            "हमारी तरफ़ से कुछ गड़बड़ हो गई। कृपया थोड़ी देर बाद फिर कोशिश करें।"
        }
        TemplateKey::ReturnReceived => {
            "{value} के लिए आपका रिटर्न अनुरोध मिल गया है। \
             हमारी टीम 48 घंटे में आपसे संपर्क करेगी।"
        }
        TemplateKey::VendorIdReceived => {
            "धन्यवाद! वेंडर आईडी {value} सत्यापन के लिए भेज दिया गया है। \
             सत्यापन होते ही आपको सूचना मिलेगी।"
        }
        TemplateKey::Delay => {
            "देरी के लिए खेद है। ज़्यादातर ऑर्डर 5-7 कार्य दिवस में पहुँचते हैं। \
             ज़्यादा समय हो गया हो तो 'ऑर्डर ट्रैक' लिखकर अपना ऑर्डर आईडी भेजें।"
        }
        TemplateKey::Payment => {
            "अगर पैसे कट गए और ऑर्डर नहीं हुआ, तो 5-7 कार्य दिवस में पैसे अपने-आप \
             आपके पेमेंट के तरीके में वापस आ जाएंगे।"
        }
        TemplateKey::Damaged => {
            "खेद है कि आपका प्रोडक्ट खराब हालत में पहुँचा। कृपया डिलीवरी के 7 दिन के अंदर \
             प्रोडक्ट की फ़ोटो के साथ रिटर्न करें।"
        }
        TemplateKey::StockIssue => {
            "स्टॉक अपडेट करने के लिए वेंडर डैशबोर्ड > प्रोडक्ट्स > इन्वेंटरी में जाकर मात्रा बदलें।"
        }
        TemplateKey::AddProduct => {
            "प्रोडक्ट जोड़ने के लिए वेंडर डैशबोर्ड > प्रोडक्ट्स > नया जोड़ें में जाएं, \
             जानकारी भरें और मंज़ूरी के लिए भेजें।"
        }
        TemplateKey::Payout => {
            "ऑर्डर की रिटर्न अवधि खत्म होने के बाद हर 7 दिन में पेआउट आपके \
             रजिस्टर्ड बैंक खाते में भेजा जाता है।"
        }
        TemplateKey::Docs => {
            "वेंडर के लिए ज़रूरी दस्तावेज़: जीएसटी सर्टिफिकेट, पैन कार्ड, कैंसल चेक \
             और पते का प्रमाण।"
        }
        TemplateKey::Rto => {
            "आरटीओ (रिटर्न टू ओरिजिन) तब होता है जब डिलीवरी नहीं हो पाती। प्रोडक्ट वेंडर \
             के पास वापस जाता है और ग्राहक को रिफंड मिलता है।"
        }
        TemplateKey::Kyc => {
            "वेंडर डैशबोर्ड > प्रोफ़ाइल > केवाईसी में पैन और आधार अपलोड करके केवाईसी पूरा करें। \
             सत्यापन में 24-48 घंटे लगते हैं।"
        }
        TemplateKey::Fallback => {
            "माफ़ कीजिए, मैं समझ नहीं पाया। मदद के विकल्प देखने के लिए 'मेनू' लिखें।"
        }
    }
}

/// Per-language template lookup and rendering
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageCatalog;

impl MessageCatalog {
    pub fn new() -> Self {
        Self
    }

    /// Raw template text
    pub fn template(&self, lang: Language, key: TemplateKey) -> &'static str {
        match lang {
            Language::English => english(key),
            Language::Hindi => hindi(key),
        }
    }

    /// Template text with placeholders filled from `args`
    pub fn render(&self, lang: Language, key: TemplateKey, args: &[(&str, &str)]) -> String {
        fill(self.template(lang, key), args)
    }

    /// Template text for a single `{value}` placeholder
    pub fn render_value(&self, lang: Language, key: TemplateKey, value: &str) -> String {
        self.render(lang, key, &[("value", value)])
    }
}

/// Single-pass placeholder substitution; unknown placeholders are kept as written
fn fill(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let name = &after[..close];
                match args.iter().find(|(k, _)| *k == name) {
                    Some((_, value)) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Placeholder names used by a template, in order of appearance
pub fn placeholders(template: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                names.push(&after[..close]);
                rest = &after[close + 1..];
            }
            None => break,
        }
    }
    names
}

/// Money as shown to callers: whole amounts without decimals
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.0}", amount)
    } else {
        format!("{:.2}", amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_catalog_complete_for_both_languages() {
        let catalog = MessageCatalog::new();
        for key in TemplateKey::ALL {
            let en = catalog.template(Language::English, key);
            let hi = catalog.template(Language::Hindi, key);
            assert!(!en.trim().is_empty(), "empty en template {:?}", key);
            assert!(!hi.trim().is_empty(), "empty hi template {:?}", key);
            assert!(
                !en.chars().any(|c| ('\u{0900}'..='\u{097F}').contains(&c)),
                "en template {:?} contains Devanagari",
                key
            );
            assert_eq!(
                Language::detect(hi),
                Language::Hindi,
                "hi template {:?} is not in Devanagari",
                key
            );
        }
    }

    #[test]
    fn test_placeholders_match_across_languages() {
        let catalog = MessageCatalog::new();
        for key in TemplateKey::ALL {
            let en: BTreeSet<_> = placeholders(catalog.template(Language::English, key))
                .into_iter()
                .collect();
            let hi: BTreeSet<_> = placeholders(catalog.template(Language::Hindi, key))
                .into_iter()
                .collect();
            assert_eq!(en, hi, "placeholder mismatch for {:?}", key);
        }
    }

    #[test]
    fn test_all_keys_distinct() {
        let keys: std::collections::HashSet<_> = TemplateKey::ALL.iter().collect();
        assert_eq!(keys.len(), TemplateKey::ALL.len());
    }

    #[test]
    fn test_menus_are_distinct() {
        let catalog = MessageCatalog::new();
        for lang in Language::all() {
            let user = catalog.template(*lang, TemplateKey::MenuUser);
            let vendor = catalog.template(*lang, TemplateKey::MenuVendor);
            let other = catalog.template(*lang, TemplateKey::MenuOther);
            assert_ne!(user, vendor);
            assert_ne!(user, other);
            assert_ne!(vendor, other);
        }
    }

    #[test]
    fn test_render_value_is_verbatim() {
        let catalog = MessageCatalog::new();
        let text =
            catalog.render_value(Language::English, TemplateKey::ReturnReceived, "RET-42 {name}");
        assert!(text.contains("RET-42 {name}"));

        let text = catalog.render_value(Language::Hindi, TemplateKey::VendorIdReceived, "VnD_007");
        assert!(text.contains("VnD_007"));
    }

    #[test]
    fn test_fill() {
        assert_eq!(fill("a {x} b {y}", &[("x", "1"), ("y", "2")]), "a 1 b 2");
        assert_eq!(fill("{missing} stays", &[]), "{missing} stays");
        assert_eq!(fill("open { only", &[("only", "x")]), "open { only");
        assert_eq!(fill("no placeholders", &[("x", "1")]), "no placeholders");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(499.0), "499");
        assert_eq!(format_amount(499.5), "499.50");
        assert_eq!(format_amount(0.0), "0");
    }
}
