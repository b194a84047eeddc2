//! Free-text email parser.
//!
//! Each field has an ordered list of strategies; the first one that yields
//! a non-empty value wins. Only resolved fields end up in the result.

use std::sync::LazyLock;

use mail_parser::MessageParser;
use regex::Regex;
use tracing::debug;

use crate::classifier::GuardedClassifier;
use crate::record::FieldMap;

const NAME_LABELS: &str = r"ονοματεπ[ωώ]νυμο|[οό]νομα|name";
const EMAIL_LABELS: &str = r"ηλεκτρονικ[οό][^\S\n]+ταχυδρομε[ιί]ο|e-?mail";
const PHONE_LABELS: &str =
    r"τηλ[εέ]φωνο|κινητ[οό]|τηλ\.?|telephone|phone|mobile|tel\.?";

const GENERIC_LOCAL_PARTS: &[&str] = &["info", "contact", "support"];

fn labeled(labels: &str) -> Regex {
    Regex::new(&format!(
        r"(?im)\b(?:{labels})[^\S\n]*:[^\S\n]*(?:\n[^\S\n]*)?(.*)$"
    ))
    .unwrap()
}

fn bulleted(labels: &str) -> Regex {
    Regex::new(&format!(
        r"(?im)^[^\S\n]*[-*•–·‣][^\S\n]*(?:{labels})(?:[^\S\n]*[:\-–][^\S\n]*|[^\S\n]+)(.*)$"
    ))
    .unwrap()
}

static RE_NAME_LABELED: LazyLock<Regex> = LazyLock::new(|| labeled(NAME_LABELS));
static RE_NAME_BULLETED: LazyLock<Regex> = LazyLock::new(|| bulleted(NAME_LABELS));
static RE_EMAIL_LABELED: LazyLock<Regex> = LazyLock::new(|| labeled(EMAIL_LABELS));
static RE_EMAIL_BULLETED: LazyLock<Regex> = LazyLock::new(|| bulleted(EMAIL_LABELS));
static RE_PHONE_LABELED: LazyLock<Regex> = LazyLock::new(|| labeled(PHONE_LABELS));
static RE_PHONE_BULLETED: LazyLock<Regex> = LazyLock::new(|| bulleted(PHONE_LABELS));

static RE_ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}\b").unwrap());
static RE_GREEK_PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:(?:\+30|0030)[ -]?)?(?:69|2\d)\d(?:[ -]?\d){7}").unwrap()
});

/// A named way of resolving one field from the searchable text.
pub type Strategy = (&'static str, fn(&str) -> Option<String>);

/// Strategies for each output key, in precedence order.
pub const FIELD_STRATEGIES: &[(&str, &[Strategy])] = &[
    (
        "name",
        &[("labeled", name_labeled), ("bulleted", name_bulleted)],
    ),
    (
        "email",
        &[
            ("labeled", email_labeled),
            ("bulleted", email_bulleted),
            ("address scan", scan_address),
        ],
    ),
    (
        "phone",
        &[
            ("labeled", phone_labeled),
            ("bulleted", phone_bulleted),
            ("greek number scan", scan_greek_phone),
        ],
    ),
];

fn name_labeled(text: &str) -> Option<String> {
    first_value(&RE_NAME_LABELED, text)
}

fn name_bulleted(text: &str) -> Option<String> {
    first_value(&RE_NAME_BULLETED, text)
}

fn email_labeled(text: &str) -> Option<String> {
    first_value(&RE_EMAIL_LABELED, text)
}

fn email_bulleted(text: &str) -> Option<String> {
    first_value(&RE_EMAIL_BULLETED, text)
}

fn phone_labeled(text: &str) -> Option<String> {
    first_value(&RE_PHONE_LABELED, text)
}

fn phone_bulleted(text: &str) -> Option<String> {
    first_value(&RE_PHONE_BULLETED, text)
}

/// Email parser with optional classification.
#[derive(Clone, Default)]
pub struct EmailParser {
    classifier: Option<GuardedClassifier>,
}

impl EmailParser {
    /// A parser that never adds a `category`.
    pub fn new() -> Self {
        Self { classifier: None }
    }

    pub fn with_classifier(classifier: Option<GuardedClassifier>) -> Self {
        Self { classifier }
    }

    pub fn has_classifier(&self) -> bool {
        self.classifier.is_some()
    }

    /// Extracts contact fields and, when a classifier is set, a category.
    pub fn parse(&self, raw: &str) -> FieldMap {
        let text = searchable_text(raw);
        let mut data = extract_fields(&text);

        if let Some(classifier) = &self.classifier {
            if let Some(category) = classifier.classify(&text) {
                data.insert("category".to_string(), category.label().to_string());
            }
        }

        data
    }
}

/// Parses an email without classification.
pub fn parse_email(raw: &str) -> FieldMap {
    EmailParser::new().parse(raw)
}

fn extract_fields(text: &str) -> FieldMap {
    let mut data = FieldMap::new();

    for (key, strategies) in FIELD_STRATEGIES {
        for (strategy, extract) in strategies.iter() {
            if let Some(value) = extract(text) {
                debug!(field = *key, strategy = *strategy, "Resolved email field");
                data.insert(key.to_string(), value);
                break;
            }
        }
    }

    data
}

/// The raw text, plus the decoded body of a MIME message when that body
/// does not already appear verbatim.
fn searchable_text(raw: &str) -> String {
    let decoded = MessageParser::default()
        .parse(raw.as_bytes())
        .and_then(|message| message.body_text(0).map(|body| body.into_owned()));

    match decoded {
        Some(body) if !body.trim().is_empty() && !raw.contains(body.trim()) => {
            format!("{raw}\n{body}")
        }
        _ => raw.to_string(),
    }
}

fn first_value(re: &Regex, text: &str) -> Option<String> {
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .find(|v| !v.is_empty())
        .map(str::to_string)
}

fn scan_address(text: &str) -> Option<String> {
    let addresses: Vec<&str> = RE_ADDRESS.find_iter(text).map(|m| m.as_str()).collect();

    addresses
        .iter()
        .find(|address| !is_generic(address))
        .or_else(|| addresses.first())
        .map(|address| address.to_string())
}

fn is_generic(address: &str) -> bool {
    let local = address.split('@').next().unwrap_or_default();
    GENERIC_LOCAL_PARTS
        .iter()
        .any(|generic| local.eq_ignore_ascii_case(generic))
}

fn scan_greek_phone(text: &str) -> Option<String> {
    RE_GREEK_PHONE
        .find_iter(text)
        .find(|m| {
            let before = text[..m.start()].chars().next_back();
            let after = text[m.end()..].chars().next();
            let digit = |c: Option<char>| c.is_some_and(|c| c.is_ascii_digit());
            !digit(before) && !digit(after)
        })
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{ClassifyError, EmailCategory, EmailClassifier};
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_parse_email_basic() {
        let raw = "
    From: John Doe <john@example.com>
    Subject: New Client

    Name: John
    Email: john@example.com
    Phone: 5551234
    ";

        let data = parse_email(raw);

        assert_eq!(data["name"], "John");
        assert_eq!(data["email"], "john@example.com");
        assert_eq!(data["phone"], "5551234");
        assert!(!data.contains_key("category"));
    }

    #[test]
    fn test_greek_labels() {
        let raw = "Ονοματεπώνυμο: Γιάννης Παπαδόπουλος\n\
                   Ηλεκτρονικό ταχυδρομείο: giannis@example.gr\n\
                   Τηλ.: 210 1234567\n";

        let data = parse_email(raw);

        assert_eq!(data["name"], "Γιάννης Παπαδόπουλος");
        assert_eq!(data["email"], "giannis@example.gr");
        assert_eq!(data["phone"], "210 1234567");
    }

    #[test]
    fn test_labels_are_case_insensitive() {
        let data = parse_email("NAME: Maria\nE-MAIL: maria@example.com\nΚΙΝΗΤΟ: 6912345678");

        assert_eq!(data["name"], "Maria");
        assert_eq!(data["email"], "maria@example.com");
        assert_eq!(data["phone"], "6912345678");
    }

    #[test]
    fn test_empty_label_falls_through_to_later_occurrence() {
        let data = parse_email("Name:\n\nName: Eleni");
        assert_eq!(data["name"], "Eleni");
    }

    #[test]
    fn test_label_value_on_next_line() {
        let data = parse_email("Name:\nJohn\nEmail:\njohn@example.com\nPhone:\n5551234\n");
        assert_eq!(data["name"], "John");
        assert_eq!(data["email"], "john@example.com");
        assert_eq!(data["phone"], "5551234");
    }

    #[test]
    fn test_label_reads_at_most_one_line_ahead() {
        let data = parse_email("Name:\n\nJohn");
        assert!(!data.contains_key("name"));
    }

    #[test]
    fn test_bulleted_variants() {
        let raw = "Details below:\n\
                   - Name Nikos\n\
                   • Email - nikos@example.com\n\
                   * Phone 6987654321\n";

        let data = parse_email(raw);

        assert_eq!(data["name"], "Nikos");
        assert_eq!(data["email"], "nikos@example.com");
        assert_eq!(data["phone"], "6987654321");
    }

    #[test]
    fn test_greek_bulleted_name() {
        let data = parse_email("• Όνομα - Γιάννης");
        assert_eq!(data["name"], "Γιάννης");
    }

    #[test]
    fn test_labeled_beats_bulleted() {
        let data = parse_email("- Name Bullet\nName: Label");
        assert_eq!(data["name"], "Label");
    }

    #[test]
    fn test_address_scan_prefers_personal_addresses() {
        let raw = "Write to info@acme.gr or to eleni.k@acme.gr for details.";
        assert_eq!(parse_email(raw)["email"], "eleni.k@acme.gr");
    }

    #[test]
    fn test_address_scan_falls_back_to_generic() {
        let raw = "Contact support@acme.gr or info@acme.gr.";
        assert_eq!(parse_email(raw)["email"], "support@acme.gr");
    }

    #[test]
    fn test_greek_phone_scan() {
        assert_eq!(
            parse_email("Call me at +30 694 123 4567 tomorrow")["phone"],
            "+30 694 123 4567"
        );
        assert_eq!(parse_email("office 210-123-4567")["phone"], "210-123-4567");
        assert_eq!(parse_email("0030 2310 555 123")["phone"], "0030 2310 555 123");
    }

    #[test]
    fn test_greek_phone_scan_ignores_longer_digit_runs() {
        let data = parse_email("Order reference 1269123456789 confirmed");
        assert!(!data.contains_key("phone"));
    }

    #[test]
    fn test_nothing_resolved_is_empty() {
        assert!(parse_email("Hello there, just saying hi.").is_empty());
        assert!(parse_email("").is_empty());
    }

    #[test]
    fn test_mime_body_is_searched() {
        let raw = "From: sender@example.com\r\n\
                   To: office@example.com\r\n\
                   Subject: Quote\r\n\
                   MIME-Version: 1.0\r\n\
                   Content-Type: text/plain; charset=utf-8\r\n\
                   Content-Transfer-Encoding: base64\r\n\
                   \r\n\
                   TmFtZTogQW5uYQ==\r\n";

        let data = parse_email(raw);

        assert_eq!(data["name"], "Anna");
    }

    struct Fixed(EmailCategory);

    impl EmailClassifier for Fixed {
        fn classify(&self, _text: &str) -> Result<EmailCategory, ClassifyError> {
            Ok(self.0)
        }
    }

    struct Unconfigured;

    impl EmailClassifier for Unconfigured {
        fn classify(&self, _text: &str) -> Result<EmailCategory, ClassifyError> {
            Err(ClassifyError::NotConfigured)
        }
    }

    fn parser_with(inner: impl EmailClassifier + 'static) -> EmailParser {
        EmailParser::with_classifier(Some(GuardedClassifier::new(
            Arc::new(inner),
            Duration::from_secs(1),
        )))
    }

    #[test]
    fn test_category_added_when_classified() {
        let data = parser_with(Fixed(EmailCategory::ClientInquiry)).parse("Name: John");

        assert_eq!(data["name"], "John");
        assert_eq!(data["category"], "Client Inquiry");
    }

    #[test]
    fn test_category_omitted_on_classifier_error() {
        let parser = parser_with(Unconfigured);
        assert!(parser.has_classifier());

        let data = parser.parse("Name: John");

        assert_eq!(data["name"], "John");
        assert!(!data.contains_key("category"));
    }
}
