//! Greek HTML invoice parser.
//!
//! Works on the visible text of the markup, one text node per line, so that
//! line-anchored labels like `Πελάτης:` can pick up the following line.
//! Currency amounts are kept exactly as printed.

use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;

use super::html::visible_text;
use crate::record::FieldMap;

static RE_INVOICE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Αριθμός:\s*([A-Za-z0-9/-]+)").unwrap());
static RE_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Ημερομηνία:\s*([0-9]{2}/[0-9]{2}/[0-9]{4})").unwrap());
static RE_CUSTOMER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Πελάτης:\s*\n(.*)").unwrap());
static RE_NET_TOTAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Καθαρή Αξία:\s*(€[\d.,]+)").unwrap());
static RE_VAT_AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ΦΠΑ\s*24%:\s*(€[\d.,]+)").unwrap());
static RE_TOTAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"ΣΥΝΟΛΟ:\s*(€[\d.,]+)").unwrap());
static RE_NOTES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Σημειώσεις:\s*(.*)").unwrap());
static RE_DELIVERY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Παράδοση:\s*(.*)").unwrap());

/// Extracts invoice fields from HTML markup. Never fails.
///
/// The six mandatory keys are always present; `notes` and `delivery` only
/// when found.
pub fn parse_invoice(markup: &str) -> FieldMap {
    let document = Html::parse_document(markup);
    let text = visible_text(&document, "\n");
    parse_invoice_text(&text)
}

/// Applies the invoice lookups to already-extracted text.
pub fn parse_invoice_text(text: &str) -> FieldMap {
    let mandatory: [(&str, &LazyLock<Regex>); 6] = [
        ("invoice number", &RE_INVOICE_NUMBER),
        ("date", &RE_DATE),
        ("customer name", &RE_CUSTOMER),
        ("net total", &RE_NET_TOTAL),
        ("vat amount", &RE_VAT_AMOUNT),
        ("total", &RE_TOTAL),
    ];

    let mut data: FieldMap = mandatory
        .iter()
        .map(|(key, re)| (key.to_string(), find(re, text).unwrap_or_default()))
        .collect();

    for (key, re) in [("notes", &RE_NOTES), ("delivery", &RE_DELIVERY)] {
        if let Some(value) = find(re, text) {
            data.insert(key.to_string(), value);
        }
    }

    data
}

fn find(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|v| !v.is_empty())
}
