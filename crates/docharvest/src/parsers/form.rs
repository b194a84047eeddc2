//! Contact form parser.
//!
//! Always yields the full key set; a control that is missing or cannot be
//! located yields an empty string.

use scraper::{ElementRef, Html, Selector};

use super::html::stripped_text;
use crate::record::FieldMap;

/// Output key → `name` attribute of the form control.
pub const FORM_FIELDS: &[(&str, &str)] = &[
    ("full name", "full_name"),
    ("email", "email"),
    ("phone", "phone"),
    ("company", "company"),
    ("service", "service"),
    ("message", "message"),
    ("priority", "priority"),
    ("submission date", "submission_date"),
];

/// Extracts the form fields from HTML markup. Never fails.
pub fn parse_form(markup: &str) -> FieldMap {
    let document = Html::parse_document(markup);

    FORM_FIELDS
        .iter()
        .map(|(key, control)| (key.to_string(), control_value(&document, control)))
        .collect()
}

fn control_value(document: &Html, control: &str) -> String {
    let selector = format!(
        "input[name=\"{0}\"], textarea[name=\"{0}\"], select[name=\"{0}\"]",
        control
    );
    let Ok(selector) = Selector::parse(&selector) else {
        return String::new();
    };

    match document.select(&selector).next() {
        Some(element) => element_value(&element),
        None => String::new(),
    }
}

fn element_value(element: &ElementRef<'_>) -> String {
    match element.value().name() {
        "select" => {
            let Ok(selected) = Selector::parse("option[selected]") else {
                return String::new();
            };
            element
                .select(&selected)
                .next()
                .map(|option| stripped_text(&option))
                .unwrap_or_default()
        }
        "input" => element
            .value()
            .attr("value")
            .map(|v| v.trim().to_string())
            .unwrap_or_default(),
        _ => stripped_text(element),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected_keys() -> Vec<&'static str> {
        FORM_FIELDS.iter().map(|(key, _)| *key).collect()
    }

    #[test]
    fn test_parse_form_basic() {
        let html = r#"
        <form>
            <input name="full_name" value="John Doe">
            <input name="email" value="john@example.com">
            <input name="phone" value="5551234">
        </form>
        "#;

        let data = parse_form(html);

        assert_eq!(data["full name"], "John Doe");
        assert_eq!(data["email"], "john@example.com");
        assert_eq!(data["phone"], "5551234");
        for key in ["company", "service", "message", "priority", "submission date"] {
            assert_eq!(data[key], "", "{} should be empty", key);
        }
    }

    #[test]
    fn test_parse_form_invalid_markup_yields_all_keys_empty() {
        let data = parse_form("<html><broken>");

        assert_eq!(data.len(), 8);
        for key in expected_keys() {
            assert_eq!(data.get(key).map(String::as_str), Some(""), "key {}", key);
        }
    }

    #[test]
    fn test_parse_form_empty_input() {
        let data = parse_form("");
        assert_eq!(data.len(), 8);
        assert!(data.values().all(String::is_empty));
    }

    #[test]
    fn test_select_returns_selected_option_text() {
        let html = r#"
        <select name="priority">
            <option value="low">Low</option>
            <option value="high" selected> High </option>
        </select>
        <select name="service">
            <option>Consulting</option>
            <option>Audit</option>
        </select>
        "#;

        let data = parse_form(html);
        assert_eq!(data["priority"], "High");
        assert_eq!(data["service"], "");
    }

    #[test]
    fn test_textarea_content_and_trimmed_values() {
        let html = r#"
        <input name="company" value="  ACME Ltd  ">
        <input name="submission_date" value="2024-01-12">
        <textarea name="message">
            Please call me back.
        </textarea>
        "#;

        let data = parse_form(html);
        assert_eq!(data["company"], "ACME Ltd");
        assert_eq!(data["submission date"], "2024-01-12");
        assert_eq!(data["message"], "Please call me back.");
    }

    #[test]
    fn test_input_without_value_is_empty() {
        let data = parse_form(r#"<input name="email">"#);
        assert_eq!(data["email"], "");
    }

    #[test]
    fn test_first_control_in_document_order_wins() {
        let html = r#"
        <textarea name="phone">210 1234567</textarea>
        <input name="phone" value="999">
        "#;

        let data = parse_form(html);
        assert_eq!(data["phone"], "210 1234567");
    }
}
