//! Shared HTML helpers for the markup-based parsers.

use scraper::{ElementRef, Html, Node};

/// Elements whose text is never visible.
const INVISIBLE_ELEMENTS: &[&str] = &["script", "style", "template", "noscript"];

/// Returns the visible text of a document: every text node stripped, empty
/// nodes dropped, remaining nodes joined with `separator`.
pub fn visible_text(document: &Html, separator: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for node in document.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node
            .parent()
            .and_then(|p| p.value().as_element())
            .map(|e| INVISIBLE_ELEMENTS.contains(&e.name()))
            .unwrap_or(false);
        if hidden {
            continue;
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }

    parts.join(separator)
}

/// Concatenates the stripped text fragments of an element.
pub fn stripped_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .concat()
}
