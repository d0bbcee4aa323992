//! Minimal XML field extraction for GLS service responses.
//!
//! The directory and auth services answer with small SOAP documents. We only
//! ever need the text of a handful of named elements, so responses are
//! normalised (namespace declarations and `soap:` prefixes removed) and fields
//! are pulled out by tag name. Schema validation is out of scope.

use regex_lite::Regex;

/// Remove namespace declarations and `soap:` prefixes from a raw document.
pub fn strip_namespaces(raw: &str) -> String {
    let xmlns = Regex::new(r#"\s+xmlns(:[A-Za-z0-9]+)?="[^"]*""#).expect("static pattern");
    let stripped = xmlns.replace_all(raw, "");
    stripped.replace("soap:", "")
}

/// Text content of the first `<tag>...</tag>` element, trimmed.
///
/// Returns `None` for absent or self-closing elements.
pub fn text_of(doc: &str, tag: &str) -> Option<String> {
    let pattern = format!(r"(?s)<{tag}(?:\s[^>]*)?>(.*?)</{tag}>");
    let re = Regex::new(&pattern).ok()?;
    re.captures(doc)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Inner bodies of every `<tag>...</tag>` element in document order.
pub fn blocks_of(doc: &str, tag: &str) -> Vec<String> {
    let pattern = format!(r"(?s)<{tag}(?:\s[^>]*)?>(.*?)</{tag}>");
    let Ok(re) = Regex::new(&pattern) else {
        return Vec::new();
    };
    re.captures_iter(doc)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// Text of every simple child element in a block, in document order.
///
/// Used for lists whose item tag we do not care about (product tokens).
pub fn child_texts(block: &str) -> Vec<String> {
    let re = Regex::new(r"<[A-Za-z][A-Za-z0-9_]*>([^<]*)</[A-Za-z][A-Za-z0-9_]*>")
        .expect("static pattern");
    re.captures_iter(block)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().trim().to_string()))
        .collect()
}

/// Escape text for embedding in an XML element.
pub fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
