//! Extraction helpers for free-form generator responses.
//!
//! Generators declare a plain-text output format in their prompts and pull
//! the fields back out with line-oriented patterns. Parsing is best-effort:
//! helpers return `Option`/empty collections and callers substitute
//! sentinels, never errors.

use regex::Regex;

/// First capture group of the first match, trimmed.
pub(crate) fn first_capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// First capture group of every match, trimmed, in document order.
pub(crate) fn all_captures(re: &Regex, text: &str) -> Vec<String> {
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().trim().to_string()))
        .collect()
}

/// Rest of the line following a literal `label`, trimmed.
///
/// Used for section headers whose exact wording varies per agent, so the
/// pattern is built on demand from the label.
pub(crate) fn labeled_line(text: &str, label: &str) -> Option<String> {
    let re = Regex::new(&format!(r"{}\s*([^\n]+)", regex::escape(label)))
        .expect("escaped label pattern should be valid");
    first_capture(&re, text)
}
