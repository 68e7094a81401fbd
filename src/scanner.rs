//! String-literal extraction from source lines.
//!
//! One shared pattern covers every supported source type: an optional raw
//! prefix (`r`), an opening quote (`"`, `'`, or back-tick), a non-greedy run
//! of characters, and the matching closing quote. This is a heuristic, not a
//! parser — escaped quotes inside a literal are not specially handled, and
//! the scanner does not care whether the content is actually a path.

use regex::Regex;
use std::sync::OnceLock;

/// A quoted literal found in a line of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralMatch {
    /// Full matched text including prefix and quote delimiters.
    pub raw: String,
    /// Content between the quotes, exactly as written (escapes untouched).
    pub inner: String,
    /// Byte offset of the match start within the line.
    pub start: usize,
    /// Byte length of the full match.
    pub len: usize,
}

fn literal_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"r?("(.*?)"|'(.*?)'|`(.*?)`)"#).expect("Invalid regex pattern")
    })
}

/// Scan one line of text for quoted literals.
///
/// A fresh scan is performed per call, so scanning the same line twice yields
/// identical match sets (no stateful cursor). Matches are non-overlapping and
/// in left-to-right order.
pub fn scan(line: &str) -> Vec<LiteralMatch> {
    let mut matches = Vec::new();

    for caps in literal_pattern().captures_iter(line) {
        let whole = match caps.get(0) {
            Some(m) => m,
            None => continue,
        };
        let inner = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map(|m| m.as_str())
            .unwrap_or("");

        matches.push(LiteralMatch {
            raw: whole.as_str().to_string(),
            inner: inner.to_string(),
            start: whole.start(),
            len: whole.len(),
        });
    }

    matches
}
