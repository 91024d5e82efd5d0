//! Literal-to-regex escaping for grammar delimiters.

use once_cell::sync::Lazy;
use regex::Regex;

/// The characters that carry meaning in TextMate regexes and must be
/// backslash-prefixed when a literal delimiter is embedded in a pattern.
static SPECIAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.?*+^$\[\]\\(){}|\-]").expect("escape character class is valid"));

/// Escape a literal delimiter for embedding in a regular expression.
///
/// Empty strings escape to empty strings.
pub fn escape_literal(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    SPECIAL.replace_all(text, r"\${0}").into_owned()
}
