//! Data model for the normalized source grammar.
//!
//! These records are plain data: the extractor builds them once, the
//! synthesizer reads them, nothing mutates them in between. Keyword lists
//! and the line-comment list are deduplicated and sorted during extraction;
//! the synthesizer relies on that and does not re-deduplicate.

use std::collections::BTreeMap;

/// The normalized representation extracted from an `.xshd` document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceGrammar {
    /// Declared language name. Absence is a hard failure at synthesis time.
    pub name: Option<String>,
    /// File extensions in declaration order. Leading dots are kept here and
    /// stripped at emission time.
    pub extensions: Vec<String>,
    /// Category label -> deduplicated, lexicographically sorted keywords.
    /// Categories shared across rule-sets are merged additively.
    pub keyword_groups: BTreeMap<String, Vec<String>>,
    /// Line-comment start markers, deduplicated and sorted.
    pub line_comment_starts: Vec<String>,
    /// Block-comment delimiter pairs in source order, deduplicated pairwise.
    pub block_comments: Vec<BlockCommentPair>,
    /// String delimiter records in source order.
    pub strings: Vec<StringRule>,
    /// True when the source declares any digit-styling rule at all. No
    /// numeric-format detail is preserved.
    pub digits_present: bool,
    /// Per-rule-set local records. The first rule-set's `ignore_case` flag
    /// becomes the single global case-sensitivity setting.
    pub rule_sets: Vec<RuleSetGrammar>,
    /// Every span from every rule-set, in source order.
    pub spans: Vec<Span>,
}

impl SourceGrammar {
    /// Global case-sensitivity flag: taken from the first rule-set, false
    /// when there is none. A documented simplification of the format, not a
    /// per-rule-set setting.
    pub fn ignore_case(&self) -> bool {
        self.rule_sets.first().is_some_and(|rs| rs.ignore_case)
    }
}

/// A block-comment start/end delimiter pair, captured together at extraction
/// time so multiple distinct block-comment styles stay correctly paired.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlockCommentPair {
    pub start: String,
    pub end: String,
}

/// A string region definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringRule {
    pub begin: String,
    pub end: String,
    pub name: Option<String>,
    /// True when the string may not span lines.
    pub stop_at_eol: bool,
}

/// The local extraction result for a single `RuleSet` element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSetGrammar {
    pub ignore_case: bool,
    pub delimiters: Option<String>,
    pub keyword_groups: BTreeMap<String, Vec<String>>,
    pub spans: Vec<Span>,
}

/// A generic span rule: a delimited region of text with an optional style
/// classification carried in its `name` and `rule` labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Span {
    pub name: Option<String>,
    pub rule: Option<String>,
    pub begin: Option<String>,
    pub end: Option<String>,
    pub stop_at_eol: bool,
    pub multiline: bool,
}

impl Span {
    /// Case-insensitive substring test over both the span name and its rule
    /// label.
    pub fn label_contains(&self, needle: &str) -> bool {
        let contains = |label: &Option<String>| {
            label
                .as_deref()
                .is_some_and(|l| l.to_lowercase().contains(needle))
        };
        contains(&self.name) || contains(&self.rule)
    }

    /// Whether this span describes a comment region. One span can be
    /// comment-like and string-like at the same time; it then lands in both
    /// intermediate buckets.
    pub fn is_comment_like(&self) -> bool {
        self.label_contains("comment")
    }

    /// Whether this span describes a string or character literal region.
    pub fn is_string_like(&self) -> bool {
        self.label_contains("string") || self.label_contains("char")
    }
}
