//! Assembly of a [`TargetGrammar`] from an extracted [`SourceGrammar`].
//!
//! Five emission passes, applied independently and in a fixed order:
//! comments, strings, keywords, numbers, generic spans. Each pass fills one
//! repository entry; empty passes leave no entry and no top-level reference.

use crate::textmate::classify::{keyword_scope, span_scope, SpanScope, PREPROCESSOR_STEM};
use crate::textmate::escape::escape_literal;
use crate::textmate::grammar::{Pattern, Repository, TargetGrammar};
use crate::xshd::document::SourceGrammar;
use std::collections::HashSet;
use std::fmt;

/// Errors raised while synthesizing a target grammar.
#[derive(Debug, Clone, PartialEq)]
pub enum SynthesisError {
    /// The extracted record declares no language name; without it no scope
    /// names can be derived, so nothing is emitted.
    MissingName,
}

impl fmt::Display for SynthesisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthesisError::MissingName => {
                write!(f, "Source grammar declares no language name")
            }
        }
    }
}

impl std::error::Error for SynthesisError {}

/// The fixed pattern emitted when the source styles digits: a run of digits
/// with an optional single decimal fraction. No hex, octal or scientific
/// notation.
const NUMBER_PATTERN: &str = r"\b\d+(\.\d+)?\b";

/// Synthesize the output grammar. Fails when the source has no name; any
/// other sparseness (no keywords, no spans) yields a minimal but valid
/// document.
pub fn synthesize(source: &SourceGrammar) -> Result<TargetGrammar, SynthesisError> {
    let name = source
        .name
        .as_deref()
        .filter(|n| !n.is_empty())
        .ok_or(SynthesisError::MissingName)?;
    let key = language_key(name);
    let ignore_case = source.ignore_case();

    let mut repository = Repository::default();
    let mut patterns = Vec::new();
    let mut emit = |repository: &mut Repository, entry: &str, rules: Vec<Pattern>| {
        if !rules.is_empty() {
            repository.insert(entry, rules);
            patterns.push(Pattern::include(entry));
        }
    };

    emit(&mut repository, "comments", comment_rules(source, &key));
    emit(&mut repository, "strings", string_rules(source, &key));
    emit(
        &mut repository,
        "keywords",
        keyword_rules(source, &key, ignore_case),
    );
    if source.digits_present {
        emit(&mut repository, "numbers", number_rules(&key));
    }
    emit(
        &mut repository,
        "custom_spans",
        span_rules(source, &key, ignore_case),
    );

    Ok(TargetGrammar {
        scope_name: format!("source.{key}"),
        file_types: source
            .extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_string())
            .collect(),
        name: name.to_string(),
        patterns,
        repository,
    })
}

/// Normalized language key all derived identifiers build on: lowercase name
/// with spaces removed.
fn language_key(name: &str) -> String {
    name.to_lowercase().replace(' ', "")
}

fn possibly_case_insensitive(pattern: String, ignore_case: bool) -> String {
    if ignore_case {
        format!("(?i){pattern}")
    } else {
        pattern
    }
}

/// One match rule per line-comment marker, one region per block-comment
/// pair. Block comments nest a self-reference for recursive tokenization.
fn comment_rules(source: &SourceGrammar, key: &str) -> Vec<Pattern> {
    let mut rules = Vec::new();
    for start in &source.line_comment_starts {
        if start.is_empty() {
            continue;
        }
        let escaped = escape_literal(start);
        rules.push(Pattern::match_rule(
            format!("comment.line.{}.{}", escaped.replace(' ', "_"), key),
            format!("{escaped}.*$"),
        ));
    }
    for pair in &source.block_comments {
        if pair.start.is_empty() || pair.end.is_empty() {
            continue;
        }
        rules.push(Pattern::region(
            format!("comment.block.{key}"),
            escape_literal(&pair.start),
            escape_literal(&pair.end),
            vec![Pattern::self_reference()],
        ));
    }
    rules
}

/// One region per string record. The scope suffix is chosen by the quote
/// character in the begin marker; string bodies get a fixed escape rule
/// matching any backslash-prefixed character.
fn string_rules(source: &SourceGrammar, key: &str) -> Vec<Pattern> {
    let mut rules = Vec::new();
    for (index, string) in source.strings.iter().enumerate() {
        if string.begin.is_empty() || string.end.is_empty() {
            continue;
        }
        let style = if string.begin.contains('"') {
            "double"
        } else if string.begin.contains('\'') {
            "single"
        } else {
            "other"
        };
        let record = string
            .name
            .as_deref()
            .map(|n| n.to_lowercase().replace(' ', "_"))
            .unwrap_or_else(|| format!("unnamed_string_{index}"));
        let mut scope = format!("string.quoted.{style}.{record}.{key}");
        if string.stop_at_eol {
            scope.push_str(".no-multiline");
        }
        rules.push(Pattern::region(
            scope,
            escape_literal(&string.begin),
            escape_literal(&string.end),
            vec![Pattern::match_rule(
                format!("constant.character.escape.{key}"),
                r"\\.".to_string(),
            )],
        ));
    }
    rules
}

/// One match rule per keyword category. The alternation lists keywords
/// longest first so short keywords cannot shadow longer ones sharing a
/// prefix, wrapped in word boundaries on both ends.
fn keyword_rules(source: &SourceGrammar, key: &str, ignore_case: bool) -> Vec<Pattern> {
    let mut rules = Vec::new();
    for (category, words) in &source.keyword_groups {
        if words.is_empty() {
            continue;
        }
        let mut ordered: Vec<&str> = words.iter().map(String::as_str).collect();
        ordered.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        let alternation = ordered
            .iter()
            .map(|word| escape_literal(word))
            .collect::<Vec<_>>()
            .join("|");
        let pattern =
            possibly_case_insensitive(format!(r"\b({alternation})\b"), ignore_case);
        rules.push(Pattern::match_rule(
            format!("{}.{}", keyword_scope(category), key),
            pattern,
        ));
    }
    rules
}

fn number_rules(key: &str) -> Vec<Pattern> {
    vec![Pattern::match_rule(
        format!("constant.numeric.{key}"),
        NUMBER_PATTERN.to_string(),
    )]
}

/// Names of spans already absorbed into the comment or string buckets; those
/// must not be emitted again as generic spans.
fn handled_span_names(source: &SourceGrammar) -> HashSet<&str> {
    let mut handled = HashSet::new();
    for string in &source.strings {
        if let Some(name) = string.name.as_deref() {
            handled.insert(name);
        }
    }
    for span in &source.spans {
        if span.is_comment_like() {
            if let Some(name) = span.name.as_deref() {
                handled.insert(name);
            }
        }
    }
    handled
}

/// Emit every span not absorbed into the comment or string buckets.
///
/// A preprocessor-like span with a begin marker but no end marker becomes a
/// to-end-of-line match. Any other span needs a begin marker plus either an
/// end marker (region with self-nested patterns) or the stop-at-end-of-line
/// flag (single-line match); spans with neither are silently dropped.
fn span_rules(source: &SourceGrammar, key: &str, ignore_case: bool) -> Vec<Pattern> {
    let handled = handled_span_names(source);
    let mut rules = Vec::new();
    for span in &source.spans {
        let Some(name) = span.name.as_deref() else {
            continue;
        };
        if handled.contains(name) {
            continue;
        }
        let classified = span_scope(name, span.rule.as_deref().unwrap_or(""));
        let scope = match classified {
            SpanScope::Stem(stem) => format!("{stem}.{key}"),
            SpanScope::Meta => {
                format!("meta.{}.{}", name.to_lowercase().replace(' ', "_"), key)
            }
        };
        let preprocessor_like = classified == SpanScope::Stem(PREPROCESSOR_STEM);

        match (span.begin.as_deref(), span.end.as_deref()) {
            (Some(begin), None) if preprocessor_like => {
                rules.push(Pattern::match_rule(
                    scope,
                    format!("{}.*$", escape_literal(begin)),
                ));
            }
            (Some(begin), Some(end)) => {
                rules.push(Pattern::region(
                    scope,
                    possibly_case_insensitive(escape_literal(begin), ignore_case),
                    possibly_case_insensitive(escape_literal(end), ignore_case),
                    vec![Pattern::self_reference()],
                ));
            }
            (Some(begin), None) if span.stop_at_eol => {
                rules.push(Pattern::match_rule(
                    scope,
                    format!(
                        "{}.*$",
                        possibly_case_insensitive(escape_literal(begin), ignore_case)
                    ),
                ));
            }
            _ => {}
        }
    }
    rules
}
