//! Extraction of a [`SourceGrammar`] from `.xshd` XML.
//!
//! The XML is deserialized into a thin wire model (`Xml*` structs below) and
//! then folded into the domain records: each top-level `RuleSet` yields an
//! immutable [`RuleSetGrammar`], and a separate merge step folds the sequence
//! of locals into the global record, normalizing keyword and comment sets
//! along the way. Missing optional attributes and absent sub-elements degrade
//! to empty fields; only an unreadable path or ill-formed XML is an error.

use crate::xshd::document::{BlockCommentPair, RuleSetGrammar, SourceGrammar, Span, StringRule};
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors raised while extracting a source grammar.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractError {
    /// The source path did not resolve to a readable file.
    NotFound(PathBuf),
    /// The XML document is not well-formed.
    Malformed(String),
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::NotFound(path) => {
                write!(f, "Source file not found: {}", path.display())
            }
            ExtractError::Malformed(msg) => write!(f, "Invalid XML: {}", msg),
        }
    }
}

impl std::error::Error for ExtractError {}

/// Extract a source grammar from a file on disk.
pub fn extract_file(path: &Path) -> Result<SourceGrammar, ExtractError> {
    let xml =
        fs::read_to_string(path).map_err(|_| ExtractError::NotFound(path.to_path_buf()))?;
    extract_str(&xml)
}

/// Extract a source grammar from an XML string.
pub fn extract_str(xml: &str) -> Result<SourceGrammar, ExtractError> {
    let root: XmlSyntaxDefinition = quick_xml::de::from_str(xml)
        .map_err(|e| ExtractError::Malformed(e.to_string()))?;

    let extensions = root
        .extensions
        .as_deref()
        .map(split_extensions)
        .unwrap_or_default();
    let locals: Vec<RuleSetGrammar> = root.rule_sets.iter().map(extract_rule_set).collect();

    Ok(merge(root.name, extensions, root.digits.is_some(), locals))
}

/// Semicolon-delimited extension attribute: tokens trimmed, empties dropped.
fn split_extensions(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect()
}

/// Extract the local record for one `RuleSet` element.
fn extract_rule_set(rule_set: &XmlRuleSet) -> RuleSetGrammar {
    let mut local = RuleSetGrammar {
        ignore_case: is_true(&rule_set.ignorecase),
        delimiters: rule_set
            .delimiters
            .as_ref()
            .and_then(XmlTextElement::content),
        ..RuleSetGrammar::default()
    };

    for group in &rule_set.keywords {
        let category = group.name.clone().unwrap_or_else(|| "default".into());
        for key in &group.keys {
            if let Some(word) = key.word.as_deref().map(str::trim).filter(|w| !w.is_empty()) {
                local
                    .keyword_groups
                    .entry(category.clone())
                    .or_default()
                    .push(word.to_string());
            }
        }
    }

    for span in &rule_set.spans {
        local.spans.push(Span {
            name: span.name.clone(),
            rule: span.rule.clone(),
            begin: span.begin.as_ref().and_then(XmlTextElement::content),
            end: span.end.as_ref().and_then(XmlTextElement::content),
            stop_at_eol: is_true(&span.stopateol),
            multiline: is_true(&span.multiline),
        });
    }

    local
}

/// Fold the per-rule-set locals into the global source grammar.
///
/// Keyword categories union additively across rule-sets. Spans are copied
/// into the comment and string buckets when their labels classify them as
/// such; one span can land in several buckets. Normalization happens last so
/// the synthesizer receives deduplicated, order-normalized sets.
fn merge(
    name: Option<String>,
    extensions: Vec<String>,
    digits_present: bool,
    locals: Vec<RuleSetGrammar>,
) -> SourceGrammar {
    let mut grammar = SourceGrammar {
        name,
        extensions,
        digits_present,
        ..SourceGrammar::default()
    };

    for set in &locals {
        for (category, words) in &set.keyword_groups {
            grammar
                .keyword_groups
                .entry(category.clone())
                .or_default()
                .extend(words.iter().cloned());
        }
        for span in &set.spans {
            grammar.spans.push(span.clone());
            bucket_span(&mut grammar, span);
        }
    }
    grammar.rule_sets = locals;

    for words in grammar.keyword_groups.values_mut() {
        words.sort();
        words.dedup();
    }
    grammar.line_comment_starts.sort();
    grammar.line_comment_starts.dedup();
    // Block-comment pairs keep source order; only exact duplicates collapse.
    let mut seen = HashSet::new();
    grammar.block_comments.retain(|pair| seen.insert(pair.clone()));

    grammar
}

/// Copy a span into the comment and/or string buckets its labels place it in.
fn bucket_span(grammar: &mut SourceGrammar, span: &Span) {
    if span.is_comment_like() {
        if span.stop_at_eol && span.begin.is_some() {
            if let Some(begin) = &span.begin {
                grammar.line_comment_starts.push(begin.clone());
            }
        } else if span.multiline || !span.stop_at_eol {
            if let (Some(begin), Some(end)) = (&span.begin, &span.end) {
                grammar.block_comments.push(BlockCommentPair {
                    start: begin.clone(),
                    end: end.clone(),
                });
            }
        }
    }
    if span.is_string_like() {
        if let (Some(begin), Some(end)) = (&span.begin, &span.end) {
            grammar.strings.push(StringRule {
                begin: begin.clone(),
                end: end.clone(),
                name: span.name.clone(),
                stop_at_eol: span.stop_at_eol,
            });
        }
    }
}

/// Boolean xshd attributes are the literal string "true", compared
/// case-insensitively; anything else (including absence) is false.
fn is_true(attribute: &Option<String>) -> bool {
    attribute
        .as_deref()
        .is_some_and(|value| value.eq_ignore_ascii_case("true"))
}

// Wire model. Unknown attributes and elements (color, bold, italic, nested
// rule-sets) are ignored by deserialization; only the one-level nesting path
// the conversion cares about is mapped.

#[derive(Debug, Deserialize)]
struct XmlSyntaxDefinition {
    #[serde(rename = "@name")]
    name: Option<String>,
    #[serde(rename = "@extensions")]
    extensions: Option<String>,
    #[serde(rename = "Digits")]
    digits: Option<XmlDigits>,
    #[serde(rename = "RuleSet", default)]
    rule_sets: Vec<XmlRuleSet>,
}

/// Presence-only marker; the digit element's styling attributes carry no
/// pattern information.
#[derive(Debug, Deserialize)]
struct XmlDigits {}

#[derive(Debug, Deserialize)]
struct XmlRuleSet {
    #[serde(rename = "@ignorecase")]
    ignorecase: Option<String>,
    #[serde(rename = "Delimiters")]
    delimiters: Option<XmlTextElement>,
    #[serde(rename = "KeyWords", default)]
    keywords: Vec<XmlKeyWords>,
    #[serde(rename = "Span", default)]
    spans: Vec<XmlSpan>,
}

#[derive(Debug, Deserialize)]
struct XmlKeyWords {
    #[serde(rename = "@name")]
    name: Option<String>,
    #[serde(rename = "Key", default)]
    keys: Vec<XmlKey>,
}

#[derive(Debug, Deserialize)]
struct XmlKey {
    #[serde(rename = "@word")]
    word: Option<String>,
}

#[derive(Debug, Deserialize)]
struct XmlSpan {
    #[serde(rename = "@name")]
    name: Option<String>,
    #[serde(rename = "@rule")]
    rule: Option<String>,
    #[serde(rename = "@stopateol")]
    stopateol: Option<String>,
    #[serde(rename = "@multiline")]
    multiline: Option<String>,
    #[serde(rename = "Begin")]
    begin: Option<XmlTextElement>,
    #[serde(rename = "End")]
    end: Option<XmlTextElement>,
}

/// An element whose trimmed text content is the payload; empty or absent
/// text is treated as no payload at all.
#[derive(Debug, Deserialize)]
struct XmlTextElement {
    #[serde(rename = "$text")]
    text: Option<String>,
}

impl XmlTextElement {
    fn content(&self) -> Option<String> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0"?>
<SyntaxDefinition name="Python" extensions=".py;.pyw">
    <Digits name="Digits" color="DarkBlue"/>
    <RuleSet ignorecase="false">
        <Delimiters>&amp;()[]{}&lt;&gt;%:;.,=</Delimiters>
        <Span name="LineComment" rule="Comment" color="Green" stopateol="true">
            <Begin>#</Begin>
        </Span>
        <Span name="BlockComment" rule="Comment" color="Green" multiline="true">
            <Begin>&quot;&quot;&quot;</Begin>
            <End>&quot;&quot;&quot;</End>
        </Span>
        <Span name="String" rule="String" color="Sienna" stopateol="true">
            <Begin>"</Begin>
            <End>"</End>
        </Span>
        <Span name="Char" rule="Char" color="Sienna" stopateol="true">
            <Begin>'</Begin>
            <End>'</End>
        </Span>
        <KeyWords name="Keywords" bold="true" color="Blue">
            <Key word="def"/>
            <Key word="class"/>
            <Key word="if"/>
            <Key word="return"/>
        </KeyWords>
        <KeyWords name="UserKeywords" color="DarkMagenta">
            <Key word="self"/>
            <Key word="True"/>
        </KeyWords>
    </RuleSet>
</SyntaxDefinition>
"#;

    #[test]
    fn test_extracts_name_and_extensions() {
        let grammar = extract_str(SAMPLE).unwrap();
        assert_eq!(grammar.name.as_deref(), Some("Python"));
        assert_eq!(grammar.extensions, vec![".py", ".pyw"]);
    }

    #[test]
    fn test_extension_tokens_trimmed_and_empties_dropped() {
        let grammar =
            extract_str(r#"<SyntaxDefinition name="X" extensions=" .a ; ; .b;"/>"#).unwrap();
        assert_eq!(grammar.extensions, vec![".a", ".b"]);
    }

    #[test]
    fn test_digits_flag_set_regardless_of_attributes() {
        let grammar = extract_str(SAMPLE).unwrap();
        assert!(grammar.digits_present);

        let without = extract_str(r#"<SyntaxDefinition name="X"/>"#).unwrap();
        assert!(!without.digits_present);
    }

    #[test]
    fn test_keywords_sorted_and_categorized() {
        let grammar = extract_str(SAMPLE).unwrap();
        assert_eq!(
            grammar.keyword_groups["Keywords"],
            vec!["class", "def", "if", "return"]
        );
        assert_eq!(grammar.keyword_groups["UserKeywords"], vec!["True", "self"]);
    }

    #[test]
    fn test_shared_category_unions_across_rule_sets() {
        let xml = r#"<SyntaxDefinition name="X">
            <RuleSet>
                <KeyWords name="Keywords"><Key word="if"/><Key word="else"/></KeyWords>
            </RuleSet>
            <RuleSet>
                <KeyWords name="Keywords"><Key word="while"/><Key word="if"/></KeyWords>
            </RuleSet>
        </SyntaxDefinition>"#;
        let grammar = extract_str(xml).unwrap();
        assert_eq!(
            grammar.keyword_groups["Keywords"],
            vec!["else", "if", "while"]
        );
        assert_eq!(grammar.rule_sets.len(), 2);
        assert_eq!(
            grammar.rule_sets[1].keyword_groups["Keywords"],
            vec!["while", "if"]
        );
    }

    #[test]
    fn test_unnamed_keyword_block_gets_default_category() {
        let xml = r#"<SyntaxDefinition name="X">
            <RuleSet><KeyWords><Key word="go"/></KeyWords></RuleSet>
        </SyntaxDefinition>"#;
        let grammar = extract_str(xml).unwrap();
        assert_eq!(grammar.keyword_groups["default"], vec!["go"]);
    }

    #[test]
    fn test_empty_keyword_tokens_skipped() {
        let xml = r#"<SyntaxDefinition name="X">
            <RuleSet><KeyWords name="K"><Key word=""/><Key/><Key word="ok"/></KeyWords></RuleSet>
        </SyntaxDefinition>"#;
        let grammar = extract_str(xml).unwrap();
        assert_eq!(grammar.keyword_groups["K"], vec!["ok"]);
    }

    #[test]
    fn test_comment_spans_bucketed() {
        let grammar = extract_str(SAMPLE).unwrap();
        assert_eq!(grammar.line_comment_starts, vec!["#"]);
        assert_eq!(
            grammar.block_comments,
            vec![BlockCommentPair {
                start: "\"\"\"".into(),
                end: "\"\"\"".into(),
            }]
        );
    }

    #[test]
    fn test_block_comment_pairs_keep_source_order() {
        let xml = r#"<SyntaxDefinition name="X">
            <RuleSet>
                <Span name="BlockComment" multiline="true"><Begin>{-</Begin><End>-}</End></Span>
                <Span name="AltComment" multiline="true"><Begin>(*</Begin><End>*)</End></Span>
                <Span name="BlockComment" multiline="true"><Begin>{-</Begin><End>-}</End></Span>
            </RuleSet>
        </SyntaxDefinition>"#;
        let grammar = extract_str(xml).unwrap();
        assert_eq!(
            grammar.block_comments,
            vec![
                BlockCommentPair {
                    start: "{-".into(),
                    end: "-}".into()
                },
                BlockCommentPair {
                    start: "(*".into(),
                    end: "*)".into()
                },
            ]
        );
    }

    #[test]
    fn test_string_spans_bucketed_with_eol_flag() {
        let grammar = extract_str(SAMPLE).unwrap();
        assert_eq!(grammar.strings.len(), 2);
        assert_eq!(grammar.strings[0].begin, "\"");
        assert_eq!(grammar.strings[0].name.as_deref(), Some("String"));
        assert!(grammar.strings[0].stop_at_eol);
        assert_eq!(grammar.strings[1].begin, "'");
    }

    #[test]
    fn test_span_recorded_globally_and_in_rule_set() {
        let grammar = extract_str(SAMPLE).unwrap();
        assert_eq!(grammar.spans.len(), 4);
        assert_eq!(grammar.rule_sets[0].spans.len(), 4);
        assert_eq!(grammar.spans[0].name.as_deref(), Some("LineComment"));
    }

    #[test]
    fn test_delimiters_text_captured() {
        let grammar = extract_str(SAMPLE).unwrap();
        assert_eq!(
            grammar.rule_sets[0].delimiters.as_deref(),
            Some("&()[]{}<>%:;.,=")
        );
    }

    #[test]
    fn test_span_without_begin_and_end_kept_as_span_only() {
        let xml = r#"<SyntaxDefinition name="X">
            <RuleSet><Span name="Marker" stopateol="true"/></RuleSet>
        </SyntaxDefinition>"#;
        let grammar = extract_str(xml).unwrap();
        assert_eq!(grammar.spans.len(), 1);
        assert!(grammar.spans[0].begin.is_none());
        assert!(grammar.line_comment_starts.is_empty());
    }

    #[test]
    fn test_comment_span_without_end_is_not_a_block_comment() {
        let xml = r#"<SyntaxDefinition name="X">
            <RuleSet>
                <Span name="BlockComment" multiline="true"><Begin>/*</Begin></Span>
            </RuleSet>
        </SyntaxDefinition>"#;
        let grammar = extract_str(xml).unwrap();
        assert!(grammar.block_comments.is_empty());
        assert!(grammar.line_comment_starts.is_empty());
    }

    #[test]
    fn test_missing_name_degrades_to_none() {
        let grammar = extract_str(r#"<SyntaxDefinition extensions=".x"/>"#).unwrap();
        assert!(grammar.name.is_none());
        assert_eq!(grammar.extensions, vec![".x"]);
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        let result = extract_str("<root><open></root>");
        assert!(matches!(result, Err(ExtractError::Malformed(_))));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let result = extract_file(Path::new("no/such/file.xshd"));
        assert!(matches!(result, Err(ExtractError::NotFound(_))));
    }

    #[test]
    fn test_ignorecase_attribute_default_false() {
        let xml = r#"<SyntaxDefinition name="X">
            <RuleSet ignorecase="TRUE"/>
            <RuleSet/>
        </SyntaxDefinition>"#;
        let grammar = extract_str(xml).unwrap();
        assert!(grammar.rule_sets[0].ignore_case);
        assert!(!grammar.rule_sets[1].ignore_case);
        assert!(grammar.ignore_case());
    }

    #[test]
    fn test_span_in_both_comment_and_string_buckets() {
        // A label like "StringComment" classifies into both buckets.
        let xml = r#"<SyntaxDefinition name="X">
            <RuleSet>
                <Span name="StringComment" multiline="true"><Begin>--[</Begin><End>]--</End></Span>
            </RuleSet>
        </SyntaxDefinition>"#;
        let grammar = extract_str(xml).unwrap();
        assert_eq!(grammar.block_comments.len(), 1);
        assert_eq!(grammar.strings.len(), 1);
    }
}
