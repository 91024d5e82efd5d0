//! Extraction of the normalized source grammar from `.xshd` XML.
//!
//! The xshd format nests rule definitions one level deep: a root
//! `SyntaxDefinition` element carries `name`/`extensions` attributes, an
//! optional `Digits` child, and top-level `RuleSet` children holding
//! `Delimiters`, `KeyWords` and `Span` declarations. Deeper rule-set
//! hierarchies are out of scope.

pub mod document;
pub mod extractor;

pub use document::{BlockCommentPair, RuleSetGrammar, SourceGrammar, Span, StringRule};
pub use extractor::{extract_file, extract_str, ExtractError};
