//! Data model for the emitted TextMate grammar document.
//!
//! The model mirrors the JSON shape directly: a top-level pattern list of
//! repository references plus the named repository itself. Repository entries
//! keep their insertion order when serialized, so emission order (comments,
//! strings, keywords, numbers, custom spans) survives into the document.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A single grammar pattern: a repository reference, a single-line match
/// rule, or a begin/end region with nested patterns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Pattern {
    Include {
        include: String,
    },
    Match {
        name: String,
        #[serde(rename = "match")]
        pattern: String,
    },
    Region {
        name: String,
        begin: String,
        end: String,
        patterns: Vec<Pattern>,
    },
}

impl Pattern {
    /// A `{"include": "#<key>"}` repository reference.
    pub fn include(key: &str) -> Self {
        Pattern::Include {
            include: format!("#{key}"),
        }
    }

    /// The self-reference nested into recursive regions.
    pub fn self_reference() -> Self {
        Pattern::include("self")
    }

    pub fn match_rule(name: String, pattern: String) -> Self {
        Pattern::Match { name, pattern }
    }

    pub fn region(name: String, begin: String, end: String, patterns: Vec<Pattern>) -> Self {
        Pattern::Region {
            name,
            begin,
            end,
            patterns,
        }
    }
}

/// A repository entry: `{"patterns": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternSet {
    pub patterns: Vec<Pattern>,
}

/// The named pattern repository, serialized as a JSON object whose keys keep
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Repository {
    entries: Vec<(String, PatternSet)>,
}

impl Repository {
    pub fn insert(&mut self, key: &str, patterns: Vec<Pattern>) {
        self.entries.push((key.to_string(), PatternSet { patterns }));
    }

    pub fn get(&self, key: &str) -> Option<&PatternSet> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, set)| set)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Repository {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, set) in &self.entries {
            map.serialize_entry(key, set)?;
        }
        map.end()
    }
}

/// The assembled output document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetGrammar {
    pub scope_name: String,
    pub file_types: Vec<String>,
    pub name: String,
    pub patterns: Vec<Pattern>,
    pub repository: Repository,
}

impl TargetGrammar {
    /// Serialize to indented JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
