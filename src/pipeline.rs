//! Conversion pipeline: read the source file, extract, synthesize, write.
//!
//! All four error classes are terminal for the current conversion; a
//! malformed or absent input cannot become valid by retrying. The grammar is
//! validated (name present) and fully serialized before anything touches the
//! output path, so partial output is never left on disk.

use crate::textmate::grammar::TargetGrammar;
use crate::textmate::synthesizer;
use crate::xshd::document::SourceGrammar;
use crate::xshd::extractor::{self, ExtractError};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors raised by a conversion run.
#[derive(Debug, Clone, PartialEq)]
pub enum ConvertError {
    /// The source path did not resolve to a readable file.
    NotFound(PathBuf),
    /// The source XML is not well-formed.
    MalformedInput(String),
    /// The extracted record has no language name; nothing is written.
    InvalidGrammar(String),
    /// The output path could not be written.
    Write(String),
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::NotFound(path) => {
                write!(f, "Input file not found: {}", path.display())
            }
            ConvertError::MalformedInput(msg) => write!(f, "Invalid XML input: {}", msg),
            ConvertError::InvalidGrammar(msg) => write!(f, "Invalid grammar: {}", msg),
            ConvertError::Write(msg) => write!(f, "Could not write output: {}", msg),
        }
    }
}

impl std::error::Error for ConvertError {}

impl From<ExtractError> for ConvertError {
    fn from(error: ExtractError) -> Self {
        match error {
            ExtractError::NotFound(path) => ConvertError::NotFound(path),
            ExtractError::Malformed(msg) => ConvertError::MalformedInput(msg),
        }
    }
}

/// Run the full pipeline: `input` xshd file in, TextMate JSON out at
/// `output`.
pub fn convert_file(input: &Path, output: &Path) -> Result<(), ConvertError> {
    let source = extractor::extract_file(input)?;
    write_grammar(&source, output)
}

/// Convert an in-memory xshd document without touching the filesystem.
pub fn convert_str(xml: &str) -> Result<TargetGrammar, ConvertError> {
    let source = extractor::extract_str(xml)?;
    synthesize(&source)
}

/// Synthesize and serialize an already-extracted grammar to `output`.
pub fn write_grammar(source: &SourceGrammar, output: &Path) -> Result<(), ConvertError> {
    let grammar = synthesize(source)?;
    let json = grammar
        .to_json_pretty()
        .map_err(|e| ConvertError::Write(e.to_string()))?;
    fs::write(output, json).map_err(|e| ConvertError::Write(e.to_string()))?;
    Ok(())
}

fn synthesize(source: &SourceGrammar) -> Result<TargetGrammar, ConvertError> {
    synthesizer::synthesize(source)
        .map_err(|e| ConvertError::InvalidGrammar(e.to_string()))
}
