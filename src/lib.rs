//! # xshd2tm
//!
//! Converts AvalonEdit/SharpDevelop `.xshd` syntax-highlighting definitions
//! into TextMate JSON grammars (`.tmLanguage.json`).
//!
//! The conversion is a two-stage pipeline with one-way data flow:
//!
//! 1. [`xshd::extractor`] parses the source XML into a normalized
//!    [`xshd::SourceGrammar`] record.
//! 2. [`textmate::synthesizer`] classifies the extracted rules into TextMate
//!    constructs and assembles the output [`textmate::TargetGrammar`].
//!
//! [`pipeline::convert_file`] ties the two stages together with file I/O.
//! Both records are transient: built once per conversion, never mutated after
//! handoff, discarded after serialization.

pub mod pipeline;
pub mod textmate;
pub mod xshd;
