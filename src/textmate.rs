//! Synthesis of TextMate grammars from extracted source grammars.

pub mod classify;
pub mod escape;
pub mod grammar;
pub mod synthesizer;

pub use grammar::{Pattern, PatternSet, Repository, TargetGrammar};
pub use synthesizer::{synthesize, SynthesisError};
