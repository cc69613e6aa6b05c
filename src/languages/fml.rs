//! FHIR Mapping Language (FML)
//!
//! The grammar lives in `grammars/fml.yaml` and is embedded at build time, so the
//! definition users copy as a starting point is the one the binary runs. It answers to
//! `fml`, `mapping` and `structuremap`.
//!
//! Token types, in priority order: metadata-info, comment, group-definition,
//! structure-keyword, rule-label, string, mode-keyword, transformation-keyword, function,
//! variable-binding, prefix, boolean, number, path, transformation-arrow,
//! conceptmap-operator, operator, identifier, punctuation.

use super::Language;
use crate::grammar::Grammar;
use crate::token::Token;
use once_cell::sync::Lazy;
use std::sync::Arc;

pub const DEFINITION: &str = include_str!("../../grammars/fml.yaml");

static FML: Lazy<Language> = Lazy::new(|| {
    Language::from_yaml(DEFINITION).expect("embedded FML grammar definition is valid")
});

pub fn language() -> Language {
    FML.clone()
}

pub fn grammar() -> Arc<Grammar> {
    Arc::clone(FML.grammar())
}

/// Tokenize FML source with the built-in grammar.
pub fn tokenize(source: &str) -> Vec<Token> {
    FML.tokenize(source)
}
