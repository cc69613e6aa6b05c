//! # fml-highlight
//!
//! A prioritized, nested regex lexer for syntax highlighting, shipped with a grammar for
//! the FHIR Mapping Language (FML).
//!
//! A [Grammar] is an ordered list of token types, each with one or more regex rules.
//! Earlier types win: once text is claimed, later rules never see it. A rule may carry a
//! nested grammar that re-tokenizes the text it matched.
//!
//! ```text
//! use fml_highlight::languages::fml;
//!
//! let tokens = fml::tokenize("src.name -> tgt.name");
//! // [path "src.name"] " " [transformation-arrow "->"] " " [path "tgt.name"]
//! ```
//!
//! Modules:
//!
//! - [grammar]: compiled grammars, the builder API and YAML definitions
//! - [engine]: the tokenizer
//! - [token]: the token tree
//! - [languages]: language registry and the built-in FML grammar
//! - [formats]: json, tree and html output
//! - [config]: layered TOML configuration for the command line tool

pub mod config;
pub mod engine;
pub mod formats;
pub mod grammar;
pub mod languages;
pub mod token;

pub use engine::tokenize;
pub use grammar::{Grammar, GrammarError, Rule, RuleSpec};
pub use token::{Content, Token, TokenNode};
