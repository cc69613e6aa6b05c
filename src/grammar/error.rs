//! Errors raised while loading or compiling a grammar.

use std::fmt;

/// A malformed grammar. Always raised at load time, never while tokenizing.
#[derive(Debug, Clone, PartialEq)]
pub enum GrammarError {
    /// A rule without a pattern, or with an empty one
    MissingPattern { entry: String },
    /// A pattern the regex engine rejects
    InvalidPattern {
        entry: String,
        pattern: String,
        message: String,
    },
    /// A `capture` rule whose pattern has no group to take the token from
    MissingCaptureGroup { entry: String, pattern: String },
    /// An entry with an empty rule list
    NoRules { entry: String },
    /// Two entries with the same type name in one grammar
    DuplicateEntry { entry: String },
    /// `inside` names a grammar the definition does not declare
    UnknownGrammar { name: String },
    /// `inside` references loop back onto themselves
    CyclicReference { chain: Vec<String> },
    /// The definition document could not be read or parsed
    Definition { message: String },
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::MissingPattern { entry } => {
                write!(f, "Rule for '{entry}' has no pattern")
            }
            GrammarError::InvalidPattern {
                entry,
                pattern,
                message,
            } => write!(f, "Invalid pattern for '{entry}' ({pattern}): {message}"),
            GrammarError::MissingCaptureGroup { entry, pattern } => write!(
                f,
                "Rule for '{entry}' uses capture but its pattern has no group: {pattern}"
            ),
            GrammarError::NoRules { entry } => write!(f, "Entry '{entry}' has no rules"),
            GrammarError::DuplicateEntry { entry } => {
                write!(f, "Entry '{entry}' is declared more than once")
            }
            GrammarError::UnknownGrammar { name } => write!(f, "Unknown grammar '{name}'"),
            GrammarError::CyclicReference { chain } => {
                write!(f, "Cyclic grammar reference: {}", chain.join(" -> "))
            }
            GrammarError::Definition { message } => {
                write!(f, "Invalid grammar definition: {message}")
            }
        }
    }
}

impl std::error::Error for GrammarError {}
