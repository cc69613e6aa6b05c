//! Output format lookup
//!
//! Formatters turn a token sequence into text and are looked up by name. The built-in set
//! is `html`, `json` and `tree`.

use crate::token::Token;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// No formatter under that name
    UnknownFormat { name: String, available: Vec<String> },
    /// The formatter failed to render the tokens
    Serialization(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::UnknownFormat { name, available } => write!(
                f,
                "Unknown format '{name}' (available: {})",
                available.join(", ")
            ),
            FormatError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for FormatError {}

/// Renders a token sequence as text.
pub trait Formatter: Send + Sync {
    fn name(&self) -> &str;

    fn serialize(&self, tokens: &[Token]) -> Result<String, FormatError>;

    /// One line shown by `list-formats`
    fn description(&self) -> &str {
        ""
    }
}

/// Formatters keyed by name, iterated in name order.
pub struct FormatRegistry {
    formatters: BTreeMap<String, Box<dyn Formatter>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        FormatRegistry {
            formatters: BTreeMap::new(),
        }
    }

    /// Registry holding the built-in formats
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(super::HtmlFormatter);
        registry.register(super::JsonFormatter);
        registry.register(super::TreeFormatter);
        registry
    }

    /// Add a formatter, replacing any with the same name.
    pub fn register<F: Formatter + 'static>(&mut self, formatter: F) {
        self.formatters
            .insert(formatter.name().to_string(), Box::new(formatter));
    }

    /// Look up a formatter; the error lists the available names.
    pub fn formatter(&self, name: &str) -> Result<&dyn Formatter, FormatError> {
        self.formatters
            .get(name)
            .map(|f| f.as_ref())
            .ok_or_else(|| FormatError::UnknownFormat {
                name: name.to_string(),
                available: self.names().map(str::to_string).collect(),
            })
    }

    pub fn serialize(&self, tokens: &[Token], format: &str) -> Result<String, FormatError> {
        self.formatter(format)?.serialize(tokens)
    }

    /// Registered names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.formatters.keys().map(String::as_str)
    }

    /// Registered formatters, sorted by name
    pub fn formatters(&self) -> impl Iterator<Item = &dyn Formatter> {
        self.formatters.values().map(|f| f.as_ref())
    }
}
