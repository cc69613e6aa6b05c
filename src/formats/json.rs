//! JSON output
//!
//! Raw text leaves become strings, nodes become `{"type", "content", "alias"?}` objects,
//! the shape browser-side highlighters consume.

use super::registry::{FormatError, Formatter};
use crate::token::Token;

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize(&self, tokens: &[Token]) -> Result<String, FormatError> {
        serde_json::to_string_pretty(tokens)
            .map_err(|e| FormatError::Serialization(e.to_string()))
    }

    fn description(&self) -> &str {
        "Token tree as JSON"
    }
}
