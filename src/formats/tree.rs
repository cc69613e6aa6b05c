//! Tree view of a token sequence
//!
//! One line per token, two spaces of indentation per nesting level:
//!
//! ```text
//! metadata-info
//!   comment "///"
//!   · " "
//!   metadata-key/property "url"
//! ```
//!
//! Raw text shows as `·`. Aliases follow the type after a slash. Text is quoted and
//! escaped so whitespace stays visible.

use super::registry::{FormatError, Formatter};
use crate::token::{Content, Token};
use std::fmt::Write;

pub struct TreeFormatter;

impl Formatter for TreeFormatter {
    fn name(&self) -> &str {
        "tree"
    }

    fn serialize(&self, tokens: &[Token]) -> Result<String, FormatError> {
        let mut out = String::new();
        write_level(&mut out, tokens, 0)
            .map_err(|e| FormatError::Serialization(e.to_string()))?;
        Ok(out)
    }

    fn description(&self) -> &str {
        "One line per token, nesting shown by indentation"
    }
}

fn write_level(out: &mut String, tokens: &[Token], depth: usize) -> std::fmt::Result {
    for token in tokens {
        let indent = "  ".repeat(depth);
        match token {
            Token::Text(text) => writeln!(out, "{indent}· {text:?}")?,
            Token::Node(node) => {
                let label = match &node.alias {
                    Some(alias) => format!("{}/{}", node.kind, alias),
                    None => node.kind.clone(),
                };
                match &node.content {
                    Content::Text(text) => writeln!(out, "{indent}{label} {text:?}")?,
                    Content::Tokens(children) => {
                        writeln!(out, "{indent}{label}")?;
                        write_level(out, children, depth + 1)?;
                    }
                }
            }
        }
    }
    Ok(())
}
