//! Output formats for token trees
//!
//! The engine stops at the token tree; these formatters are reference presentations of
//! it, selectable by name through [FormatRegistry].

mod html;
mod json;
mod registry;
mod tree;

pub use html::HtmlFormatter;
pub use json::JsonFormatter;
pub use registry::{FormatError, FormatRegistry, Formatter};
pub use tree::TreeFormatter;
