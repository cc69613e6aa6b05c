//! HTML output
//!
//! Every node becomes `<span class="token TYPE ALIAS...">`, nested for child tokens. An
//! alias may hold several space separated classes. Text is escaped; nothing else is added,
//! so the markup drops straight into a `<pre><code>` block.

use super::registry::{FormatError, Formatter};
use crate::token::{Content, Token};

pub struct HtmlFormatter;

impl Formatter for HtmlFormatter {
    fn name(&self) -> &str {
        "html"
    }

    fn serialize(&self, tokens: &[Token]) -> Result<String, FormatError> {
        let mut out = String::new();
        write_tokens(&mut out, tokens);
        Ok(out)
    }

    fn description(&self) -> &str {
        "HTML spans with token classes"
    }
}

fn write_tokens(out: &mut String, tokens: &[Token]) {
    for token in tokens {
        match token {
            Token::Text(text) => escape_into(out, text),
            Token::Node(node) => {
                out.push_str("<span class=\"token ");
                escape_into(out, &node.kind);
                if let Some(alias) = &node.alias {
                    for class in alias.split_whitespace() {
                        out.push(' ');
                        escape_into(out, class);
                    }
                }
                out.push_str("\">");
                match &node.content {
                    Content::Text(text) => escape_into(out, text),
                    Content::Tokens(children) => write_tokens(out, children),
                }
                out.push_str("</span>");
            }
        }
    }
}

fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenNode;

    #[test]
    fn test_html_spans() {
        let tokens = vec![
            Token::Node(TokenNode {
                kind: "parent-class".into(),
                content: Content::Text("Base".into()),
                alias: Some("class-name inherited".into()),
            }),
            Token::Text(" << ".into()),
            Token::Node(TokenNode {
                kind: "string".into(),
                content: Content::Tokens(vec![Token::Text("\"a&b\"".into())]),
                alias: None,
            }),
        ];

        assert_eq!(
            HtmlFormatter.serialize(&tokens).unwrap(),
            "<span class=\"token parent-class class-name inherited\">Base</span> &lt;&lt; \
             <span class=\"token string\">&quot;a&amp;b&quot;</span>"
        );
    }
}
