//! Token tree produced by the lexer engine.
//!
//! A tokenized source is a flat sequence of [Token]s at the top level. Raw text that no
//! rule claimed stays a [Token::Text] leaf; classified text becomes a [TokenNode]. A node
//! whose rule carries a nested grammar holds child tokens instead of a plain string.
//!
//! The sequence is always a partition of the input: [detokenize] gives back the exact
//! source, whitespace included.
//!
//! Serialization mirrors what highlighting front-ends expect: raw leaves serialize as bare
//! strings, nodes as `{"type", "content", "alias"?}` objects.

use serde::Serialize;
use std::collections::BTreeSet;

/// One element of a token sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Token {
    /// Text no rule classified.
    Text(String),
    /// Classified span.
    Node(TokenNode),
}

/// A classified span of source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenNode {
    #[serde(rename = "type")]
    pub kind: String,
    pub content: Content,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

/// Content of a [TokenNode]: its matched text, or the child tokens of a nested grammar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Content {
    Text(String),
    Tokens(Vec<Token>),
}

impl Token {
    /// Token type, `None` for raw text.
    pub fn kind(&self) -> Option<&str> {
        match self {
            Token::Text(_) => None,
            Token::Node(node) => Some(&node.kind),
        }
    }

    pub fn as_node(&self) -> Option<&TokenNode> {
        match self {
            Token::Text(_) => None,
            Token::Node(node) => Some(node),
        }
    }

    /// Source text covered by this token, children included.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) {
        match self {
            Token::Text(text) => out.push_str(text),
            Token::Node(node) => node.content.write_text(out),
        }
    }
}

impl TokenNode {
    /// Source text covered by this node, children included.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.content.write_text(&mut out);
        out
    }

    /// The matched string when no nested grammar was applied.
    pub fn as_str(&self) -> Option<&str> {
        match &self.content {
            Content::Text(text) => Some(text),
            Content::Tokens(_) => None,
        }
    }

    /// Child tokens when a nested grammar was applied.
    pub fn children(&self) -> Option<&[Token]> {
        match &self.content {
            Content::Text(_) => None,
            Content::Tokens(tokens) => Some(tokens),
        }
    }
}

impl Content {
    fn write_text(&self, out: &mut String) {
        match self {
            Content::Text(text) => out.push_str(text),
            Content::Tokens(tokens) => tokens.iter().for_each(|t| t.write_text(out)),
        }
    }
}

/// Concatenate the text of a token sequence back into source form.
pub fn detokenize(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        token.write_text(&mut out);
    }
    out
}

/// First top-level node of the given type.
pub fn find<'a>(tokens: &'a [Token], kind: &str) -> Option<&'a TokenNode> {
    tokens
        .iter()
        .filter_map(Token::as_node)
        .find(|node| node.kind == kind)
}

/// All top-level nodes of the given type, in source order.
pub fn filter<'a>(tokens: &'a [Token], kind: &str) -> Vec<&'a TokenNode> {
    tokens
        .iter()
        .filter_map(Token::as_node)
        .filter(|node| node.kind == kind)
        .collect()
}

/// Every token type present in the tree, nested levels included.
pub fn collect_kinds(tokens: &[Token]) -> BTreeSet<String> {
    fn walk(tokens: &[Token], kinds: &mut BTreeSet<String>) {
        for node in tokens.iter().filter_map(Token::as_node) {
            kinds.insert(node.kind.clone());
            if let Some(children) = node.children() {
                walk(children, kinds);
            }
        }
    }

    let mut kinds = BTreeSet::new();
    walk(tokens, &mut kinds);
    kinds
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(kind: &str, content: Content) -> Token {
        Token::Node(TokenNode {
            kind: kind.to_string(),
            content,
            alias: None,
        })
    }

    fn sample() -> Vec<Token> {
        vec![
            node("keyword", Content::Text("map".into())),
            Token::Text(" ".into()),
            node(
                "string",
                Content::Tokens(vec![
                    Token::Text("\"".into()),
                    node("url", Content::Text("http://x".into())),
                    Token::Text("\"".into()),
                ]),
            ),
        ]
    }

    #[test]
    fn test_detokenize_nested() {
        assert_eq!(detokenize(&sample()), "map \"http://x\"");
    }

    #[test]
    fn test_find_only_looks_at_top_level() {
        let tokens = sample();
        assert!(find(&tokens, "url").is_none());
        assert_eq!(find(&tokens, "keyword").and_then(TokenNode::as_str), Some("map"));
    }

    #[test]
    fn test_collect_kinds_recurses() {
        let kinds = collect_kinds(&sample());
        let kinds: Vec<_> = kinds.iter().map(String::as_str).collect();
        assert_eq!(kinds, vec!["keyword", "string", "url"]);
    }

    #[test]
    fn test_serialize_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json[0]["type"], "keyword");
        assert_eq!(json[0]["content"], "map");
        assert!(json[0].get("alias").is_none());
        assert_eq!(json[1], " ");
        assert_eq!(json[2]["content"][1]["type"], "url");
    }
}
