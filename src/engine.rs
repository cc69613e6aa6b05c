//! Lexer engine
//!
//! Turns a source string into a token tree according to a [Grammar].
//!
//! 1. The whole source starts as one unmatched span.
//! 2. Every entry of the grammar, in declared order, and every rule of an entry, in
//!    listed order, is applied to the spans still unmatched (see [matcher]).
//! 3. While a pass produces new tokens, run another full pass: splitting a span gives
//!    earlier rules new region edges to anchor on, and text reopened by a greedy match
//!    needs classifying again. Passes are capped at the number of entries.
//! 4. Tokens whose rule carries a nested grammar are tokenized again, on their own text
//!    only, with that grammar.
//! 5. Spans are emitted in source order: unmatched text as raw leaves, the rest as nodes.
//!
//! Tokenizing is total and deterministic: any input yields a token sequence that
//! concatenates back to the input, and the same input always yields the same tree.
//! The engine keeps no state between calls.

mod matcher;

use crate::grammar::Grammar;
use crate::token::{Content, Token, TokenNode};
use matcher::{MatchState, Span, SpanKind};
use tracing::trace;

/// Tokenize `source` with `grammar`.
///
/// Empty input yields a single empty raw leaf.
pub fn tokenize(source: &str, grammar: &Grammar) -> Vec<Token> {
    classify(source, grammar)
        .into_iter()
        .map(|span| build_token(source, span))
        .collect()
}

/// Run the matcher passes over the top level of `source`.
fn classify<'g>(source: &str, grammar: &'g Grammar) -> Vec<Span<'g>> {
    let mut state = MatchState::new(source);
    let max_passes = grammar.len().max(1);

    for pass in 1..=max_passes {
        let mut matches = 0;
        let mut reopened = false;

        for entry in grammar.entries() {
            for rule in entry.rules() {
                let outcome = state.apply(entry.name(), rule);
                matches += outcome.matches;
                reopened |= outcome.reopened;
            }
        }

        trace!(pass, matches, reopened, spans = state.len(), "lexer pass");
        if matches == 0 && !reopened {
            break;
        }
    }

    state.into_spans()
}

fn build_token(source: &str, span: Span<'_>) -> Token {
    let text = &source[span.start..span.end];
    match span.kind {
        SpanKind::Unmatched => Token::Text(text.to_string()),
        SpanKind::Matched { kind, rule } => {
            let content = match rule.inside() {
                Some(inner) => Content::Tokens(tokenize(text, inner)),
                None => Content::Text(text.to_string()),
            };
            Token::Node(TokenNode {
                kind: kind.to_string(),
                content,
                alias: rule.alias().map(str::to_string),
            })
        }
    }
}
