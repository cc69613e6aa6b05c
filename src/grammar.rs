//! Ordered grammars for the lexer engine
//!
//! A [Grammar] is an ordered list of entries, each pairing a token type name with one or
//! more [Rule]s. Order is the only precedence mechanism: entries are tried top to bottom and
//! the alternatives of an entry in listed order. There is no longest-match or
//! "most specific wins" resolution.
//!
//! Grammars are immutable once built. Nested grammars are shared through `Arc`, so a
//! compiled grammar can be handed to any number of threads.
//!
//! Two ways to author one:
//!
//! ```text
//! Grammar::builder()
//!     .pattern("number", r"\b\d+\b")
//!     .entry("comment", [RuleSpec::new(r"(?m)^\s*//.*$").greedy()])
//!     .build()?
//! ```
//!
//! or a YAML definition, see [definition].

pub mod definition;
mod error;

pub use definition::{EntryDef, GrammarDef, InsideDef, LanguageDef, RuleDef, RuleOptions};
pub use error::GrammarError;

use regex::Regex;
use std::sync::Arc;
use tracing::debug;

/// A compiled pattern plus its matching options.
#[derive(Debug, Clone)]
pub struct Rule {
    regex: Regex,
    greedy: bool,
    capture: bool,
    alias: Option<String>,
    inside: Option<Arc<Grammar>>,
}

impl Rule {
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Greedy rules search the whole input from each unmatched span and may run across
    /// tokens produced by earlier rules.
    pub fn is_greedy(&self) -> bool {
        self.greedy
    }

    /// Whether capture group 1 delimits the token, the rest of the match being context.
    pub fn captures(&self) -> bool {
        self.capture
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn inside(&self) -> Option<&Arc<Grammar>> {
        self.inside.as_ref()
    }
}

/// One token type and its alternatives.
#[derive(Debug, Clone)]
pub struct Entry {
    name: String,
    rules: Vec<Rule>,
}

impl Entry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

/// Ordered list of token type entries.
#[derive(Debug, Clone, Default)]
pub struct Grammar {
    entries: Vec<Entry>,
}

impl Grammar {
    pub fn builder() -> GrammarBuilder {
        GrammarBuilder::default()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn entry(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Entry names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A rule as written by a grammar author, compiled by [GrammarBuilder::build].
#[derive(Debug, Clone, Default)]
pub struct RuleSpec {
    pattern: Option<String>,
    greedy: bool,
    capture: bool,
    alias: Option<String>,
    inside: Option<Arc<Grammar>>,
}

impl RuleSpec {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: Some(pattern.into()),
            ..Self::default()
        }
    }

    /// A rule with no pattern yet. Building a grammar with it fails.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn greedy(mut self) -> Self {
        self.greedy = true;
        self
    }

    pub fn capture(mut self) -> Self {
        self.capture = true;
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn inside(mut self, grammar: impl Into<Arc<Grammar>>) -> Self {
        self.inside = Some(grammar.into());
        self
    }

    fn compile(self, entry: &str) -> Result<Rule, GrammarError> {
        let pattern = match self.pattern {
            Some(pattern) if !pattern.is_empty() => pattern,
            _ => {
                return Err(GrammarError::MissingPattern {
                    entry: entry.to_string(),
                })
            }
        };

        let regex = Regex::new(&pattern).map_err(|e| GrammarError::InvalidPattern {
            entry: entry.to_string(),
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;

        // captures_len counts the implicit whole-match group
        if self.capture && regex.captures_len() < 2 {
            return Err(GrammarError::MissingCaptureGroup {
                entry: entry.to_string(),
                pattern,
            });
        }

        Ok(Rule {
            regex,
            greedy: self.greedy,
            capture: self.capture,
            alias: self.alias,
            inside: self.inside,
        })
    }
}

/// Collects entries in declaration order and validates them in [build](Self::build).
#[derive(Debug, Clone, Default)]
pub struct GrammarBuilder {
    entries: Vec<(String, Vec<RuleSpec>)>,
}

impl GrammarBuilder {
    /// Append an entry with its alternatives, tried in the given order.
    pub fn entry(
        mut self,
        name: impl Into<String>,
        rules: impl IntoIterator<Item = RuleSpec>,
    ) -> Self {
        self.entries
            .push((name.into(), rules.into_iter().collect()));
        self
    }

    /// Append an entry with a single rule.
    pub fn rule(self, name: impl Into<String>, rule: RuleSpec) -> Self {
        self.entry(name, [rule])
    }

    /// Append an entry with a single plain pattern.
    pub fn pattern(self, name: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.rule(name, RuleSpec::new(pattern))
    }

    pub fn build(self) -> Result<Grammar, GrammarError> {
        let mut entries: Vec<Entry> = Vec::with_capacity(self.entries.len());

        for (name, specs) in self.entries {
            if entries.iter().any(|entry| entry.name == name) {
                return Err(GrammarError::DuplicateEntry { entry: name });
            }
            if specs.is_empty() {
                return Err(GrammarError::NoRules { entry: name });
            }

            let rules = specs
                .into_iter()
                .map(|spec| spec.compile(&name))
                .collect::<Result<Vec<_>, _>>()?;
            entries.push(Entry { name, rules });
        }

        debug!(entries = entries.len(), "compiled grammar");
        Ok(Grammar { entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_preserves_declaration_order() {
        let grammar = Grammar::builder()
            .pattern("zeta", "z")
            .pattern("alpha", "a")
            .pattern("mid", "m")
            .build()
            .unwrap();

        let names: Vec<_> = grammar.names().collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_rule_options() {
        let inner = Grammar::builder().pattern("x", "x").build().unwrap();
        let grammar = Grammar::builder()
            .rule(
                "key",
                RuleSpec::new(r"(\w+)\s*=")
                    .greedy()
                    .capture()
                    .alias("property")
                    .inside(inner),
            )
            .build()
            .unwrap();

        let rule = &grammar.entry("key").unwrap().rules()[0];
        assert!(rule.is_greedy());
        assert!(rule.captures());
        assert_eq!(rule.alias(), Some("property"));
        assert_eq!(rule.inside().unwrap().len(), 1);
        assert_eq!(rule.pattern(), r"(\w+)\s*=");
    }

    #[test]
    fn test_missing_pattern() {
        let err = Grammar::builder()
            .rule("broken", RuleSpec::empty())
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            GrammarError::MissingPattern {
                entry: "broken".into()
            }
        );

        let err = Grammar::builder().pattern("blank", "").build().unwrap_err();
        assert!(matches!(err, GrammarError::MissingPattern { .. }));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = Grammar::builder().pattern("paren", "(a").build().unwrap_err();
        match err {
            GrammarError::InvalidPattern { entry, pattern, .. } => {
                assert_eq!(entry, "paren");
                assert_eq!(pattern, "(a");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_capture_requires_group() {
        let err = Grammar::builder()
            .rule("key", RuleSpec::new(r"\w+").capture())
            .build()
            .unwrap_err();
        assert!(matches!(err, GrammarError::MissingCaptureGroup { .. }));
    }

    #[test]
    fn test_entry_without_rules() {
        let err = Grammar::builder()
            .entry("nothing", Vec::new())
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            GrammarError::NoRules {
                entry: "nothing".into()
            }
        );
    }

    #[test]
    fn test_duplicate_entry() {
        let err = Grammar::builder()
            .pattern("word", "a")
            .pattern("word", "b")
            .build()
            .unwrap_err();
        assert!(matches!(err, GrammarError::DuplicateEntry { .. }));
    }

    #[test]
    fn test_empty_grammar_is_valid() {
        let grammar = Grammar::builder().build().unwrap();
        assert!(grammar.is_empty());
    }
}
