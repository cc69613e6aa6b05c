//! Declarative grammar definitions
//!
//! Grammars can be written as YAML documents and compiled into [Grammar] values. The
//! root grammar is the ordered `tokens` list; `grammars` declares named grammars that
//! `inside` can reference by name, so several rules can share one nested grammar.
//!
//! ```text
//! name: fml
//! aliases: [mapping, structuremap]
//! grammars:
//!   string-body:
//!     - type: escape
//!       rules: '\\[nrt"]'
//! tokens:
//!   - type: number
//!     rules: '\b\d+\b'
//!   - type: string
//!     rules:
//!       pattern: '"[^"]*"'
//!       greedy: true
//!       inside: string-body
//! ```
//!
//! `rules` takes a pattern, a rule object or a list of either. `inside` takes a grammar
//! name or an inline entry list.
//!
//! Every problem is reported while compiling: bad patterns, rules without patterns,
//! references to undeclared grammars and reference cycles. Named grammars are compiled
//! even when nothing references them.

use super::{Grammar, GrammarError, RuleSpec};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Ordered entry list, the shape of every grammar in a definition.
pub type GrammarDef = Vec<EntryDef>;

/// A complete language definition document.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LanguageDef {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub grammars: BTreeMap<String, GrammarDef>,
    pub tokens: GrammarDef,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntryDef {
    #[serde(rename = "type")]
    pub kind: String,
    pub rules: OneOrMany<RuleDef>,
}

/// A single value or a list of them.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => std::slice::from_ref(item),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RuleDef {
    /// Pattern shorthand with default options
    Pattern(String),
    Options(RuleOptions),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleOptions {
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub greedy: bool,
    #[serde(default)]
    pub capture: bool,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub inside: Option<InsideDef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum InsideDef {
    Named(String),
    Inline(GrammarDef),
}

impl LanguageDef {
    pub fn from_yaml(text: &str) -> Result<Self, GrammarError> {
        serde_yaml::from_str(text).map_err(|e| GrammarError::Definition {
            message: e.to_string(),
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GrammarError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| GrammarError::Definition {
            message: format!("{}: {}", path.display(), e),
        })?;
        Self::from_yaml(&text)
    }

    /// Compile the root grammar, resolving and validating every named grammar.
    pub fn compile(&self) -> Result<Arc<Grammar>, GrammarError> {
        let mut compiler = Compiler::new(&self.grammars);
        for name in self.grammars.keys() {
            compiler.named(name)?;
        }
        let root = compiler.grammar(&self.tokens)?;
        debug!(
            language = %self.name,
            named = self.grammars.len(),
            "compiled language definition"
        );
        Ok(root)
    }
}

/// Resolves `inside` references, compiling each named grammar once.
struct Compiler<'d> {
    named: &'d BTreeMap<String, GrammarDef>,
    done: HashMap<&'d str, Arc<Grammar>>,
    stack: Vec<&'d str>,
}

impl<'d> Compiler<'d> {
    fn new(named: &'d BTreeMap<String, GrammarDef>) -> Self {
        Self {
            named,
            done: HashMap::new(),
            stack: Vec::new(),
        }
    }

    fn named(&mut self, name: &str) -> Result<Arc<Grammar>, GrammarError> {
        let named = self.named;
        let (name, def) = named
            .get_key_value(name)
            .ok_or_else(|| GrammarError::UnknownGrammar {
                name: name.to_string(),
            })?;
        let name = name.as_str();

        if let Some(grammar) = self.done.get(name) {
            return Ok(Arc::clone(grammar));
        }

        if let Some(pos) = self.stack.iter().position(|open| *open == name) {
            let mut chain: Vec<String> = self.stack[pos..].iter().map(|s| s.to_string()).collect();
            chain.push(name.to_string());
            return Err(GrammarError::CyclicReference { chain });
        }

        self.stack.push(name);
        let grammar = self.grammar(def);
        self.stack.pop();

        let grammar = grammar?;
        self.done.insert(name, Arc::clone(&grammar));
        Ok(grammar)
    }

    fn grammar(&mut self, def: &'d GrammarDef) -> Result<Arc<Grammar>, GrammarError> {
        let mut builder = Grammar::builder();
        for entry in def {
            let rules = entry
                .rules
                .as_slice()
                .iter()
                .map(|rule| self.rule(rule))
                .collect::<Result<Vec<_>, _>>()?;
            builder = builder.entry(entry.kind.clone(), rules);
        }
        builder.build().map(Arc::new)
    }

    fn rule(&mut self, def: &'d RuleDef) -> Result<RuleSpec, GrammarError> {
        let options = match def {
            RuleDef::Pattern(pattern) => return Ok(RuleSpec::new(pattern.clone())),
            RuleDef::Options(options) => options,
        };

        let mut spec = match &options.pattern {
            Some(pattern) => RuleSpec::new(pattern.clone()),
            None => RuleSpec::empty(),
        };
        if options.greedy {
            spec = spec.greedy();
        }
        if options.capture {
            spec = spec.capture();
        }
        if let Some(alias) = &options.alias {
            spec = spec.alias(alias.clone());
        }
        match &options.inside {
            Some(InsideDef::Named(name)) => spec = spec.inside(self.named(name)?),
            Some(InsideDef::Inline(def)) => spec = spec.inside(self.grammar(def)?),
            None => {}
        }
        Ok(spec)
    }
}
