//! Language registry
//!
//! Maps language names and aliases to compiled grammars. Every name of a language
//! resolves to the same shared [Grammar] instance; the engine itself never looks names up,
//! it is handed a resolved grammar.

pub mod fml;

use crate::config::HighlightConfig;
use crate::engine;
use crate::grammar::{Grammar, GrammarError, LanguageDef};
use crate::token::Token;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// A named grammar plus the alternative names it answers to.
#[derive(Debug, Clone)]
pub struct Language {
    name: String,
    aliases: Vec<String>,
    grammar: Arc<Grammar>,
}

impl Language {
    pub fn new(name: impl Into<String>, grammar: impl Into<Arc<Grammar>>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            grammar: grammar.into(),
        }
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    pub fn from_definition(def: &LanguageDef) -> Result<Self, GrammarError> {
        let grammar = def.compile()?;
        Ok(Self::new(def.name.clone(), grammar).with_aliases(def.aliases.iter().cloned()))
    }

    pub fn from_yaml(text: &str) -> Result<Self, GrammarError> {
        Self::from_definition(&LanguageDef::from_yaml(text)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GrammarError> {
        Self::from_definition(&LanguageDef::from_path(path)?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn grammar(&self) -> &Arc<Grammar> {
        &self.grammar
    }

    pub fn tokenize(&self, source: &str) -> Vec<Token> {
        engine::tokenize(source, &self.grammar)
    }
}

/// Error that can occur while resolving or loading languages
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryError {
    /// No language or alias with that name
    UnknownLanguage(String),
    /// A definition file failed to load
    Grammar(GrammarError),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::UnknownLanguage(name) => write!(f, "Language '{name}' not found"),
            RegistryError::Grammar(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegistryError::Grammar(err) => Some(err),
            RegistryError::UnknownLanguage(_) => None,
        }
    }
}

impl From<GrammarError> for RegistryError {
    fn from(err: GrammarError) -> Self {
        RegistryError::Grammar(err)
    }
}

/// Registry of languages, looked up by name or alias.
#[derive(Debug, Clone, Default)]
pub struct LanguageRegistry {
    languages: BTreeMap<String, Arc<Language>>,
    aliases: HashMap<String, String>,
}

impl LanguageRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in languages
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(fml::language());
        registry
    }

    /// Built-in languages plus the definition files listed in the configuration.
    pub fn from_config(config: &HighlightConfig) -> Result<Self, RegistryError> {
        let mut registry = Self::with_defaults();
        for path in &config.grammars.paths {
            registry.load_file(path)?;
        }
        Ok(registry)
    }

    /// Register a language.
    ///
    /// A language with the same name is replaced, together with its aliases. An alias
    /// already claimed by another language moves to the new one.
    pub fn register(&mut self, language: Language) {
        let name = language.name.clone();
        if let Some(previous) = self.languages.remove(&name) {
            for alias in &previous.aliases {
                if self.aliases.get(alias) == Some(&name) {
                    self.aliases.remove(alias);
                }
            }
        }
        for alias in &language.aliases {
            self.aliases.insert(alias.clone(), name.clone());
        }
        debug!(language = %name, aliases = ?language.aliases, "registered language");
        self.languages.insert(name, Arc::new(language));
    }

    /// Load a YAML definition file and register it.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<Arc<Language>, RegistryError> {
        let language = Language::from_path(path)?;
        let name = language.name.clone();
        self.register(language);
        self.get(&name)
            .ok_or(RegistryError::UnknownLanguage(name))
    }

    /// Look up a language by name or alias
    pub fn get(&self, name: &str) -> Option<Arc<Language>> {
        let canonical = self.aliases.get(name).map(String::as_str).unwrap_or(name);
        self.languages
            .get(canonical)
            .or_else(|| self.languages.get(name))
            .cloned()
    }

    /// Resolve the grammar of a language by name or alias
    pub fn grammar(&self, name: &str) -> Result<Arc<Grammar>, RegistryError> {
        self.get(name)
            .map(|language| Arc::clone(language.grammar()))
            .ok_or_else(|| RegistryError::UnknownLanguage(name.to_string()))
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registered languages, sorted by name
    pub fn list(&self) -> Vec<Arc<Language>> {
        self.languages.values().cloned().collect()
    }
}
