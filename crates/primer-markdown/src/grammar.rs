//! Custom syntax grammar registration.
//!
//! Grammars are declared in the site configuration and loaded from TextMate
//! JSON definitions. The renderer does not interpret grammar patterns itself;
//! registered languages annotate their code fences with the grammar's language
//! class and scope name so a client-side highlighter can pick them up.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// A custom syntax grammar registered into the markdown renderer.
#[derive(Debug, Clone)]
pub struct Grammar {
    /// Language identifier used in code fence info strings (e.g. "reason")
    pub id: String,

    /// TextMate scope name (e.g. "source.reason")
    pub scope_name: String,

    /// Human-readable language name (e.g. "Reason")
    pub display_name: String,

    /// Alternate fence identifiers (e.g. "re", "rei")
    pub aliases: Vec<String>,

    /// Raw grammar definition, passed through to the client highlighter
    pub definition: serde_json::Value,
}

impl Grammar {
    /// Load a grammar, reading its definition from a JSON file.
    pub fn load(
        id: impl Into<String>,
        scope_name: impl Into<String>,
        display_name: impl Into<String>,
        aliases: Vec<String>,
        path: &Path,
    ) -> Result<Self, GrammarError> {
        let content = fs::read_to_string(path).map_err(|e| GrammarError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let definition: serde_json::Value =
            serde_json::from_str(&content).map_err(|e| GrammarError::InvalidJson {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        if !definition.is_object() {
            return Err(GrammarError::InvalidJson {
                path: path.display().to_string(),
                message: "grammar definition must be a JSON object".to_string(),
            });
        }

        Ok(Self {
            id: id.into(),
            scope_name: scope_name.into(),
            display_name: display_name.into(),
            aliases,
            definition,
        })
    }
}

/// Errors that can occur when loading or registering grammars.
#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    #[error("Failed to read grammar {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("Invalid grammar JSON in {path}: {message}")]
    InvalidJson { path: String, message: String },

    #[error("Duplicate grammar identifier: {0}")]
    DuplicateId(String),
}

/// Registry of custom grammars, resolvable by id or alias.
#[derive(Debug, Default)]
pub struct GrammarRegistry {
    grammars: Vec<Grammar>,
    index: HashMap<String, usize>,
}

impl GrammarRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a grammar under its id and all of its aliases.
    pub fn register(&mut self, grammar: Grammar) -> Result<(), GrammarError> {
        let key = grammar.id.to_lowercase();
        if self.index.contains_key(&key) {
            return Err(GrammarError::DuplicateId(grammar.id));
        }

        let idx = self.grammars.len();
        self.index.insert(key, idx);

        for alias in &grammar.aliases {
            let alias_key = alias.to_lowercase();
            if self.index.contains_key(&alias_key) {
                return Err(GrammarError::DuplicateId(alias.clone()));
            }
            self.index.insert(alias_key, idx);
        }

        self.grammars.push(grammar);
        Ok(())
    }

    /// Resolve a code fence info string to a registered grammar.
    ///
    /// Only the first whitespace-separated token is considered, matching how
    /// fence info strings carry a language identifier followed by attributes.
    pub fn resolve(&self, info: &str) -> Option<&Grammar> {
        let lang = info.split_whitespace().next()?;
        let idx = self.index.get(&lang.to_lowercase())?;
        self.grammars.get(*idx)
    }

    /// All registered grammars, in registration order.
    pub fn grammars(&self) -> &[Grammar] {
        &self.grammars
    }

    /// Number of registered grammars.
    pub fn len(&self) -> usize {
        self.grammars.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.grammars.is_empty()
    }
}
