//! Site configuration (site.toml).

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use primer_markdown::{Grammar, GrammarError, GrammarRegistry, RenderOptions};

/// Top-level site configuration, deserialized from `site.toml`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SiteConfig {
    #[serde(default)]
    pub site: SiteSection,

    #[serde(default)]
    pub search: SearchSection,

    /// Edit-link pattern; absent means no edit links are rendered.
    #[serde(default)]
    pub edit_link: Option<EditLink>,

    /// Top navigation entries.
    #[serde(default)]
    pub nav: Vec<NavEntry>,

    /// Sidebar sections; empty means the sidebar is derived from the pages.
    #[serde(default)]
    pub sidebar: Vec<SidebarSection>,

    #[serde(default)]
    pub markdown: MarkdownSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SiteSection {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_docs_dir")]
    pub docs_dir: String,

    #[serde(default = "default_output")]
    pub output: String,

    /// Paths to CSS stylesheets to include
    #[serde(default)]
    pub styles: Vec<String>,

    #[serde(default = "default_minify")]
    pub minify: bool,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            title: default_title(),
            description: String::new(),
            base_url: default_base_url(),
            docs_dir: default_docs_dir(),
            output: default_output(),
            styles: vec![],
            minify: default_minify(),
        }
    }
}

fn default_title() -> String {
    "Documentation".to_string()
}
fn default_base_url() -> String {
    "/".to_string()
}
fn default_docs_dir() -> String {
    "docs".to_string()
}
fn default_output() -> String {
    "dist".to_string()
}
fn default_minify() -> bool {
    true
}

/// Search configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SearchSection {
    #[serde(default)]
    pub provider: SearchProvider,
}

/// Which search implementation the site uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchProvider {
    /// Generate a local search index consumed by the client script.
    #[default]
    Local,
    /// No search.
    None,
}

/// Edit-link configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EditLink {
    /// URL pattern with a `:path` placeholder for the page's source path.
    pub pattern: String,
}

impl EditLink {
    /// Resolve the edit URL for a page, given its source path relative to the
    /// docs directory.
    pub fn url_for(&self, relative_path: &Path) -> String {
        let path = relative_path.to_string_lossy().replace('\\', "/");
        self.pattern.replace(":path", &path)
    }
}

/// A navigation entry (label + link).
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct NavEntry {
    pub text: String,
    pub link: String,
}

/// A sidebar section: a labelled group of links.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SidebarSection {
    pub text: String,
    #[serde(default)]
    pub items: Vec<NavEntry>,
}

/// Markdown pipeline configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkdownSection {
    #[serde(default = "default_true")]
    pub typographer: bool,

    #[serde(default = "default_true")]
    pub footnotes: bool,

    /// Accepted for compatibility; autolinking is never performed.
    #[serde(default)]
    pub linkify: bool,

    /// Custom syntax grammars registered into the renderer.
    #[serde(default)]
    pub grammars: Vec<GrammarDecl>,
}

fn default_true() -> bool {
    true
}

impl Default for MarkdownSection {
    fn default() -> Self {
        Self {
            typographer: true,
            footnotes: true,
            linkify: false,
            grammars: vec![],
        }
    }
}

impl MarkdownSection {
    /// Render options for the markdown pipeline.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            typographer: self.typographer,
            footnotes: self.footnotes,
        }
    }
}

/// Declaration of a custom syntax grammar.
#[derive(Debug, Clone, Deserialize)]
pub struct GrammarDecl {
    pub id: String,
    pub scope_name: String,
    pub display_name: String,
    /// Path to the TextMate JSON grammar definition
    pub path: PathBuf,
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("Failed to parse {path}: {message}")]
    ParseError { path: String, message: String },

    #[error(transparent)]
    Grammar(#[from] GrammarError),
}

impl SiteConfig {
    /// Load configuration from a TOML file.
    ///
    /// A missing file yields the full set of defaults; a malformed file is an
    /// error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let config: SiteConfig = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load all declared grammars into a registry.
    ///
    /// Grammar paths are resolved relative to `base_dir` (normally the
    /// directory containing site.toml).
    pub fn load_grammars(&self, base_dir: &Path) -> Result<GrammarRegistry, ConfigError> {
        let mut registry = GrammarRegistry::new();

        for decl in &self.markdown.grammars {
            let path = if decl.path.is_absolute() {
                decl.path.clone()
            } else {
                base_dir.join(&decl.path)
            };

            let grammar = Grammar::load(
                &decl.id,
                &decl.scope_name,
                &decl.display_name,
                decl.aliases.clone(),
                &path,
            )?;

            tracing::debug!("Registered grammar '{}' ({})", decl.id, decl.scope_name);
            registry.register(grammar)?;
        }

        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    const FULL_CONFIG: &str = r#"
[site]
title = "Melange for React Devs"
description = "A project-based, guided introduction"
base_url = "/"

[search]
provider = "local"

[edit_link]
pattern = "https://github.com/example/project/edit/develop/docs/:path"

[[nav]]
text = "Home"
link = "/"

[[nav]]
text = "Melange"
link = "https://melange.re"

[[sidebar]]
text = "Chapters"

[[sidebar.items]]
text = "Intro"
link = "/intro/"

[[sidebar.items]]
text = "Counter"
link = "/counter/"

[markdown]
typographer = true
linkify = false

[[markdown.grammars]]
id = "reason"
scope_name = "source.reason"
display_name = "Reason"
path = "grammars/reason.json"
aliases = ["re", "rei"]
"#;

    #[test]
    fn parses_full_config() {
        let config: SiteConfig = toml::from_str(FULL_CONFIG).unwrap();

        assert_eq!(config.site.title, "Melange for React Devs");
        assert_eq!(config.search.provider, SearchProvider::Local);
        assert_eq!(config.nav.len(), 2);
        assert_eq!(config.nav[1].link, "https://melange.re");
        assert_eq!(config.sidebar.len(), 1);
        assert_eq!(config.sidebar[0].text, "Chapters");
        assert_eq!(config.sidebar[0].items.len(), 2);
        assert_eq!(config.markdown.grammars.len(), 1);
        assert_eq!(config.markdown.grammars[0].aliases, vec!["re", "rei"]);
        assert!(!config.markdown.linkify);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = SiteConfig::load(Path::new("/nonexistent/site.toml")).unwrap();

        assert_eq!(config.site.title, "Documentation");
        assert_eq!(config.site.base_url, "/");
        assert_eq!(config.search.provider, SearchProvider::Local);
        assert!(config.nav.is_empty());
        assert!(config.sidebar.is_empty());
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("site.toml");
        fs::write(&path, "[site\ntitle = ").unwrap();

        let result = SiteConfig::load(&path);

        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn edit_link_substitutes_path() {
        let edit = EditLink {
            pattern: "https://github.com/example/project/edit/develop/docs/:path".to_string(),
        };

        let url = edit.url_for(Path::new("counter/index.md"));

        assert_eq!(
            url,
            "https://github.com/example/project/edit/develop/docs/counter/index.md"
        );
    }

    #[test]
    fn loads_declared_grammars() {
        let temp = tempdir().unwrap();
        let grammar_dir = temp.path().join("grammars");
        fs::create_dir_all(&grammar_dir).unwrap();
        fs::write(
            grammar_dir.join("reason.json"),
            r#"{"scopeName": "source.reason"}"#,
        )
        .unwrap();

        let config: SiteConfig = toml::from_str(FULL_CONFIG).unwrap();
        let registry = config.load_grammars(temp.path()).unwrap();

        assert_eq!(registry.len(), 1);
        assert!(registry.resolve("rei").is_some());
    }

    #[test]
    fn missing_grammar_file_is_an_error() {
        let temp = tempdir().unwrap();

        let config: SiteConfig = toml::from_str(FULL_CONFIG).unwrap();
        let result = config.load_grammars(temp.path());

        assert!(matches!(result, Err(ConfigError::Grammar(_))));
    }
}
