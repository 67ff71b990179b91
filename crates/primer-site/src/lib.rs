//! Static site generator for primer documentation.
//!
//! Consumes the `site.toml` configuration (title, navigation, sidebar, search
//! provider, edit links, custom syntax grammars) and renders a browsable
//! static site from a directory of markdown pages.

pub mod assets;
pub mod builder;
pub mod config;
pub mod templates;

pub use builder::{BuildError, BuildResult, StaticBuilder};
pub use config::{
    ConfigError, EditLink, MarkdownSection, NavEntry, SearchProvider, SidebarSection, SiteConfig,
};
