//! Markdown pipeline for primer documentation.
//!
//! This crate parses documentation pages, extracts YAML frontmatter and a table
//! of contents, and renders markdown to HTML with custom syntax grammars
//! registered into the code-fence output.

pub mod frontmatter;
pub mod grammar;
pub mod parser;
pub mod render;

pub use frontmatter::Frontmatter;
pub use grammar::{Grammar, GrammarError, GrammarRegistry};
pub use parser::{parse_doc, CodeFence, ParseError, ParsedDoc, TocEntry};
pub use render::{render_html, RenderOptions};
