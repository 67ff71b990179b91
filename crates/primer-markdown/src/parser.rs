//! Documentation page parser.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use crate::frontmatter::{extract_frontmatter, Frontmatter, FrontmatterError};

/// A parsed documentation page.
#[derive(Debug, Clone)]
pub struct ParsedDoc {
    /// Parsed frontmatter (if present)
    pub frontmatter: Option<Frontmatter>,

    /// Markdown content (without frontmatter)
    pub content: String,

    /// Fenced code blocks found in the page
    pub code_fences: Vec<CodeFence>,

    /// Table of contents entries
    pub toc: Vec<TocEntry>,
}

/// A fenced code block extracted during parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeFence {
    /// Language identifier from the fence info string (first token, lowercased)
    pub language: String,

    /// Full fence info string
    pub info: String,

    /// Source code content
    pub source: String,
}

impl CodeFence {
    fn new(info: String, source: String) -> Self {
        let language = info
            .split_whitespace()
            .next()
            .unwrap_or("")
            .to_lowercase();
        Self {
            language,
            info,
            source,
        }
    }
}

/// A table of contents entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID
    pub id: String,
    /// Heading level (1-6)
    pub level: u8,
}

/// Errors that can occur when parsing a page.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Frontmatter error: {0}")]
    Frontmatter(#[from] FrontmatterError),
}

/// Parse a documentation page.
///
/// Extracts frontmatter and code fences, and generates a table of contents.
pub fn parse_doc(source: &str) -> Result<ParsedDoc, ParseError> {
    // Extract frontmatter first
    let (frontmatter, content) = extract_frontmatter(source)?;

    let mut code_fences = Vec::new();
    let mut toc = Vec::new();

    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;

    let parser = Parser::new_ext(content, options);

    let mut current_fence: Option<(String, String)> = None; // (info, source)
    let mut current_heading: Option<(u8, String)> = None; // (level, text)

    for event in parser {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let info = match &kind {
                    CodeBlockKind::Fenced(info) => info.to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                current_fence = Some((info, String::new()));
            }

            Event::Text(text) => {
                if let Some((_, ref mut source)) = current_fence {
                    source.push_str(&text);
                } else if let Some((_, ref mut heading_text)) = current_heading {
                    heading_text.push_str(&text);
                }
            }

            Event::Code(code) => {
                if let Some((_, ref mut heading_text)) = current_heading {
                    heading_text.push_str(&code);
                }
            }

            Event::End(TagEnd::CodeBlock) => {
                if let Some((info, source)) = current_fence.take() {
                    code_fences.push(CodeFence::new(info, source));
                }
            }

            Event::Start(Tag::Heading { level, .. }) => {
                current_heading = Some((level as u8, String::new()));
            }

            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, title)) = current_heading.take() {
                    let id = slugify(&title);
                    toc.push(TocEntry { title, id, level });
                }
            }

            _ => {}
        }
    }

    Ok(ParsedDoc {
        frontmatter,
        content: content.to_string(),
        code_fences,
        toc,
    })
}

/// Convert a heading to a URL-safe slug.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|c| *c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_complete_page() {
        let source = r#"---
title: Counter
description: A counter component
---

# Counter

A number that goes up and down.

```reason
let x = 1;
```

## Exercises

Try removing the bounds.

```sh
npm run serve
```
"#;

        let doc = parse_doc(source).unwrap();

        // Check frontmatter
        let fm = doc.frontmatter.unwrap();
        assert_eq!(fm.title, "Counter");
        assert_eq!(fm.description, Some("A counter component".to_string()));

        // Check code fences
        assert_eq!(doc.code_fences.len(), 2);
        assert_eq!(doc.code_fences[0].language, "reason");
        assert!(doc.code_fences[0].source.contains("let x = 1;"));
        assert_eq!(doc.code_fences[1].language, "sh");

        // Check TOC
        assert_eq!(doc.toc.len(), 2);
        assert_eq!(doc.toc[0].title, "Counter");
        assert_eq!(doc.toc[0].level, 1);
        assert_eq!(doc.toc[0].id, "counter");
        assert_eq!(doc.toc[1].title, "Exercises");
        assert_eq!(doc.toc[1].level, 2);
    }

    #[test]
    fn parses_without_frontmatter() {
        let source = "# Just Markdown\n\nNo frontmatter.";

        let doc = parse_doc(source).unwrap();

        assert!(doc.frontmatter.is_none());
        assert_eq!(doc.toc.len(), 1);
        assert_eq!(doc.toc[0].title, "Just Markdown");
    }

    #[test]
    fn fence_language_ignores_attributes() {
        let source = "```reason {2-3}\nlet y = 2;\n```\n";

        let doc = parse_doc(source).unwrap();

        assert_eq!(doc.code_fences.len(), 1);
        assert_eq!(doc.code_fences[0].language, "reason");
        assert_eq!(doc.code_fences[0].info, "reason {2-3}");
    }

    #[test]
    fn slugify_works() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Numeric Types"), "numeric-types");
        assert_eq!(slugify("Counter (Basics)"), "counter-basics");
        assert_eq!(slugify("  Multiple   Spaces  "), "multiple-spaces");
    }
}
