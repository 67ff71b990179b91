//! Markdown to HTML rendering with grammar-aware code fences.

use pulldown_cmark::{html, CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::grammar::GrammarRegistry;
use crate::parser::slugify;

/// Options controlling markdown rendering.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Smart punctuation (curly quotes, dashes, ellipses)
    pub typographer: bool,

    /// Footnote support
    pub footnotes: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            typographer: true,
            footnotes: true,
        }
    }
}

impl RenderOptions {
    fn to_pulldown(&self) -> Options {
        let mut options =
            Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
        if self.footnotes {
            options |= Options::ENABLE_FOOTNOTES;
        }
        if self.typographer {
            options |= Options::ENABLE_SMART_PUNCTUATION;
        }
        options
    }
}

/// Render markdown to HTML.
///
/// Headings are emitted with the same slugified anchor ids the page parser
/// produces for the table of contents, so TOC links resolve.
///
/// Code fences whose info string resolves against the grammar registry are
/// emitted with the grammar's language class and scope-name annotation so a
/// client-side highlighter can tokenize them. Unregistered fences pass through
/// with pulldown-cmark's default output.
pub fn render_html(content: &str, options: &RenderOptions, grammars: &GrammarRegistry) -> String {
    let parser = Parser::new_ext(content, options.to_pulldown());

    let mut events: Vec<Event> = Vec::new();
    let mut custom_fence: Option<String> = None; // grammar id of the open fence
    let mut heading: Option<(HeadingLevel, String, Vec<Event>)> = None; // (level, text, inner)

    for event in parser {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                heading = Some((level, String::new(), Vec::new()));
            }

            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, text, inner)) = heading.take() {
                    let tag = heading_tag(level);
                    events.push(Event::Html(
                        format!(r#"<{} id="{}">"#, tag, slugify(&text)).into(),
                    ));
                    events.extend(inner);
                    events.push(Event::Html(format!("</{}>\n", tag).into()));
                }
            }

            // Buffer everything inside an open heading; the text feeds the slug
            _ if heading.is_some() => {
                if let Some((_, text, inner)) = heading.as_mut() {
                    match &event {
                        Event::Text(t) => text.push_str(t),
                        Event::Code(c) => text.push_str(c),
                        _ => {}
                    }
                    inner.push(event);
                }
            }

            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(ref info))) => {
                if let Some(grammar) = grammars.resolve(info) {
                    let open = format!(
                        r#"<pre class="grammar-{id}"><code class="language-{id}" data-scope="{scope}" data-language-name="{name}">"#,
                        id = grammar.id,
                        scope = grammar.scope_name,
                        name = grammar.display_name,
                    );
                    events.push(Event::Html(open.into()));
                    custom_fence = Some(grammar.id.clone());
                } else {
                    events.push(event);
                }
            }

            Event::Text(ref text) if custom_fence.is_some() => {
                events.push(Event::Html(escape_html(text).into()));
            }

            Event::End(TagEnd::CodeBlock) if custom_fence.is_some() => {
                custom_fence = None;
                events.push(Event::Html("</code></pre>\n".into()));
            }

            _ => events.push(event),
        }
    }

    let mut html_output = String::new();
    html::push_html(&mut html_output, events.into_iter());

    html_output
}

fn heading_tag(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "h1",
        HeadingLevel::H2 => "h2",
        HeadingLevel::H3 => "h3",
        HeadingLevel::H4 => "h4",
        HeadingLevel::H5 => "h5",
        HeadingLevel::H6 => "h6",
    }
}

/// Escape text for inclusion in an HTML element body.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
