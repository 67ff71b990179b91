//! Template engine for rendering documentation pages.

use minijinja::{context, Environment};

/// A top navigation link.
#[derive(Debug, Clone, serde::Serialize)]
pub struct NavLink {
    /// Display label
    pub text: String,
    /// URL (site-relative or external)
    pub link: String,
}

/// A sidebar section with its links.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SidebarGroup {
    /// Section label
    pub text: String,
    /// Links in the section
    pub items: Vec<NavLink>,
}

/// A table of contents entry.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID
    pub id: String,
    /// Heading level (1-6)
    pub level: u8,
}

/// Context for rendering a page template.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Context {
    /// Page title
    pub title: String,
    /// Site title
    pub site_title: String,
    /// Site description
    pub description: String,
    /// Rendered content HTML
    pub content: String,
    /// Top navigation links
    pub nav: Vec<NavLink>,
    /// Sidebar sections
    pub sidebar: Vec<SidebarGroup>,
    /// Table of contents
    pub toc: Vec<TocEntry>,
    /// Base URL
    pub base_url: String,
    /// Edit-this-page URL, if configured
    pub edit_url: Option<String>,
    /// Whether the search box is rendered
    pub search: bool,
    /// Paths to CSS stylesheets to include
    pub styles: Vec<String>,
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with default templates.
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_template_owned("base.html".to_string(), BASE_TEMPLATE.to_string())
            .expect("Failed to add base template");

        env.add_template_owned("doc.html".to_string(), DOC_TEMPLATE.to_string())
            .expect("Failed to add doc template");

        env.add_template_owned("sidebar.html".to_string(), SIDEBAR_TEMPLATE.to_string())
            .expect("Failed to add sidebar template");

        Self { env }
    }

    /// Render a page using the specified template.
    pub fn render_page(
        &self,
        template: &str,
        context: &Context,
    ) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(template)?;

        tmpl.render(context! {
            title => &context.title,
            site_title => &context.site_title,
            description => &context.description,
            content => &context.content,
            nav => &context.nav,
            sidebar => &context.sidebar,
            toc => &context.toc,
            base_url => &context.base_url,
            edit_url => &context.edit_url,
            search => &context.search,
            styles => &context.styles,
        })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <meta name="description" content="{{ description }}">
  <title>{{ title }} - {{ site_title }}</title>
  {% for style in styles %}<link rel="stylesheet" href="{{ style | safe }}">
  {% endfor %}<link rel="stylesheet" href="{{ base_url | safe }}assets/main.css">
</head>
<body>
  <header class="topnav">
    <a href="{{ base_url | safe }}" class="site-title">{{ site_title }}</a>
    {% if search %}
    <input type="search" class="search-input" placeholder="Search" data-index="{{ base_url | safe }}search-index.json">
    <ul class="search-results"></ul>
    {% endif %}
    <nav class="topnav-links">
      {% for item in nav %}<a href="{{ item.link | safe }}">{{ item.text }}</a>
      {% endfor %}
    </nav>
  </header>
  <div class="layout">
    <nav class="sidebar">
      {% include "sidebar.html" %}
    </nav>
    <main class="main">
      {% block content %}{% endblock %}
    </main>
  </div>
  <script src="{{ base_url | safe }}assets/main.js"></script>
</body>
</html>"##;

const DOC_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block content %}
<article class="doc">
  <div class="content">
    {{ content | safe }}
  </div>
  {% if edit_url %}
  <p class="edit-link"><a href="{{ edit_url | safe }}">Edit this page</a></p>
  {% endif %}
</article>

{% if toc %}
<aside class="toc">
  <h2>On this page</h2>
  <ul>
  {% for entry in toc %}
    <li class="toc-level-{{ entry.level }}">
      <a href="#{{ entry.id }}">{{ entry.title }}</a>
    </li>
  {% endfor %}
  </ul>
</aside>
{% endif %}
{% endblock %}"##;

const SIDEBAR_TEMPLATE: &str = r##"<ul class="sidebar-sections">
{% for section in sidebar %}
  <li class="sidebar-section">
    <span class="sidebar-label">{{ section.text }}</span>
    <ul class="sidebar-items">
      {% for item in section.items %}
      <li class="sidebar-item">
        <a href="{{ item.link | safe }}">{{ item.text }}</a>
      </li>
      {% endfor %}
    </ul>
  </li>
{% endfor %}
</ul>"##;

#[cfg(test)]
mod tests {
    use super::*;

    fn base_context() -> Context {
        Context {
            title: "Counter".to_string(),
            site_title: "Melange for React Devs".to_string(),
            description: "A guided introduction".to_string(),
            content: "<p>Hello world</p>".to_string(),
            nav: vec![],
            sidebar: vec![],
            toc: vec![],
            base_url: "/".to_string(),
            edit_url: None,
            search: true,
            styles: vec![],
        }
    }

    #[test]
    fn renders_basic_page() {
        let engine = TemplateEngine::new();

        let html = engine.render_page("doc.html", &base_context()).unwrap();

        assert!(html.contains("<title>Counter - Melange for React Devs</title>"));
        assert!(html.contains("<p>Hello world</p>"));
        assert!(html.contains("search-input"));
    }

    #[test]
    fn renders_nav_and_sidebar() {
        let engine = TemplateEngine::new();

        let mut context = base_context();
        context.nav = vec![
            NavLink {
                text: "Home".to_string(),
                link: "/".to_string(),
            },
            NavLink {
                text: "Melange".to_string(),
                link: "https://melange.re".to_string(),
            },
        ];
        context.sidebar = vec![SidebarGroup {
            text: "Chapters".to_string(),
            items: vec![NavLink {
                text: "Counter".to_string(),
                link: "/counter/".to_string(),
            }],
        }];

        let html = engine.render_page("doc.html", &context).unwrap();

        assert!(html.contains(r#"<a href="https://melange.re">Melange</a>"#));
        assert!(html.contains("Chapters"));
        assert!(html.contains(r#"<a href="/counter/">Counter</a>"#));
    }

    #[test]
    fn renders_edit_link_when_present() {
        let engine = TemplateEngine::new();

        let mut context = base_context();
        context.edit_url = Some("https://example.com/edit/docs/index.md".to_string());

        let html = engine.render_page("doc.html", &context).unwrap();

        assert!(html.contains("Edit this page"));
        assert!(html.contains("https://example.com/edit/docs/index.md"));
    }

    #[test]
    fn omits_search_box_when_disabled() {
        let engine = TemplateEngine::new();

        let mut context = base_context();
        context.search = false;

        let html = engine.render_page("doc.html", &context).unwrap();

        assert!(!html.contains("search-input"));
    }

    #[test]
    fn url_attributes_render_literally() {
        let engine = TemplateEngine::new();

        let mut context = base_context();
        context.nav = vec![NavLink {
            text: "Melange".to_string(),
            link: "https://melange.re".to_string(),
        }];
        context.edit_url = Some("https://example.com/edit/docs/index.md".to_string());
        context.styles = vec!["/assets/extra.css".to_string()];

        let html = engine.render_page("doc.html", &context).unwrap();

        // Hrefs come out of config verbatim, not entity-escaped
        assert!(!html.contains("&#x2f;"));
        assert!(html.contains(r#"href="https://melange.re""#));
        assert!(html.contains(r#"href="https://example.com/edit/docs/index.md""#));
        assert!(html.contains(r#"href="/assets/extra.css""#));
    }

    #[test]
    fn renders_toc_entries() {
        let engine = TemplateEngine::new();

        let mut context = base_context();
        context.toc = vec![TocEntry {
            title: "Exercises".to_string(),
            id: "exercises".to_string(),
            level: 2,
        }];

        let html = engine.render_page("doc.html", &context).unwrap();

        assert!(html.contains("On this page"));
        assert!(html.contains(r##"<a href="#exercises">Exercises</a>"##));
    }
}
