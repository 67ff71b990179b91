//! Static site builder.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use walkdir::WalkDir;

use primer_markdown::{parse_doc, render_html, Frontmatter, GrammarRegistry, ParsedDoc};

use crate::assets::AssetPipeline;
use crate::config::{SearchProvider, SiteConfig};
use crate::templates::{Context, NavLink, SidebarGroup, TemplateEngine, TocEntry};

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of pages generated
    pub pages: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to read docs directory: {0}")]
    ReadError(String),

    #[error("Failed to parse page: {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// A page to be built.
#[derive(Debug)]
struct PageInfo {
    /// Relative path from docs dir
    relative_path: PathBuf,

    /// Output path
    output_path: PathBuf,

    /// Parsed document
    doc: ParsedDoc,
}

/// Static site builder.
pub struct StaticBuilder {
    config: SiteConfig,
    grammars: GrammarRegistry,
    templates: TemplateEngine,
    docs_dir: PathBuf,
    output_dir: PathBuf,
}

impl StaticBuilder {
    /// Create a new static builder.
    pub fn new(config: SiteConfig, grammars: GrammarRegistry) -> Self {
        let docs_dir = PathBuf::from(&config.site.docs_dir);
        let output_dir = PathBuf::from(&config.site.output);

        Self {
            config,
            grammars,
            templates: TemplateEngine::new(),
            docs_dir,
            output_dir,
        }
    }

    /// Override the output directory.
    pub fn with_output(mut self, output: PathBuf) -> Self {
        self.output_dir = output;
        self
    }

    /// Build the static site.
    pub fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        fs::create_dir_all(&self.output_dir)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let pages = self.discover_pages()?;

        let nav: Vec<NavLink> = self
            .config
            .nav
            .iter()
            .map(|entry| NavLink {
                text: entry.text.clone(),
                link: entry.link.clone(),
            })
            .collect();

        let sidebar = if self.config.sidebar.is_empty() {
            self.derive_sidebar(&pages)
        } else {
            self.config
                .sidebar
                .iter()
                .map(|section| SidebarGroup {
                    text: section.text.clone(),
                    items: section
                        .items
                        .iter()
                        .map(|item| NavLink {
                            text: item.text.clone(),
                            link: item.link.clone(),
                        })
                        .collect(),
                })
                .collect()
        };

        // Render pages in parallel
        let results: Vec<Result<(), BuildError>> = pages
            .par_iter()
            .map(|page| self.build_page(page, &nav, &sidebar))
            .collect();

        for result in results {
            result?;
        }

        self.generate_assets()?;

        if self.config.search.provider == SearchProvider::Local {
            self.generate_search_index(&pages)?;
        }

        self.generate_sitemap(&pages)?;

        let duration = start.elapsed();

        Ok(BuildResult {
            pages: pages.len(),
            duration_ms: duration.as_millis() as u64,
            output_dir: self.output_dir.clone(),
        })
    }

    /// Discover all markdown pages in the docs directory.
    fn discover_pages(&self) -> Result<Vec<PageInfo>, BuildError> {
        let mut pages = Vec::new();

        if !self.docs_dir.exists() {
            return Err(BuildError::ReadError(format!(
                "Docs directory not found: {}",
                self.docs_dir.display()
            )));
        }

        for entry in WalkDir::new(&self.docs_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if ext != "md" && ext != "mdx" {
                continue;
            }

            let content = fs::read_to_string(path)
                .map_err(|e| BuildError::ReadError(format!("{}: {}", path.display(), e)))?;

            let doc = parse_doc(&content).map_err(|e| BuildError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

            let relative_path = path
                .strip_prefix(&self.docs_dir)
                .unwrap_or(path)
                .to_path_buf();

            let output_path = self.calculate_output_path(&relative_path, &doc.frontmatter);

            pages.push(PageInfo {
                relative_path,
                output_path,
                doc,
            });
        }

        // Sort by order from frontmatter
        pages.sort_by(|a, b| {
            let order_a = a
                .doc
                .frontmatter
                .as_ref()
                .and_then(|f| f.order)
                .unwrap_or(999);
            let order_b = b
                .doc
                .frontmatter
                .as_ref()
                .and_then(|f| f.order)
                .unwrap_or(999);
            order_a.cmp(&order_b)
        });

        Ok(pages)
    }

    /// Calculate output path for a page.
    fn calculate_output_path(&self, relative: &Path, frontmatter: &Option<Frontmatter>) -> PathBuf {
        // Check for slug override
        if let Some(fm) = frontmatter {
            if let Some(slug) = &fm.slug {
                return self.output_dir.join(slug).join("index.html");
            }
        }

        let stem = relative
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("index");

        if stem == "index" {
            // docs/index.md -> dist/index.html
            let parent = relative.parent().unwrap_or(Path::new(""));
            self.output_dir.join(parent).join("index.html")
        } else {
            // docs/counter.md -> dist/counter/index.html
            let parent = relative.parent().unwrap_or(Path::new(""));
            self.output_dir
                .join(parent)
                .join(stem)
                .join("index.html")
        }
    }

    /// Derive sidebar sections from the page tree when none are configured.
    fn derive_sidebar(&self, pages: &[PageInfo]) -> Vec<SidebarGroup> {
        let mut dirs: BTreeMap<PathBuf, Vec<NavLink>> = BTreeMap::new();

        for page in pages {
            let fm = page.doc.frontmatter.as_ref();

            // Skip pages marked as not in nav
            if let Some(f) = fm {
                if !f.nav {
                    continue;
                }
            }

            let text = fm.map(|f| f.title.clone()).unwrap_or_else(|| {
                page.relative_path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("Untitled")
                    .to_string()
            });

            let link = self.path_to_url(&page.output_path);

            let parent = page.relative_path.parent().unwrap_or(Path::new(""));
            dirs.entry(parent.to_path_buf())
                .or_default()
                .push(NavLink { text, link });
        }

        let mut sidebar = Vec::new();

        if let Some(root_items) = dirs.remove(&PathBuf::new()) {
            sidebar.push(SidebarGroup {
                text: self.config.site.title.clone(),
                items: root_items,
            });
        }

        for (dir, items) in dirs {
            let dir_name = dir
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("Section");

            sidebar.push(SidebarGroup {
                text: capitalize(dir_name),
                items,
            });
        }

        sidebar
    }

    /// Convert output path to URL.
    fn path_to_url(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.output_dir).unwrap_or(path);

        let url = relative
            .parent()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_default();

        if url.is_empty() {
            self.config.site.base_url.clone()
        } else {
            format!("{}{}/", self.config.site.base_url, url)
        }
    }

    /// Build a single page.
    fn build_page(
        &self,
        page: &PageInfo,
        nav: &[NavLink],
        sidebar: &[SidebarGroup],
    ) -> Result<(), BuildError> {
        for fence in &page.doc.code_fences {
            if !fence.language.is_empty() && self.grammars.resolve(&fence.language).is_none() {
                tracing::debug!(
                    "No grammar registered for '{}' fence in {}",
                    fence.language,
                    page.relative_path.display()
                );
            }
        }

        let content_html = render_html(
            &page.doc.content,
            &self.config.markdown.render_options(),
            &self.grammars,
        );

        let toc: Vec<TocEntry> = page
            .doc
            .toc
            .iter()
            .map(|e| TocEntry {
                title: e.title.clone(),
                id: e.id.clone(),
                level: e.level,
            })
            .collect();

        let title = page
            .doc
            .frontmatter
            .as_ref()
            .map(|f| f.title.clone())
            .unwrap_or_else(|| "Untitled".to_string());

        let edit_url = self
            .config
            .edit_link
            .as_ref()
            .map(|e| e.url_for(&page.relative_path));

        let context = Context {
            title,
            site_title: self.config.site.title.clone(),
            description: self.config.site.description.clone(),
            content: content_html,
            nav: nav.to_vec(),
            sidebar: sidebar.to_vec(),
            toc,
            base_url: self.config.site.base_url.clone(),
            edit_url,
            search: self.config.search.provider == SearchProvider::Local,
            styles: self
                .config
                .site
                .styles
                .iter()
                .map(|s| {
                    let filename = Path::new(s)
                        .file_name()
                        .and_then(|f| f.to_str())
                        .unwrap_or("style.css");
                    format!("{}assets/{}", self.config.site.base_url, filename)
                })
                .collect(),
        };

        let html = self
            .templates
            .render_page("doc.html", &context)
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;

        if let Some(parent) = page.output_path.parent() {
            fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
        }

        fs::write(&page.output_path, html).map_err(|e| BuildError::WriteError(e.to_string()))?;

        Ok(())
    }

    /// Generate static assets.
    fn generate_assets(&self) -> Result<(), BuildError> {
        let assets_dir = self.output_dir.join("assets");
        fs::create_dir_all(&assets_dir).map_err(|e| BuildError::WriteError(e.to_string()))?;

        let css = AssetPipeline::generate_css();
        let css = if self.config.site.minify {
            AssetPipeline::minify_css(&css).unwrap_or(css)
        } else {
            css
        };
        fs::write(assets_dir.join("main.css"), css)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let js = AssetPipeline::generate_js();
        fs::write(assets_dir.join("main.js"), js)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        // Copy configured stylesheets
        for style_path in &self.config.site.styles {
            let source_path = PathBuf::from(style_path);
            if source_path.exists() {
                let filename = source_path
                    .file_name()
                    .and_then(|f| f.to_str())
                    .unwrap_or("style.css");
                let content = fs::read_to_string(&source_path).map_err(|e| {
                    BuildError::ReadError(format!("Failed to read stylesheet: {}", e))
                })?;
                fs::write(assets_dir.join(filename), content)
                    .map_err(|e| BuildError::WriteError(e.to_string()))?;
                tracing::info!("Copied stylesheet from {}", style_path);
            } else {
                tracing::warn!("Stylesheet not found: {}", style_path);
            }
        }

        Ok(())
    }

    /// Generate the local search index.
    fn generate_search_index(&self, pages: &[PageInfo]) -> Result<(), BuildError> {
        let index: Vec<serde_json::Value> = pages
            .iter()
            .map(|page| {
                let title = page
                    .doc
                    .frontmatter
                    .as_ref()
                    .map(|f| f.title.clone())
                    .unwrap_or_default();

                let description = page
                    .doc
                    .frontmatter
                    .as_ref()
                    .and_then(|f| f.description.clone())
                    .unwrap_or_default();

                let url = self.path_to_url(&page.output_path);

                // Extract text content (simplified)
                let content = page
                    .doc
                    .content
                    .lines()
                    .filter(|l| !l.starts_with('#') && !l.starts_with("```"))
                    .take(10)
                    .collect::<Vec<_>>()
                    .join(" ");

                serde_json::json!({
                    "title": title,
                    "description": description,
                    "url": url,
                    "content": content,
                })
            })
            .collect();

        let json = serde_json::to_string_pretty(&index)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        fs::write(self.output_dir.join("search-index.json"), json)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        Ok(())
    }

    /// Generate sitemap and robots.txt.
    fn generate_sitemap(&self, pages: &[PageInfo]) -> Result<(), BuildError> {
        let urls: Vec<String> = pages
            .iter()
            .map(|page| {
                format!(
                    "  <url>\n    <loc>{}</loc>\n  </url>",
                    self.path_to_url(&page.output_path)
                )
            })
            .collect();

        let sitemap = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{}
</urlset>"#,
            urls.join("\n")
        );

        fs::write(self.output_dir.join("sitemap.xml"), sitemap)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let robots = format!(
            "User-agent: *\nAllow: /\nSitemap: {}sitemap.xml",
            self.config.site.base_url
        );
        fs::write(self.output_dir.join("robots.txt"), robots)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        Ok(())
    }
}

/// Capitalize first letter of a string.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EditLink, NavEntry};
    use tempfile::tempdir;

    fn site_config(docs: &Path, out: &Path) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.site.docs_dir = docs.display().to_string();
        config.site.output = out.display().to_string();
        config
    }

    #[test]
    fn builds_simple_site() {
        let temp = tempdir().unwrap();
        let docs = temp.path().join("docs");
        let out = temp.path().join("dist");

        fs::create_dir_all(&docs).unwrap();
        fs::write(
            docs.join("index.md"),
            r#"---
title: Home
---
# Welcome
"#,
        )
        .unwrap();

        let builder = StaticBuilder::new(site_config(&docs, &out), GrammarRegistry::new());
        let result = builder.build().unwrap();

        assert_eq!(result.pages, 1);
        assert!(out.join("index.html").exists());
        assert!(out.join("assets/main.css").exists());
        assert!(out.join("sitemap.xml").exists());
    }

    #[test]
    fn maps_named_pages_to_directories() {
        let temp = tempdir().unwrap();
        let docs = temp.path().join("docs");
        let out = temp.path().join("dist");

        fs::create_dir_all(&docs).unwrap();
        fs::write(docs.join("counter.md"), "---\ntitle: Counter\n---\n# Counter").unwrap();

        StaticBuilder::new(site_config(&docs, &out), GrammarRegistry::new())
            .build()
            .unwrap();

        assert!(out.join("counter/index.html").exists());
    }

    #[test]
    fn slug_overrides_output_path() {
        let temp = tempdir().unwrap();
        let docs = temp.path().join("docs");
        let out = temp.path().join("dist");

        fs::create_dir_all(&docs).unwrap();
        fs::write(
            docs.join("old-name.md"),
            "---\ntitle: Renamed\nslug: new-name\n---\n# Renamed",
        )
        .unwrap();

        StaticBuilder::new(site_config(&docs, &out), GrammarRegistry::new())
            .build()
            .unwrap();

        assert!(out.join("new-name/index.html").exists());
        assert!(!out.join("old-name/index.html").exists());
    }

    #[test]
    fn generates_search_index_for_local_provider() {
        let temp = tempdir().unwrap();
        let docs = temp.path().join("docs");
        let out = temp.path().join("dist");

        fs::create_dir_all(&docs).unwrap();
        fs::write(
            docs.join("index.md"),
            "---\ntitle: Test\n---\n# Searchable Content",
        )
        .unwrap();

        StaticBuilder::new(site_config(&docs, &out), GrammarRegistry::new())
            .build()
            .unwrap();

        let index = fs::read_to_string(out.join("search-index.json")).unwrap();
        assert!(index.contains("Test"));
    }

    #[test]
    fn skips_search_index_when_disabled() {
        let temp = tempdir().unwrap();
        let docs = temp.path().join("docs");
        let out = temp.path().join("dist");

        fs::create_dir_all(&docs).unwrap();
        fs::write(docs.join("index.md"), "---\ntitle: Test\n---\nBody").unwrap();

        let mut config = site_config(&docs, &out);
        config.search.provider = SearchProvider::None;

        StaticBuilder::new(config, GrammarRegistry::new())
            .build()
            .unwrap();

        assert!(!out.join("search-index.json").exists());
    }

    #[test]
    fn renders_configured_nav_and_edit_link() {
        let temp = tempdir().unwrap();
        let docs = temp.path().join("docs");
        let out = temp.path().join("dist");

        fs::create_dir_all(&docs).unwrap();
        fs::write(docs.join("index.md"), "---\ntitle: Home\n---\n# Welcome").unwrap();

        let mut config = site_config(&docs, &out);
        config.nav = vec![NavEntry {
            text: "Melange".to_string(),
            link: "https://melange.re".to_string(),
        }];
        config.edit_link = Some(EditLink {
            pattern: "https://example.com/edit/docs/:path".to_string(),
        });

        StaticBuilder::new(config, GrammarRegistry::new())
            .build()
            .unwrap();

        let html = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(html.contains("https://melange.re"));
        assert!(html.contains("https://example.com/edit/docs/index.md"));
    }

    #[test]
    fn derives_sidebar_when_not_configured() {
        let temp = tempdir().unwrap();
        let docs = temp.path().join("docs");
        let out = temp.path().join("dist");

        fs::create_dir_all(docs.join("chapters")).unwrap();
        fs::write(docs.join("index.md"), "---\ntitle: Home\norder: 1\n---\nHi").unwrap();
        fs::write(
            docs.join("chapters/counter.md"),
            "---\ntitle: Counter\norder: 2\n---\nHi",
        )
        .unwrap();

        StaticBuilder::new(site_config(&docs, &out), GrammarRegistry::new())
            .build()
            .unwrap();

        let html = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(html.contains("Chapters"));
        assert!(html.contains("/chapters/counter/"));
    }

    #[test]
    fn sitemap_lists_each_page_url_once() {
        let temp = tempdir().unwrap();
        let docs = temp.path().join("docs");
        let out = temp.path().join("dist");

        fs::create_dir_all(&docs).unwrap();
        fs::write(docs.join("counter.md"), "---\ntitle: Counter\n---\nHi").unwrap();

        let mut config = site_config(&docs, &out);
        config.site.base_url = "https://example.com/".to_string();

        StaticBuilder::new(config, GrammarRegistry::new())
            .build()
            .unwrap();

        let sitemap = fs::read_to_string(out.join("sitemap.xml")).unwrap();
        assert!(sitemap.contains("<loc>https://example.com/counter/</loc>"));
        assert!(!sitemap.contains("example.comhttps://"));
    }

    #[test]
    fn annotates_grammar_fences_in_output() {
        let temp = tempdir().unwrap();
        let docs = temp.path().join("docs");
        let out = temp.path().join("dist");

        fs::create_dir_all(&docs).unwrap();
        fs::write(temp.path().join("reason.json"), r#"{"scopeName": "source.reason"}"#).unwrap();
        fs::write(
            docs.join("index.md"),
            "---\ntitle: Home\n---\n```reason\nlet x = 1;\n```\n",
        )
        .unwrap();

        let grammar = primer_markdown::Grammar::load(
            "reason",
            "source.reason",
            "Reason",
            vec![],
            &temp.path().join("reason.json"),
        )
        .unwrap();
        let mut registry = GrammarRegistry::new();
        registry.register(grammar).unwrap();

        StaticBuilder::new(site_config(&docs, &out), registry)
            .build()
            .unwrap();

        let html = fs::read_to_string(out.join("index.html")).unwrap();
        assert!(html.contains(r#"data-scope="source.reason""#));
    }
}
