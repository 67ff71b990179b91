//! Asset pipeline for CSS and JavaScript processing.

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Generate the main CSS file.
    pub fn generate_css() -> String {
        DEFAULT_CSS.to_string()
    }

    /// Generate the main JavaScript file (local search client).
    pub fn generate_js() -> String {
        DEFAULT_JS.to_string()
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

const DEFAULT_CSS: &str = r#"/* Primer docs theme */

:root {
  --sidebar-width: 260px;
  --toc-width: 200px;
  --content-max-width: 760px;
  --border: #e2e2e3;
  --muted: #f6f6f7;
  --muted-foreground: #3c3c43;
  --foreground: #213547;
  --primary: #3451b2;
}

* {
  box-sizing: border-box;
  margin: 0;
  padding: 0;
}

body {
  font-family: system-ui, -apple-system, sans-serif;
  color: var(--foreground);
  line-height: 1.7;
}

.topnav {
  display: flex;
  align-items: center;
  gap: 1.5rem;
  padding: 0.75rem 1.5rem;
  border-bottom: 1px solid var(--border);
}

.site-title {
  font-weight: 700;
  color: var(--foreground);
  text-decoration: none;
}

.topnav-links {
  margin-left: auto;
  display: flex;
  gap: 1rem;
}

.topnav-links a {
  color: var(--muted-foreground);
  text-decoration: none;
  font-size: 0.875rem;
}

.topnav-links a:hover {
  color: var(--primary);
}

.search-input {
  border: 1px solid var(--border);
  border-radius: 0.375rem;
  padding: 0.375rem 0.75rem;
  font-size: 0.875rem;
}

.search-results {
  position: absolute;
  top: 3rem;
  list-style: none;
  background: #fff;
  border: 1px solid var(--border);
  border-radius: 0.375rem;
}

.search-results:empty {
  display: none;
}

.search-results li a {
  display: block;
  padding: 0.375rem 0.75rem;
  color: var(--foreground);
  text-decoration: none;
}

.layout {
  display: grid;
  grid-template-columns: var(--sidebar-width) 1fr;
  min-height: 100vh;
}

.sidebar {
  background: var(--muted);
  border-right: 1px solid var(--border);
  padding: 1.5rem;
  position: sticky;
  top: 0;
  overflow-y: auto;
}

.sidebar-sections,
.sidebar-items {
  list-style: none;
}

.sidebar-label {
  font-weight: 600;
  font-size: 0.875rem;
}

.sidebar-item a {
  display: block;
  padding: 0.25rem 0;
  color: var(--muted-foreground);
  text-decoration: none;
  font-size: 0.875rem;
}

.sidebar-item a:hover {
  color: var(--primary);
}

.main {
  display: grid;
  grid-template-columns: 1fr var(--toc-width);
  gap: 2rem;
  padding: 2rem;
  max-width: calc(var(--content-max-width) + var(--toc-width) + 4rem);
}

.doc {
  max-width: var(--content-max-width);
}

.content h1 {
  font-size: 2rem;
  margin-bottom: 1.5rem;
}

.content h2 {
  font-size: 1.375rem;
  margin: 2rem 0 1rem;
  padding-bottom: 0.5rem;
  border-bottom: 1px solid var(--border);
}

.content p {
  margin-bottom: 1rem;
}

.content a {
  color: var(--primary);
}

.content pre {
  background: var(--muted);
  border: 1px solid var(--border);
  border-radius: 0.5rem;
  padding: 1rem;
  overflow-x: auto;
  font-size: 0.875rem;
  margin-bottom: 1rem;
}

.content code {
  font-family: ui-monospace, monospace;
  font-size: 0.875em;
}

.edit-link {
  margin-top: 2rem;
  font-size: 0.875rem;
}

.toc {
  font-size: 0.8125rem;
  padding-top: 0.5rem;
}

.toc h2 {
  font-size: 0.8125rem;
  text-transform: uppercase;
  letter-spacing: 0.05em;
}

.toc ul {
  list-style: none;
}

.toc a {
  color: var(--muted-foreground);
  text-decoration: none;
}

.toc-level-3 {
  padding-left: 0.75rem;
}
"#;

// Local search client: loads the generated index and filters it as the user
// types. No network calls beyond the one index fetch.
const DEFAULT_JS: &str = r#"
(function() {
  'use strict';

  const input = document.querySelector('.search-input');
  const results = document.querySelector('.search-results');
  if (input === null || results === null) {
    return;
  }

  let index = null;

  async function loadIndex() {
    if (index !== null) {
      return index;
    }
    const response = await fetch(input.dataset.index);
    index = await response.json();
    return index;
  }

  input.addEventListener('input', async function() {
    const query = input.value.trim().toLowerCase();
    results.innerHTML = '';
    if (query.length < 2) {
      return;
    }

    const entries = await loadIndex();
    entries
      .filter(function(entry) {
        return (entry.title + ' ' + entry.description + ' ' + entry.content)
          .toLowerCase()
          .includes(query);
      })
      .slice(0, 8)
      .forEach(function(entry) {
        const li = document.createElement('li');
        const a = document.createElement('a');
        a.href = entry.url;
        a.textContent = entry.title;
        li.appendChild(a);
        results.appendChild(li);
      });
  });
})();
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_nonempty_assets() {
        assert!(AssetPipeline::generate_css().contains(".sidebar"));
        assert!(AssetPipeline::generate_js().contains("search-input"));
    }

    #[test]
    fn minifies_css() {
        let css = ".a {\n  color: red;\n}\n";

        let minified = AssetPipeline::minify_css(css).unwrap();

        assert!(minified.len() < css.len());
        assert!(minified.contains(".a"));
    }

    #[test]
    fn minify_rejects_invalid_css() {
        let result = AssetPipeline::minify_css("} not css");

        assert!(result.is_err());
    }
}
