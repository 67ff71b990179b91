//! Initialize documentation in a project.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub async fn run(yes: bool) -> Result<()> {
    tracing::info!("Initializing primer...");

    let docs_dir = Path::new("docs");

    // Check if docs already exists
    if docs_dir.exists() {
        if !yes {
            tracing::warn!("docs/ directory already exists. Use --yes to overwrite.");
            return Ok(());
        }
    } else {
        fs::create_dir_all(docs_dir).context("Failed to create docs directory")?;
    }

    // Create default site config
    let config_path = Path::new("site.toml");
    if !config_path.exists() || yes {
        fs::write(config_path, DEFAULT_CONFIG).context("Failed to write site.toml")?;
        tracing::info!("Created site.toml");
    }

    // Create demo manifest
    let demos_path = Path::new("demos.toml");
    if !demos_path.exists() || yes {
        fs::write(demos_path, DEFAULT_MANIFEST).context("Failed to write demos.toml")?;
        tracing::info!("Created demos.toml");
    }

    // Create index page
    let index_path = docs_dir.join("index.md");
    if !index_path.exists() || yes {
        fs::write(&index_path, DEFAULT_INDEX).context("Failed to write index.md")?;
        tracing::info!("Created docs/index.md");
    }

    // Create counter chapter
    let counter_path = docs_dir.join("counter.md");
    if !counter_path.exists() || yes {
        fs::write(&counter_path, DEFAULT_COUNTER_DOC).context("Failed to write counter.md")?;
        tracing::info!("Created docs/counter.md");
    }

    // Create demo entry pages
    let demos_dir = Path::new("demos");
    let counter_demo_dir = demos_dir.join("counter");
    if !counter_demo_dir.exists() {
        fs::create_dir_all(&counter_demo_dir).context("Failed to create demos directory")?;
    }

    let demo_index_path = demos_dir.join("index.html");
    if !demo_index_path.exists() || yes {
        fs::write(&demo_index_path, DEFAULT_DEMO_INDEX)
            .context("Failed to write demos/index.html")?;
        tracing::info!("Created demos/index.html");
    }

    let counter_entry_path = counter_demo_dir.join("index.html");
    if !counter_entry_path.exists() || yes {
        fs::write(&counter_entry_path, DEFAULT_COUNTER_ENTRY)
            .context("Failed to write demos/counter/index.html")?;
        tracing::info!("Created demos/counter/index.html");
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'primer dev' to start the development server.");

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# Primer Configuration

[site]
# Site title
title = "My Documentation"

# Site description
description = ""

# Source directory for documentation
docs_dir = "docs"

# Output directory for built site
output = "dist"

# Base URL (for deployment)
base_url = "/"

[search]
# "local" generates search-index.json, "none" disables search
provider = "local"

# Uncomment to render "Edit this page" links:
# [edit_link]
# pattern = "https://github.com/you/project/edit/main/docs/:path"

[[nav]]
text = "Home"
link = "/"

[[sidebar]]
text = "Chapters"

[[sidebar.items]]
text = "Intro"
link = "/"

[[sidebar.items]]
text = "Counter"
link = "/counter/"

[markdown]
typographer = true
footnotes = true

# Register custom syntax grammars:
# [[markdown.grammars]]
# id = "reason"
# scope_name = "source.reason"
# display_name = "Reason"
# path = "grammars/reason.json"
# aliases = ["re", "rei"]
"#;

const DEFAULT_MANIFEST: &str = r#"# Demo bundler manifest

root = "demos"
output = "dist/demo"
base_url = "/demo/"
minify = true

[[entry]]
name = "main"
html = "index.html"

[[entry]]
name = "counter"
html = "counter/index.html"
widget = "counter"
"#;

const DEFAULT_INDEX: &str = r#"---
title: Welcome
order: 1
---

# Welcome to Your Documentation

This is your documentation site, powered by **primer**.

## Chapters

Work through the chapters in order. Each one builds a small demo you can run
in the browser.

- [Counter](/counter/) - a number that can be incremented or decremented.
"#;

const DEFAULT_COUNTER_DOC: &str = r#"---
title: Counter
order: 2
---

# Counter

The simplest possible interactive widget: a number with two buttons.

Pressing the `-` button decreases the number by one, and pressing the `+`
button increases it by one. There is no lower or upper bound.

See it running on the [demo page](/demo/counter/).

## Exercises

What happens when you press `-` five times in a row starting from zero?
"#;

const DEFAULT_DEMO_INDEX: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Demos</title>
</head>
<body>
  <h1>Demos</h1>
  <ul>
    <li><a href="counter/">Counter</a></li>
  </ul>
</body>
</html>
"#;

const DEFAULT_COUNTER_ENTRY: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Counter</title>
  <style>
    body {
      font-family: system-ui, sans-serif;
      margin: 2rem;
    }
    .counter {
      display: flex;
      padding: 1em;
      gap: 1em;
    }
  </style>
</head>
<body>
  <h1>Counter</h1>
  <div id="root"></div>
</body>
</html>
"#;
