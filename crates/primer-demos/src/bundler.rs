//! Demo bundler.

use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::time::Instant;

use regex::Regex;

use primer_widgets::{inject_widget, MountError, WidgetRegistry};

use crate::manifest::{DemoEntry, DemoManifest};

/// Result of bundling all manifest entries.
#[derive(Debug)]
pub struct BundleResult {
    /// Number of pages written
    pub built: usize,

    /// Per-entry failures; bundling continues past them
    pub failures: Vec<EntryFailure>,

    /// Total bundle time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// A failure bundling one manifest entry.
#[derive(Debug)]
pub struct EntryFailure {
    /// Chunk name of the failed entry
    pub name: String,

    /// Human-readable reason
    pub message: String,
}

/// Errors that abort the whole bundle.
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// Bundles demo entry pages according to a manifest.
pub struct DemoBundler {
    manifest: DemoManifest,
    registry: WidgetRegistry,
}

impl DemoBundler {
    /// Create a bundler with the built-in widget registry.
    pub fn new(manifest: DemoManifest) -> Self {
        Self {
            manifest,
            registry: WidgetRegistry::with_builtins(),
        }
    }

    /// Create a bundler with a custom widget registry.
    pub fn with_registry(manifest: DemoManifest, registry: WidgetRegistry) -> Self {
        Self { manifest, registry }
    }

    /// Bundle every manifest entry.
    ///
    /// Entries fail independently: a missing entry file, unknown widget, or
    /// missing mount container is recorded in the result and the remaining
    /// entries still build.
    pub fn bundle(&self) -> Result<BundleResult, BundleError> {
        let start = Instant::now();

        let output_dir = PathBuf::from(&self.manifest.output);
        fs::create_dir_all(&output_dir).map_err(|e| BundleError::WriteError(e.to_string()))?;

        let mut built = 0;
        let mut failures = Vec::new();

        for entry in &self.manifest.entries {
            match self.bundle_entry(entry, &output_dir) {
                Ok(()) => built += 1,
                Err(failure) => {
                    tracing::error!("Demo entry '{}' failed: {}", failure.name, failure.message);
                    failures.push(failure);
                }
            }
        }

        Ok(BundleResult {
            built,
            failures,
            duration_ms: start.elapsed().as_millis() as u64,
            output_dir,
        })
    }

    /// Bundle a single entry.
    fn bundle_entry(&self, entry: &DemoEntry, output_dir: &Path) -> Result<(), EntryFailure> {
        let source_path = PathBuf::from(&self.manifest.root).join(&entry.html);

        let page = fs::read_to_string(&source_path).map_err(|e| EntryFailure {
            name: entry.name.clone(),
            message: format!("failed to read {}: {}", source_path.display(), e),
        })?;

        let page = if self.manifest.minify {
            minify_inline_styles(&page)
        } else {
            page
        };

        // Relative src/href references become absolute URLs under the base
        // URL, and the referenced files move into the output alongside them.
        let entry_dir = Path::new(&entry.html)
            .parent()
            .unwrap_or(Path::new(""))
            .to_path_buf();
        let (page, assets) = rewrite_asset_refs(&page, &self.manifest.base_url, &entry_dir);

        for asset in &assets {
            let source = Path::new(&self.manifest.root).join(asset);
            if !source.is_file() {
                tracing::warn!(
                    "Demo entry '{}' references a missing asset: {}",
                    entry.name,
                    source.display()
                );
                continue;
            }

            let dest = output_dir.join(asset);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent).map_err(|e| EntryFailure {
                    name: entry.name.clone(),
                    message: format!("failed to create asset dir: {}", e),
                })?;
            }
            fs::copy(&source, &dest).map_err(|e| EntryFailure {
                name: entry.name.clone(),
                message: format!("failed to copy {}: {}", source.display(), e),
            })?;
        }

        let page = match &entry.widget {
            Some(widget_name) => {
                let Some(widget) = self.registry.get(widget_name) else {
                    return Err(EntryFailure {
                        name: entry.name.clone(),
                        message: format!("unknown widget '{}'", widget_name),
                    });
                };

                // Content-hashed script chunk, written once per entry
                let script = widget.script(&entry.mount);
                let asset_name = format!("{}-{}.js", entry.name, content_hash(&script));
                let script_src = format!("{}assets/{}", self.manifest.base_url, asset_name);

                match inject_widget(&page, &entry.mount, &widget.initial_html(), &script_src) {
                    Ok(mounted) => {
                        let assets_dir = output_dir.join("assets");
                        fs::create_dir_all(&assets_dir).map_err(|e| EntryFailure {
                            name: entry.name.clone(),
                            message: format!("failed to create assets dir: {}", e),
                        })?;
                        fs::write(assets_dir.join(&asset_name), &script).map_err(|e| {
                            EntryFailure {
                                name: entry.name.clone(),
                                message: format!("failed to write script asset: {}", e),
                            }
                        })?;
                        mounted
                    }
                    Err(MountError::MissingMountPoint(id)) => {
                        // The page is still emitted, just without the widget.
                        tracing::error!(
                            "Failed to start {}: couldn't find the #{} element in {}",
                            widget_name,
                            id,
                            source_path.display()
                        );
                        page
                    }
                    Err(e) => {
                        return Err(EntryFailure {
                            name: entry.name.clone(),
                            message: e.to_string(),
                        });
                    }
                }
            }
            None => page,
        };

        // main -> dist/demo/index.html, counter -> dist/demo/counter/index.html
        let page_path = if entry.name == "main" {
            output_dir.join("index.html")
        } else {
            let dir = output_dir.join(&entry.name);
            fs::create_dir_all(&dir).map_err(|e| EntryFailure {
                name: entry.name.clone(),
                message: format!("failed to create output dir: {}", e),
            })?;
            dir.join("index.html")
        };

        fs::write(&page_path, page).map_err(|e| EntryFailure {
            name: entry.name.clone(),
            message: format!("failed to write {}: {}", page_path.display(), e),
        })?;

        tracing::info!("Bundled demo '{}' -> {}", entry.name, page_path.display());
        Ok(())
    }
}

/// Rewrite relative `src`/`href` references to absolute URLs under the base
/// URL.
///
/// References are resolved against the entry page's directory inside the
/// manifest root, so they keep working after the page moves into the output
/// tree. Returns the rewritten page and the referenced file paths (relative to
/// the manifest root). Absolute, scheme-qualified, and fragment references are
/// left untouched.
fn rewrite_asset_refs(page: &str, base_url: &str, entry_dir: &Path) -> (String, Vec<PathBuf>) {
    let re = Regex::new(r#"(?i)\b(src|href)="([^"]*)""#).expect("ref pattern is valid");
    let mut assets = Vec::new();

    let rewritten = re
        .replace_all(page, |caps: &regex::Captures| {
            let target = &caps[2];
            if !is_relative_ref(target) {
                return caps[0].to_string();
            }

            let resolved = normalize_path(&entry_dir.join(target));
            let url_path = resolved.to_string_lossy().replace('\\', "/");
            assets.push(resolved);
            format!(r#"{}="{}{}""#, &caps[1], base_url, url_path)
        })
        .to_string();

    (rewritten, assets)
}

fn is_relative_ref(target: &str) -> bool {
    if target.is_empty()
        || target.starts_with('/')
        || target.starts_with('#')
        || target.starts_with('?')
    {
        return false;
    }

    // A colon before any slash means a scheme (http:, mailto:, data:)
    !target
        .split(['/', '?', '#'])
        .next()
        .is_some_and(|head| head.contains(':'))
}

/// Collapse `.` and `..` segments without touching the filesystem.
fn normalize_path(path: &Path) -> PathBuf {
    use std::path::Component;

    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                out.pop();
            }
            Component::CurDir => {}
            other => out.push(other),
        }
    }
    out
}

/// Short content hash used in chunk file names.
fn content_hash(content: &str) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("{:08x}", hasher.finish() as u32)
}

/// Minify the contents of inline `<style>` blocks.
///
/// Blocks that fail to parse are left untouched.
fn minify_inline_styles(page: &str) -> String {
    use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

    let re = Regex::new(r"(?s)<style>(.*?)</style>").expect("style pattern is valid");

    re.replace_all(page, |caps: &regex::Captures| {
        let css = &caps[1];
        let minified = StyleSheet::parse(css, ParserOptions::default())
            .ok()
            .and_then(|sheet| {
                sheet
                    .to_css(PrinterOptions {
                        minify: true,
                        ..Default::default()
                    })
                    .ok()
            })
            .map(|out| out.code);

        match minified {
            Some(code) => format!("<style>{}</style>", code),
            None => caps[0].to_string(),
        }
    })
    .to_string()
}
