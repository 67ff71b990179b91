//! Demo manifest (demos.toml).

use std::fs;
use std::path::Path;

use serde::Deserialize;

use primer_widgets::DEFAULT_MOUNT_ID;

/// Manifest mapping logical chunk names to HTML entry pages.
#[derive(Debug, Clone, Deserialize)]
pub struct DemoManifest {
    /// Directory containing entry pages
    #[serde(default = "default_root")]
    pub root: String,

    /// Output directory for bundled demos
    #[serde(default = "default_output")]
    pub output: String,

    /// Base URL the demos are served under
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Minify inline CSS in entry pages
    #[serde(default = "default_minify")]
    pub minify: bool,

    /// Entries, one per output chunk
    #[serde(default, rename = "entry")]
    pub entries: Vec<DemoEntry>,
}

impl Default for DemoManifest {
    fn default() -> Self {
        Self {
            root: default_root(),
            output: default_output(),
            base_url: default_base_url(),
            minify: default_minify(),
            entries: vec![],
        }
    }
}

fn default_root() -> String {
    "demos".to_string()
}
fn default_output() -> String {
    "dist/demo".to_string()
}
fn default_base_url() -> String {
    "/demo/".to_string()
}
fn default_minify() -> bool {
    true
}
fn default_mount() -> String {
    DEFAULT_MOUNT_ID.to_string()
}

/// A single manifest entry: chunk name -> HTML entry page.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DemoEntry {
    /// Logical chunk name (also the output directory name)
    pub name: String,

    /// Entry HTML file, relative to the manifest root
    pub html: String,

    /// Widget mounted on this page, if any
    #[serde(default)]
    pub widget: Option<String>,

    /// Id of the mount container element
    #[serde(default = "default_mount")]
    pub mount: String,
}

/// Errors that can occur when loading a manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Failed to read {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("Failed to parse {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Duplicate entry name: {0}")]
    DuplicateEntry(String),
}

impl DemoManifest {
    /// Load a manifest from a TOML file.
    ///
    /// A missing file yields an empty manifest with defaults.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ManifestError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let manifest: DemoManifest =
            toml::from_str(&content).map_err(|e| ManifestError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        manifest.validate()?;

        tracing::info!(
            "Loaded demo manifest from {} ({} entries)",
            path.display(),
            manifest.entries.len()
        );
        Ok(manifest)
    }

    /// Reject manifests with colliding chunk names.
    fn validate(&self) -> Result<(), ManifestError> {
        let mut seen = std::collections::HashSet::new();
        for entry in &self.entries {
            if !seen.insert(entry.name.as_str()) {
                return Err(ManifestError::DuplicateEntry(entry.name.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    const MANIFEST: &str = r#"
root = "demos"
output = "dist/demo"
base_url = "/demo/"

[[entry]]
name = "main"
html = "index.html"

[[entry]]
name = "counter"
html = "counter/index.html"
widget = "counter"
"#;

    #[test]
    fn parses_manifest() {
        let manifest: DemoManifest = toml::from_str(MANIFEST).unwrap();

        assert_eq!(manifest.root, "demos");
        assert_eq!(manifest.entries.len(), 2);
        assert_eq!(manifest.entries[0].name, "main");
        assert_eq!(manifest.entries[0].widget, None);
        assert_eq!(manifest.entries[1].widget, Some("counter".to_string()));
        assert_eq!(manifest.entries[1].mount, "root");
    }

    #[test]
    fn missing_file_yields_empty_manifest() {
        let manifest = DemoManifest::load(Path::new("/nonexistent/demos.toml")).unwrap();

        assert!(manifest.entries.is_empty());
        assert_eq!(manifest.base_url, "/demo/");
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("demos.toml");
        fs::write(&path, "[[entry\nname=").unwrap();

        let result = DemoManifest::load(&path);

        assert!(matches!(result, Err(ManifestError::ParseError { .. })));
    }

    #[test]
    fn rejects_duplicate_chunk_names() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("demos.toml");
        fs::write(
            &path,
            r#"
[[entry]]
name = "counter"
html = "a/index.html"

[[entry]]
name = "counter"
html = "b/index.html"
"#,
        )
        .unwrap();

        let result = DemoManifest::load(&path);

        assert!(matches!(result, Err(ManifestError::DuplicateEntry(name)) if name == "counter"));
    }

    #[test]
    fn custom_mount_id_is_respected() {
        let manifest: DemoManifest = toml::from_str(
            r#"
[[entry]]
name = "counter"
html = "counter/index.html"
widget = "counter"
mount = "app"
"#,
        )
        .unwrap();

        assert_eq!(manifest.entries[0].mount, "app");
    }
}
