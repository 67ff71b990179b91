//! Static site and demo build command.

use std::path::{Path, PathBuf};

use anyhow::Result;

use primer_demos::{DemoBundler, DemoManifest};
use primer_site::{SiteConfig, StaticBuilder};

/// Run the build command.
pub async fn run(
    config_path: &Path,
    demos_path: &Path,
    output: Option<PathBuf>,
    no_minify: bool,
) -> Result<()> {
    tracing::info!("Building static site...");

    let mut config = SiteConfig::load(config_path)?;
    if no_minify {
        config.site.minify = false;
    }

    let base_dir = config_path.parent().unwrap_or(Path::new("."));
    let grammars = config.load_grammars(base_dir)?;
    if !grammars.is_empty() {
        tracing::info!("Registered {} custom grammars", grammars.len());
    }

    let mut builder = StaticBuilder::new(config, grammars);
    if let Some(output) = output {
        builder = builder.with_output(output);
    }

    let result = builder.build()?;

    tracing::info!(
        "Built {} pages in {}ms",
        result.pages,
        result.duration_ms
    );
    tracing::info!("Output: {}", result.output_dir.display());

    // Bundle demo pages
    let mut manifest = DemoManifest::load(demos_path)?;
    if no_minify {
        manifest.minify = false;
    }

    if manifest.entries.is_empty() {
        return Ok(());
    }

    let demos = DemoBundler::new(manifest).bundle()?;

    tracing::info!(
        "Bundled {} demo pages in {}ms",
        demos.built,
        demos.duration_ms
    );

    if !demos.failures.is_empty() {
        for failure in &demos.failures {
            tracing::warn!("Demo '{}' was not built: {}", failure.name, failure.message);
        }
        anyhow::bail!("{} demo entries failed to build", demos.failures.len());
    }

    Ok(())
}
