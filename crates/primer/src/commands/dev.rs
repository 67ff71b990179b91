//! Development server command.

use std::path::Path;

use anyhow::Result;

use primer_server::{DevServer, DevServerConfig};
use primer_site::SiteConfig;

/// Run the dev server.
pub async fn run(config_path: &Path, port: u16, open: bool) -> Result<()> {
    tracing::info!("Starting development server on port {}", port);

    let site = SiteConfig::load(config_path)?;
    let base_dir = config_path.parent().unwrap_or(Path::new("."));
    let grammars = site.load_grammars(base_dir)?;

    let config = DevServerConfig {
        docs_dir: site.site.docs_dir.clone().into(),
        port,
        open,
        ..Default::default()
    };

    DevServer::new(config).with_grammars(grammars).start().await?;

    Ok(())
}
