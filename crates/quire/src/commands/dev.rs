//! Development server command.

use std::path::Path;

use anyhow::Result;
use quire_server::{DevServer, DevServerConfig};

use super::build::load_config;

/// Run the dev server.
pub async fn run(config_path: &Path, port: u16, draft: bool, open: bool) -> Result<()> {
    tracing::info!("Starting development server on port {}", port);

    let config = DevServerConfig {
        config: load_config(config_path, None, draft)?,
        port,
        open,
        ..Default::default()
    };

    DevServer::new(config).start().await?;

    Ok(())
}
