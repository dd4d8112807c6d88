//! Static site build command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use quire_build::{generate_all, BuildOptions, Config};

/// Load `quire.toml` and apply command-line overrides.
pub fn load_config(path: &Path, output: Option<PathBuf>, draft: bool) -> Result<Config> {
    let mut config = Config::load(path)?;

    if let Some(output) = output {
        config.build.dist_dir = output;
    }
    if draft {
        config.build.contents.draft = true;
    }

    Ok(config)
}

/// Run the build command.
///
/// Fails when any page fails to convert or when there are no pages at all.
pub async fn run(config_path: &Path, output: Option<PathBuf>, draft: bool) -> Result<()> {
    let config = load_config(config_path, output, draft)?;
    let dist_dir = config.build.dist_dir.clone();

    let ok = tokio::task::spawn_blocking(move || {
        generate_all(&config, BuildOptions { is_server: false })
    })
    .await
    .context("Build task panicked")??;

    if !ok {
        anyhow::bail!("Build incomplete: see RESULT above for the pages that failed");
    }

    tracing::info!("Output: {}", dist_dir.display());
    Ok(())
}
