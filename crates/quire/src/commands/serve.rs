//! Preview a built site.

use std::path::{Path, PathBuf};

use anyhow::Result;
use quire_build::Config;

/// Directory to preview: `--dir` when given, otherwise the configured
/// `dist_dir`, so `serve` shows whatever `build` wrote.
pub fn resolve_dir(config_path: &Path, dir: Option<PathBuf>) -> Result<PathBuf> {
    match dir {
        Some(dir) => Ok(dir),
        None => Ok(Config::load(config_path)?.build.dist_dir),
    }
}

/// Run the serve command.
pub async fn run(config_path: &Path, port: u16, dir: Option<PathBuf>, open: bool) -> Result<()> {
    let dir = resolve_dir(config_path, dir)?;

    if !dir.is_dir() {
        anyhow::bail!(
            "Nothing to preview at {}. Run 'quire build' first.",
            dir.display()
        );
    }

    quire_server::serve_dir(&dir, "127.0.0.1", port, open).await?;

    Ok(())
}
