//! Scaffold a new site.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command in the current directory.
pub async fn run(yes: bool) -> Result<()> {
    tracing::info!("Initializing quire...");

    scaffold(Path::new("."), yes)?;

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'quire dev' to start the development server.");

    Ok(())
}

/// Write the starter files under `root`, leaving existing files alone
/// unless `overwrite` is set.
pub fn scaffold(root: &Path, overwrite: bool) -> Result<()> {
    let files = [
        ("quire.toml", DEFAULT_CONFIG),
        ("contents/index.md", DEFAULT_INDEX),
        ("contents/about.md", DEFAULT_ABOUT),
        ("static/style.css", DEFAULT_STYLE),
    ];

    for (name, body) in files {
        let path = root.join(name);
        if path.exists() && !overwrite {
            tracing::warn!("{} already exists. Use --yes to overwrite.", name);
            continue;
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, body).with_context(|| format!("Failed to write {}", name))?;
        tracing::info!("Created {}", name);
    }

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# Quire configuration

[site]
title = "My Site"
base_url = "/"

[build]
dist_dir = "dist"

[build.contents]
src_dir = "contents"
index = "contents/index.md"
exclude = ["**/_*", "**/*.tmp"]
draft = false

[build.assets]
src_dir = "static"

# Render pages with a custom layout produced by a command:
# [build.compiler.static]
# command = "cp layouts/page.html build/layout.html"
# output = "build/layout.html"
# watch = ["layouts"]

# Attach a client-side bundle to every page:
# [build.compiler.dynamic]
# command = "elm make src/Main.elm --output=static/app.js"
# output = "static/app.js"
# watch = ["src"]
"#;

const DEFAULT_INDEX: &str = r#"---
title: Home
---

# Welcome

This site is built with quire. Every page under `contents/` becomes
`dist/<path>/index.html`, so `about.md` is served at [/about/](/about/).
"#;

const DEFAULT_ABOUT: &str = r#"---
title: About
---

# About

Edit `contents/about.md` while `quire dev` is running and the browser
reloads on save.

## Drafts

Mark a page with `draft: true` in its preamble to leave it out of
builds unless `--draft` is passed.
"#;

const DEFAULT_STYLE: &str = r#"body {
  font-family: system-ui, sans-serif;
  max-width: 42rem;
  margin: 2rem auto;
  padding: 0 1rem;
  line-height: 1.6;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use quire_build::{generate_all, BuildOptions, Config};
    use tempfile::tempdir;

    #[test]
    fn scaffolds_starter_site() {
        let temp = tempdir().unwrap();

        scaffold(temp.path(), false).unwrap();

        assert!(temp.path().join("quire.toml").exists());
        assert!(temp.path().join("contents/index.md").exists());
        assert!(temp.path().join("contents/about.md").exists());
        assert!(temp.path().join("static/style.css").exists());
    }

    #[test]
    fn keeps_existing_files_without_overwrite() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("quire.toml"), "# mine").unwrap();

        scaffold(temp.path(), false).unwrap();
        assert_eq!(
            fs::read_to_string(temp.path().join("quire.toml")).unwrap(),
            "# mine"
        );

        scaffold(temp.path(), true).unwrap();
        assert_eq!(
            fs::read_to_string(temp.path().join("quire.toml")).unwrap(),
            DEFAULT_CONFIG
        );
    }

    #[test]
    fn scaffolded_site_builds() {
        let temp = tempdir().unwrap();
        scaffold(temp.path(), false).unwrap();

        let config = Config::load(&temp.path().join("quire.toml")).unwrap();
        let ok = generate_all(&config, BuildOptions { is_server: false }).unwrap();

        assert!(ok);
        assert!(temp.path().join("dist/index.html").exists());
        assert!(temp.path().join("dist/about/index.html").exists());
        assert!(temp.path().join("dist/style.css").exists());
    }
}
