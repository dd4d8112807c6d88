//! Project configuration (`quire.toml`).

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Whole project configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site metadata
    pub site: SiteConfig,

    /// Build settings
    pub build: BuildConfig,

    /// Directory the configuration was loaded from; compiler commands run here
    #[serde(skip)]
    pub root: PathBuf,
}

/// Site metadata available to page layouts.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site title
    pub title: String,

    /// Base URL for the site
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Untitled".to_string(),
            base_url: "/".to_string(),
        }
    }
}

/// Configuration for building a static site.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Output directory
    pub dist_dir: PathBuf,

    /// Content sources
    pub contents: ContentsConfig,

    /// Static assets copied verbatim into the output directory
    pub assets: AssetsConfig,

    /// External compiler commands producing the render artifacts
    pub compiler: CompilerConfig,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            dist_dir: PathBuf::from("dist"),
            contents: ContentsConfig::default(),
            assets: AssetsConfig::default(),
            compiler: CompilerConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContentsConfig {
    /// Source content directory
    pub src_dir: PathBuf,

    /// Content file rendered as the site's home page
    pub index: PathBuf,

    /// Glob patterns of content files to skip
    pub exclude: Vec<String>,

    /// Build pages marked as drafts
    pub draft: bool,
}

impl Default for ContentsConfig {
    fn default() -> Self {
        Self {
            src_dir: PathBuf::from("contents"),
            index: PathBuf::from("contents/index.md"),
            exclude: Vec::new(),
            draft: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Source assets directory
    pub src_dir: PathBuf,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            src_dir: PathBuf::from("static"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Command producing the layout used to render every page
    #[serde(rename = "static")]
    pub static_artifact: Option<StaticCompiler>,

    /// Command producing the client-side hydration script
    pub dynamic: Option<DynamicCompiler>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StaticCompiler {
    /// Shell command to run
    pub command: String,

    /// File the command writes the artifact to
    pub output: PathBuf,

    /// Extra directories the dev server watches for this artifact
    #[serde(default)]
    pub watch: Vec<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DynamicCompiler {
    /// Shell command to run
    pub command: String,

    /// File the command writes the script to
    pub output: PathBuf,

    /// URL pages load the script from (defaults to `base_url` + output file name)
    #[serde(default)]
    pub public_path: Option<String>,

    /// Extra directories the dev server watches for this artifact
    #[serde(default)]
    pub watch: Vec<PathBuf>,
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("Failed to parse {path}: {message}")]
    ParseError { path: String, message: String },
}

impl Config {
    /// Load configuration from `path`.
    ///
    /// A missing file yields the defaults; a malformed one is an error.
    /// Relative paths are resolved against the file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let root = path.parent().map(Path::to_path_buf).unwrap_or_default();

        if !path.exists() {
            tracing::info!("No {} found, using defaults", path.display());
            return Ok(Self::default().with_root(root));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let config = Self::parse(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        tracing::info!("Loaded config from {}", path.display());
        Ok(config.with_root(root))
    }

    /// Parse configuration from TOML source without resolving paths.
    pub fn parse(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    /// Resolve every relative path against `root`.
    pub fn with_root(mut self, root: PathBuf) -> Self {
        let build = &mut self.build;
        build.dist_dir = root.join(&build.dist_dir);
        build.contents.src_dir = root.join(&build.contents.src_dir);
        build.contents.index = root.join(&build.contents.index);
        build.assets.src_dir = root.join(&build.assets.src_dir);

        if let Some(compiler) = build.compiler.static_artifact.as_mut() {
            compiler.output = root.join(&compiler.output);
            compiler.watch = compiler.watch.iter().map(|w| root.join(w)).collect();
        }
        if let Some(compiler) = build.compiler.dynamic.as_mut() {
            compiler.output = root.join(&compiler.output);
            compiler.watch = compiler.watch.iter().map(|w| root.join(w)).collect();
        }

        self.root = root;
        self
    }

    /// Working directory for compiler commands.
    pub fn root_dir(&self) -> &Path {
        if self.root.as_os_str().is_empty() {
            Path::new(".")
        } else {
            &self.root
        }
    }

    /// Directories whose changes require a rebuild.
    pub fn watch_paths(&self) -> Vec<PathBuf> {
        let build = &self.build;
        let mut paths = vec![build.contents.src_dir.clone(), build.assets.src_dir.clone()];

        if let Some(compiler) = &build.compiler.static_artifact {
            paths.extend(compiler.watch.iter().cloned());
        }
        if let Some(compiler) = &build.compiler.dynamic {
            paths.extend(compiler.watch.iter().cloned());
        }

        paths
    }

    /// Paths a build writes itself: the output directory and each compiler
    /// output. Changes here must not trigger a rebuild.
    pub fn generated_paths(&self) -> Vec<PathBuf> {
        let build = &self.build;
        let mut paths = vec![build.dist_dir.clone()];

        if let Some(compiler) = &build.compiler.static_artifact {
            paths.push(compiler.output.clone());
        }
        if let Some(compiler) = &build.compiler.dynamic {
            paths.push(compiler.output.clone());
        }

        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn parses_full_config() {
        let config = Config::parse(
            r#"
[site]
title = "Notes"

[build]
dist_dir = "public"

[build.contents]
src_dir = "pages"
index = "pages/top.md"
exclude = ["**/_*"]
draft = true

[build.assets]
src_dir = "assets"

[build.compiler.static]
command = "make layout"
output = "build/layout.html"

[build.compiler.dynamic]
command = "make app"
output = "public/app.js"
watch = ["src"]
"#,
        )
        .unwrap();

        assert_eq!(config.site.title, "Notes");
        assert_eq!(config.site.base_url, "/");
        assert_eq!(config.build.dist_dir, PathBuf::from("public"));
        assert_eq!(config.build.contents.index, PathBuf::from("pages/top.md"));
        assert_eq!(config.build.contents.exclude, vec!["**/_*".to_string()]);
        assert!(config.build.contents.draft);
        assert_eq!(config.build.assets.src_dir, PathBuf::from("assets"));

        let static_artifact = config.build.compiler.static_artifact.unwrap();
        assert_eq!(static_artifact.command, "make layout");
        assert!(static_artifact.watch.is_empty());

        let dynamic = config.build.compiler.dynamic.unwrap();
        assert_eq!(dynamic.public_path, None);
        assert_eq!(dynamic.watch, vec![PathBuf::from("src")]);
    }

    #[test]
    fn fills_missing_sections_with_defaults() {
        let config = Config::parse("[build.contents]\ndraft = true\n").unwrap();

        assert_eq!(config.build.dist_dir, PathBuf::from("dist"));
        assert_eq!(config.build.contents.src_dir, PathBuf::from("contents"));
        assert_eq!(config.build.contents.index, PathBuf::from("contents/index.md"));
        assert!(config.build.contents.draft);
        assert!(config.build.compiler.static_artifact.is_none());
    }

    #[test]
    fn resolves_paths_against_config_directory() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("quire.toml");
        fs::write(&path, "[build]\ndist_dir = \"out\"\n").unwrap();

        let config = Config::load(&path).unwrap();

        assert_eq!(config.root, temp.path());
        assert_eq!(config.build.dist_dir, temp.path().join("out"));
        assert_eq!(config.build.contents.index, temp.path().join("contents/index.md"));
        assert_eq!(
            config.watch_paths(),
            vec![temp.path().join("contents"), temp.path().join("static")]
        );
    }

    #[test]
    fn generated_paths_cover_compiler_outputs() {
        let config = Config::parse(
            r#"
[build.compiler.static]
command = "make layout"
output = "build/layout.html"

[build.compiler.dynamic]
command = "make app"
output = "static/app.js"
"#,
        )
        .unwrap()
        .with_root(PathBuf::from("/site"));

        assert_eq!(
            config.generated_paths(),
            vec![
                PathBuf::from("/site/dist"),
                PathBuf::from("/site/build/layout.html"),
                PathBuf::from("/site/static/app.js"),
            ]
        );
    }

    #[test]
    fn missing_file_yields_defaults() {
        let temp = tempdir().unwrap();

        let config = Config::load(&temp.path().join("quire.toml")).unwrap();

        assert_eq!(config.site.title, "Untitled");
        assert_eq!(config.build.assets.src_dir, temp.path().join("static"));
    }

    #[test]
    fn errors_on_malformed_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("quire.toml");
        fs::write(&path, "[build\ndist_dir = ").unwrap();

        let result = Config::load(&path);

        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn root_dir_defaults_to_current_directory() {
        assert_eq!(Config::default().root_dir(), Path::new("."));
    }
}
