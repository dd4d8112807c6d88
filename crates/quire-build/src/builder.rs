//! Static site builder.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::{SecondsFormat, Utc};

use crate::compiler::{compile_artifacts, ArtifactCompiler, CommandCompiler};
use crate::config::Config;
use crate::convert::{ConversionResult, PageConverter};
use crate::error::BuildError;
use crate::fs::{copy_tree, discover_files};
use crate::log::{BuildLog, TracingLog};
use crate::path::resolve_output_path;
use crate::render::{LayoutRenderer, PageRenderer};

/// Options for one build.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Building for the local dev server: pages get the live-reload client
    pub is_server: bool,
}

/// Pages that were written and pages that failed, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub succeeded: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}

impl BuildSummary {
    /// Classify one conversion result.
    pub fn record(&mut self, result: ConversionResult, file: &Path) {
        match result {
            ConversionResult::Saved(_) => self.succeeded.push(file.to_path_buf()),
            ConversionResult::Failed(_) => self.failed.push(file.to_path_buf()),
        }
    }

    /// At least one page was written and none failed.
    pub fn is_success(&self) -> bool {
        !self.succeeded.is_empty() && self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// Write the `RESULT:` block.
    pub fn report(&self, log: &dyn BuildLog) {
        log.info("RESULT:");
        log.info(&format!("  OK: {}", self.succeeded.len()));
        for (i, file) in self.failed.iter().enumerate() {
            log.info(&format!("  NG({}): {}", i + 1, file.display()));
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Per-page outcome
    pub summary: BuildSummary,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

impl BuildResult {
    pub fn is_success(&self) -> bool {
        self.summary.is_success()
    }
}

/// Static site builder.
///
/// One call to [`StaticBuilder::build`] is one linear pass: compile artifacts,
/// discover content, convert each file, copy assets, report.
pub struct StaticBuilder<'a> {
    config: &'a Config,
    compiler: Box<dyn ArtifactCompiler + 'a>,
    renderer: Box<dyn PageRenderer + 'a>,
    log: Arc<dyn BuildLog + 'a>,
}

impl<'a> StaticBuilder<'a> {
    /// Create a builder with the shell-command compiler, the layout renderer
    /// and `tracing` output.
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            compiler: Box::new(CommandCompiler),
            renderer: Box::new(LayoutRenderer::new(&config.site)),
            log: Arc::new(TracingLog),
        }
    }

    pub fn with_compiler(mut self, compiler: impl ArtifactCompiler + 'a) -> Self {
        self.compiler = Box::new(compiler);
        self
    }

    pub fn with_renderer(mut self, renderer: impl PageRenderer + 'a) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    pub fn with_log(mut self, log: Arc<dyn BuildLog + 'a>) -> Self {
        self.log = log;
        self
    }

    /// Build the site.
    ///
    /// Content files that fail to render are reported in the summary; any
    /// other failure aborts the build.
    pub fn build(&self, options: BuildOptions) -> Result<BuildResult, BuildError> {
        let start = Instant::now();
        let build = &self.config.build;

        self.log.info(&format!(
            "START: {}",
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
        ));

        let artifacts = compile_artifacts(self.compiler.as_ref(), self.config)?;

        let files = discover_files(&build.contents.src_dir, &build.contents.exclude)?;
        tracing::debug!("Discovered {} content files", files.len());
        self.warn_on_collisions(&files);

        let converter = PageConverter {
            config: build,
            artifacts: &artifacts,
            renderer: self.renderer.as_ref(),
            log: self.log.as_ref(),
            draft_mode: build.contents.draft,
            auto_reload: options.is_server,
        };

        let mut summary = BuildSummary::default();
        for file in &files {
            let result = converter.convert(file)?;
            summary.record(result, file);
        }

        // After the pages, so an asset that shadows a page wins
        if build.assets.src_dir.is_dir() {
            let copied = copy_tree(&build.assets.src_dir, &build.dist_dir)?;
            tracing::debug!(
                "Copied {} assets from {}",
                copied,
                build.assets.src_dir.display()
            );
        } else {
            tracing::warn!(
                "Assets directory not found: {}",
                build.assets.src_dir.display()
            );
        }

        summary.report(self.log.as_ref());

        Ok(BuildResult {
            summary,
            duration_ms: start.elapsed().as_millis() as u64,
            output_dir: build.dist_dir.clone(),
        })
    }

    /// Two content files resolving to the same page overwrite each other.
    fn warn_on_collisions(&self, files: &[PathBuf]) {
        let mut seen: HashMap<PathBuf, &Path> = HashMap::new();

        for file in files {
            let output = resolve_output_path(file, &self.config.build);
            if let Some(previous) = seen.insert(output.clone(), file) {
                self.log.warn(&format!(
                    "{} and {} both write {}; the later one wins",
                    previous.display(),
                    file.display(),
                    output.display()
                ));
            }
        }
    }
}

/// Build the whole site with the default collaborators.
///
/// Returns `true` iff at least one page was written and none failed.
pub fn generate_all(config: &Config, options: BuildOptions) -> Result<bool, BuildError> {
    let result = StaticBuilder::new(config).build(options)?;
    Ok(result.is_success())
}
