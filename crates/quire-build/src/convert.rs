//! Per-file conversion.

use std::path::{Path, PathBuf};

use crate::compiler::RenderArtifacts;
use crate::config::BuildConfig;
use crate::error::BuildError;
use crate::fs::ensure_and_write_file;
use crate::log::BuildLog;
use crate::path::resolve_output_path;
use crate::render::{PageRenderer, RenderOutcome};

/// What happened to one content file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionResult {
    /// Written to the contained output path
    Saved(PathBuf),

    /// Could not be rendered; the contained path is the content file
    Failed(PathBuf),
}

/// Converts content files into pages for one build.
pub struct PageConverter<'a> {
    pub config: &'a BuildConfig,
    pub artifacts: &'a RenderArtifacts,
    pub renderer: &'a dyn PageRenderer,
    pub log: &'a dyn BuildLog,
    pub draft_mode: bool,
    pub auto_reload: bool,
}

impl PageConverter<'_> {
    /// Render `file` and save it at its output path.
    ///
    /// A render failure yields `Failed` and writes nothing. Failing to write a
    /// rendered page is an environment problem and aborts the build.
    pub fn convert(&self, file: &Path) -> Result<ConversionResult, BuildError> {
        self.log.info("--------------------------------");
        self.log.info(&format!("BEGIN: {}", file.display()));

        let outcome = self
            .renderer
            .render(file, self.artifacts, self.draft_mode, self.auto_reload);

        let html = match outcome {
            RenderOutcome::Rendered(html) if !html.is_empty() => html,
            RenderOutcome::Rendered(_) => {
                return Ok(self.fail(file, "renderer produced an empty document"));
            }
            RenderOutcome::RenderFailed(reason) => return Ok(self.fail(file, &reason)),
        };

        let save_path = resolve_output_path(file, self.config);
        self.log.info(&format!("SAVE AS: {}", save_path.display()));
        ensure_and_write_file(&save_path, &html)?;

        Ok(ConversionResult::Saved(save_path))
    }

    fn fail(&self, file: &Path, reason: &str) -> ConversionResult {
        self.log.info(&format!("error: {}", reason));
        self.log.info("ERROR: Failed to convert!");
        ConversionResult::Failed(file.to_path_buf())
    }
}
