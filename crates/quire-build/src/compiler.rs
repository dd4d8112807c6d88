//! Render artifact compilation.

use std::fs;
use std::path::Path;
use std::process::Command;

use crate::config::Config;
use crate::error::BuildError;
use crate::templates::DEFAULT_LAYOUT;

/// Artifacts produced once per build and shared by every page conversion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderArtifacts {
    /// Static render code (the page layout)
    pub static_code: String,

    /// Reference to the client hydration script, empty when there is none
    pub app_js: String,
}

/// Produces the render artifacts for a build.
pub trait ArtifactCompiler: Send + Sync {
    /// Compile the static artifact used to render every page.
    fn compile_static(&self, config: &Config) -> Result<String, BuildError>;

    /// Compile the client script and return the reference pages load it by.
    fn compile_dynamic(&self, config: &Config) -> Result<String, BuildError>;
}

impl<T: ArtifactCompiler + ?Sized> ArtifactCompiler for &T {
    fn compile_static(&self, config: &Config) -> Result<String, BuildError> {
        (**self).compile_static(config)
    }

    fn compile_dynamic(&self, config: &Config) -> Result<String, BuildError> {
        (**self).compile_dynamic(config)
    }
}

/// Compile both artifacts concurrently.
///
/// Either failure aborts the build; both have finished when this returns.
pub fn compile_artifacts<C>(compiler: &C, config: &Config) -> Result<RenderArtifacts, BuildError>
where
    C: ArtifactCompiler + ?Sized,
{
    let (static_code, app_js) = rayon::join(
        || compiler.compile_static(config),
        || compiler.compile_dynamic(config),
    );

    Ok(RenderArtifacts {
        static_code: static_code?,
        app_js: app_js?,
    })
}

/// Runs the shell commands configured under `[build.compiler]`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandCompiler;

impl ArtifactCompiler for CommandCompiler {
    fn compile_static(&self, config: &Config) -> Result<String, BuildError> {
        let Some(section) = &config.build.compiler.static_artifact else {
            return Ok(DEFAULT_LAYOUT.to_string());
        };

        run_command(&section.command, config.root_dir(), "static")?;

        fs::read_to_string(&section.output).map_err(|e| BuildError::CompileError {
            artifact: "static",
            message: format!("{}: {}", section.output.display(), e),
        })
    }

    fn compile_dynamic(&self, config: &Config) -> Result<String, BuildError> {
        let Some(section) = &config.build.compiler.dynamic else {
            return Ok(String::new());
        };

        run_command(&section.command, config.root_dir(), "dynamic")?;

        if let Some(public_path) = &section.public_path {
            return Ok(public_path.clone());
        }

        let file_name = section
            .output
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("app.js");
        Ok(format!("{}{}", config.site.base_url, file_name))
    }
}

/// Run `command` through the platform shell, failing on a non-zero exit.
fn run_command(command: &str, cwd: &Path, artifact: &'static str) -> Result<(), BuildError> {
    tracing::info!("Compiling {} artifact: {}", artifact, command);

    let output = shell(command)
        .current_dir(cwd)
        .output()
        .map_err(|e| BuildError::CompileError {
            artifact,
            message: format!("failed to run `{}`: {}", command, e),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(BuildError::CompileError {
            artifact,
            message: format!("`{}` exited with {}: {}", command, output.status, stderr.trim()),
        });
    }

    Ok(())
}

#[cfg(not(windows))]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}
