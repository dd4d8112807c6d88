//! Build pipeline for quire sites.
//!
//! Compiles the render artifacts once, converts every content file to a
//! pretty-URL HTML page, copies static assets and reports which pages failed.

pub mod builder;
pub mod compiler;
pub mod config;
pub mod convert;
pub mod error;
pub mod exclude;
pub mod fs;
pub mod log;
pub mod path;
pub mod reload;
pub mod render;
pub mod templates;

pub use builder::{generate_all, BuildOptions, BuildResult, BuildSummary, StaticBuilder};
pub use compiler::{compile_artifacts, ArtifactCompiler, CommandCompiler, RenderArtifacts};
pub use config::{
    AssetsConfig, BuildConfig, CompilerConfig, Config, ConfigError, ContentsConfig,
    DynamicCompiler, SiteConfig, StaticCompiler,
};
pub use convert::{ConversionResult, PageConverter};
pub use error::BuildError;
pub use log::{BuildLog, MemoryLog, TracingLog};
pub use path::resolve_output_path;
pub use render::{LayoutRenderer, PageRenderer, RenderOutcome};
