//! Fatal build errors.

/// Errors that abort a build.
///
/// A content file that fails to render is not an error: it is recorded as a
/// failed page and the build carries on.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to compile {artifact} artifact: {message}")]
    CompileError {
        artifact: &'static str,
        message: String,
    },

    #[error("Failed to read content directory: {0}")]
    ReadError(String),

    #[error("Invalid exclude pattern `{pattern}`: {message}")]
    PatternError { pattern: String, message: String },

    #[error("Failed to write output: {0}")]
    WriteError(String),

    #[error("Failed to copy assets: {0}")]
    CopyError(String),
}
