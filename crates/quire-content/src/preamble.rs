//! Preamble extraction and parsing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata block at the head of a content file.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct Preamble {
    /// Page title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Draft pages are only rendered in draft mode
    #[serde(default)]
    pub draft: bool,

    /// Client module to hydrate the page with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,

    /// Any other keys, handed to the client as flags
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Preamble {
    /// The preamble as a JSON object, suitable for embedding in a page.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Split a content file into its preamble and body.
///
/// The preamble is mandatory: a file that does not open with `---` is rejected.
pub fn extract_preamble(source: &str) -> Result<(Preamble, &str), PreambleError> {
    let trimmed = source.trim_start();

    if !trimmed.starts_with("---") {
        return Err(PreambleError::Missing);
    }

    let after_open = &trimmed[3..];
    let Some(close_pos) = after_open.find("\n---") else {
        return Err(PreambleError::Unclosed);
    };

    let yaml_content = after_open[..close_pos].trim();
    let remaining = &after_open[close_pos + 4..];

    // An empty document deserializes to null, not to an empty mapping
    let preamble = if yaml_content.is_empty() {
        Preamble::default()
    } else {
        serde_yaml::from_str(yaml_content)
            .map_err(|e| PreambleError::InvalidYaml(e.to_string()))?
    };

    Ok((preamble, remaining.trim_start()))
}

/// Errors that can occur when parsing a preamble.
#[derive(Debug, thiserror::Error)]
pub enum PreambleError {
    #[error("Missing preamble - content must start with ---")]
    Missing,

    #[error("Unclosed preamble block - missing closing ---")]
    Unclosed,

    #[error("Invalid YAML in preamble: {0}")]
    InvalidYaml(String),
}
