//! Glob-style exclusion patterns for content discovery.

use std::path::{Component, Path};

use regex::Regex;

use crate::error::BuildError;

/// A compiled set of exclusion globs.
///
/// `*` matches within a path segment, `**` across segments and `?` a single
/// character. A path is excluded when a pattern matches either its form
/// relative to the discovery root or its full form.
#[derive(Debug, Default)]
pub struct ExcludeSet {
    patterns: Vec<Regex>,
}

impl ExcludeSet {
    /// Compile glob patterns.
    pub fn new(patterns: &[String]) -> Result<Self, BuildError> {
        let patterns = patterns
            .iter()
            .map(|pattern| {
                Regex::new(&glob_to_regex(pattern)).map_err(|e| BuildError::PatternError {
                    pattern: pattern.clone(),
                    message: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    /// Whether `path`, found under `root`, is excluded.
    pub fn is_excluded(&self, path: &Path, root: &Path) -> bool {
        if self.patterns.is_empty() {
            return false;
        }

        let full = normalize(path);
        let relative = path.strip_prefix(root).map(normalize).ok();

        self.patterns.iter().any(|re| {
            re.is_match(&full) || relative.as_deref().is_some_and(|r| re.is_match(r))
        })
    }
}

/// Render a path with `/` separators, dropping root and `.` components.
fn normalize(path: &Path) -> String {
    path.components()
        .filter(|c| matches!(c, Component::Normal(_) | Component::ParentDir))
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Translate a glob into an anchored regular expression.
fn glob_to_regex(glob: &str) -> String {
    let mut re = String::from("^");
    let mut chars = glob.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                if chars.peek() == Some(&'/') {
                    chars.next();
                    re.push_str("(?:.*/)?");
                } else {
                    re.push_str(".*");
                }
            }
            '*' => re.push_str("[^/]*"),
            '?' => re.push_str("[^/]"),
            '/' | '\\' => re.push('/'),
            c => re.push_str(&regex::escape(&c.to_string())),
        }
    }

    re.push('$');
    re
}
