//! Build progress log.

use std::sync::Mutex;

/// Sink for the line-oriented build report.
pub trait BuildLog: Send + Sync {
    /// Record one line of progress.
    fn info(&self, line: &str);

    /// Record a problem that does not fail the build.
    fn warn(&self, line: &str);
}

/// Forwards build lines to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLog;

impl BuildLog for TracingLog {
    fn info(&self, line: &str) {
        tracing::info!("{}", line);
    }

    fn warn(&self, line: &str) {
        tracing::warn!("{}", line);
    }
}

/// Keeps build lines in memory.
#[derive(Debug, Default)]
pub struct MemoryLog {
    lines: Mutex<Vec<String>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines recorded so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Whether any recorded line equals `line` once trimmed.
    pub fn contains(&self, line: &str) -> bool {
        self.lines().iter().any(|l| l.trim() == line)
    }
}

impl BuildLog for MemoryLog {
    fn info(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(line.to_string());
    }

    fn warn(&self, line: &str) {
        self.info(&format!("WARN: {}", line));
    }
}
