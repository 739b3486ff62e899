//! Diagnostic lines returned alongside every outcome

use tracing::debug;

/// Ordered diagnostic log of one invocation.
///
/// Lines are kept for the returned record and mirrored to `tracing`.
#[derive(Debug, Default, Clone)]
pub struct DebugLog {
    lines: Vec<String>,
}

impl DebugLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        let line = line.into();
        debug!("{}", line);
        self.lines.push(line);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}
