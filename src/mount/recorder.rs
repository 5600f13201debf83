//! Append-only execution trace.

use tracing::debug;

/// Ordered list of free-text messages describing what an operation did.
///
/// A disabled recorder accepts calls and drops the messages.
#[derive(Debug, Clone)]
pub struct Recorder {
    enabled: bool,
    entries: Vec<String>,
}

impl Recorder {
    pub fn create() -> Self {
        Self { enabled: true, entries: Vec::new() }
    }

    pub fn disabled() -> Self {
        Self { enabled: false, entries: Vec::new() }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn record(&mut self, message: impl Into<String>) {
        if !self.enabled {
            return;
        }
        let message = message.into();
        debug!(%message, "recorded");
        self.entries.push(message);
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Recorder {
    fn default() -> Self {
        Self::create()
    }
}
