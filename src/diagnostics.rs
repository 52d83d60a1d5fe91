//! Diagnostic sink injected into the resolver and the plugin.
//!
//! Everything the language logic reports goes through [`DiagnosticSink`].
//! Production code uses [`TracingSink`]; tests use [`RecordingSink`] to
//! assert on what was reported.

use std::sync::Mutex;
use tracing::{error, info, warn};

/// Fire-and-forget diagnostic channel.
pub trait DiagnosticSink: Send + Sync {
    /// Informational message
    fn log(&self, message: &str);

    /// Degraded but recoverable state
    fn warn(&self, message: &str);

    /// Something was skipped
    fn error(&self, message: &str);
}

/// Sink that forwards to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn log(&self, message: &str) {
        info!(target: "i18n_twee_list", "{}", message);
    }

    fn warn(&self, message: &str) {
        warn!(target: "i18n_twee_list", "{}", message);
    }

    fn error(&self, message: &str) {
        error!(target: "i18n_twee_list", "{}", message);
    }
}

/// Severity of a recorded diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Log,
    Warn,
    Error,
}

/// Sink that keeps every message in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    entries: Mutex<Vec<(Level, String)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded diagnostics, oldest first.
    pub fn entries(&self) -> Vec<(Level, String)> {
        self.lock().clone()
    }

    /// Messages recorded at `level`, oldest first.
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// Number of messages recorded at `level`.
    pub fn count(&self, level: Level) -> usize {
        self.lock().iter().filter(|(l, _)| *l == level).count()
    }

    fn record(&self, level: Level, message: &str) {
        self.lock().push((level, message.to_string()));
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(Level, String)>> {
        // A panicking test thread must not hide the other diagnostics
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DiagnosticSink for RecordingSink {
    fn log(&self, message: &str) {
        self.record(Level::Log, message);
    }

    fn warn(&self, message: &str) {
        self.record(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.record(Level::Error, message);
    }
}
