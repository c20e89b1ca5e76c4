//! Diagnostic sinks
//!
//! Substitution reports what it did through a [`DiagnosticSink`] handed in by
//! the caller. Sinks are advisory: nothing they do changes a result.

use parking_lot::Mutex;

/// Severity of a diagnostic line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
}

/// Receiver for leveled diagnostic lines
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, level: Level, message: &str);

    /// Callers skip formatting when this returns false.
    fn enabled(&self, _level: Level) -> bool {
        true
    }
}

/// Discards everything (default)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn emit(&self, _level: Level, _message: &str) {}

    fn enabled(&self, _level: Level) -> bool {
        false
    }
}

/// Forwards to `tracing` under the `docparams` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, level: Level, message: &str) {
        match level {
            Level::Trace => tracing::trace!(target: "docparams", "{}", message),
            Level::Debug => tracing::debug!(target: "docparams", "{}", message),
            Level::Info => tracing::info!(target: "docparams", "{}", message),
            Level::Warn => tracing::warn!(target: "docparams", "{}", message),
        }
    }

    fn enabled(&self, level: Level) -> bool {
        match level {
            Level::Trace => tracing::enabled!(target: "docparams", tracing::Level::TRACE),
            Level::Debug => tracing::enabled!(target: "docparams", tracing::Level::DEBUG),
            Level::Info => tracing::enabled!(target: "docparams", tracing::Level::INFO),
            Level::Warn => tracing::enabled!(target: "docparams", tracing::Level::WARN),
        }
    }
}

/// Keeps every line in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<(Level, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of collected lines
    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines.lock().clone()
    }

    /// Collected messages at `level` or above
    pub fn messages_at_least(&self, level: Level) -> Vec<String> {
        self.lines
            .lock()
            .iter()
            .filter(|(l, _)| *l >= level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, level: Level, message: &str) {
        self.lines.lock().push((level, message.to_string()));
    }
}

/// Emit a formatted line only when the sink wants that level
macro_rules! diag {
    ($sink:expr, $level:expr, $($arg:tt)+) => {{
        let sink: &dyn $crate::diagnostics::DiagnosticSink = $sink;
        if sink.enabled($level) {
            sink.emit($level, &format!($($arg)+));
        }
    }};
}

pub(crate) use diag;
