//! Injected logging capability.
//!
//! The parser and deduplicator never talk to a global logger directly;
//! they receive a [`Logger`]. The default [`TracingLogger`] forwards to the
//! `tracing` facade, so whatever subscriber the application installs sees
//! the events under the `chatpaste` target.
//!
//! ```rust
//! use chatpaste::logging::{Logger, RecordingLogger};
//!
//! let logger = RecordingLogger::new();
//! logger.warn(format_args!("dropped {} reactions", 2));
//! assert!(logger.contains("dropped 2 reactions"));
//! ```

use std::fmt;
use std::sync::Mutex;

use tracing::Level;

/// A leveled log sink. Implementations must never panic.
pub trait Logger {
    fn debug(&self, args: fmt::Arguments<'_>);
    fn info(&self, args: fmt::Arguments<'_>);
    fn warn(&self, args: fmt::Arguments<'_>);
    fn error(&self, args: fmt::Arguments<'_>);
}

impl<T: Logger + ?Sized> Logger for &T {
    fn debug(&self, args: fmt::Arguments<'_>) {
        (**self).debug(args);
    }

    fn info(&self, args: fmt::Arguments<'_>) {
        (**self).info(args);
    }

    fn warn(&self, args: fmt::Arguments<'_>) {
        (**self).warn(args);
    }

    fn error(&self, args: fmt::Arguments<'_>) {
        (**self).error(args);
    }
}

/// Forwards to `tracing`. Debug events are dropped unless `debug` is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger {
    debug: bool,
}

impl TracingLogger {
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }
}

impl Logger for TracingLogger {
    fn debug(&self, args: fmt::Arguments<'_>) {
        if self.debug {
            tracing::debug!(target: "chatpaste", "{}", args);
        }
    }

    fn info(&self, args: fmt::Arguments<'_>) {
        tracing::info!(target: "chatpaste", "{}", args);
    }

    fn warn(&self, args: fmt::Arguments<'_>) {
        tracing::warn!(target: "chatpaste", "{}", args);
    }

    fn error(&self, args: fmt::Arguments<'_>) {
        tracing::error!(target: "chatpaste", "{}", args);
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn debug(&self, _: fmt::Arguments<'_>) {}
    fn info(&self, _: fmt::Arguments<'_>) {}
    fn warn(&self, _: fmt::Arguments<'_>) {}
    fn error(&self, _: fmt::Arguments<'_>) {}
}

/// Keeps every event in memory. Handy in tests.
#[derive(Debug, Default)]
pub struct RecordingLogger {
    entries: Mutex<Vec<(Level, String)>>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of recorded events.
    pub fn entries(&self) -> Vec<(Level, String)> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Returns recorded messages at `level`.
    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    /// Returns `true` if any recorded message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.entries().iter().any(|(_, m)| m.contains(needle))
    }

    fn record(&self, level: Level, args: fmt::Arguments<'_>) {
        // a poisoned lock only means another test thread panicked mid-push
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((level, args.to_string()));
        }
    }
}

impl Logger for RecordingLogger {
    fn debug(&self, args: fmt::Arguments<'_>) {
        self.record(Level::DEBUG, args);
    }

    fn info(&self, args: fmt::Arguments<'_>) {
        self.record(Level::INFO, args);
    }

    fn warn(&self, args: fmt::Arguments<'_>) {
        self.record(Level::WARN, args);
    }

    fn error(&self, args: fmt::Arguments<'_>) {
        self.record(Level::ERROR, args);
    }
}
