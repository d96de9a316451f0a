//! Diagnostic channel for suppressed highlight failures and resolved
//! locators.
//!
//! Purely observational: nothing written here ever affects control flow.
//! The default sink forwards to `tracing`; [`MemorySink`] records messages
//! for tests that need to assert a failure was reported rather than lost.

use std::sync::{Arc, Mutex};

/// Observational sink for debug messages
pub trait DiagnosticSink: Send + Sync {
    /// Record a debug message
    fn debug(&self, message: &str);
}

/// Default sink: forwards to `tracing::debug!` under the `resaltar` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn debug(&self, message: &str) {
        tracing::debug!(target: "resaltar", "{message}");
    }
}

/// In-memory sink for tests
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    messages: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    /// Create an empty sink
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages recorded so far
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().expect("sink poisoned").clone()
    }

    /// Check whether any recorded message contains `needle`
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.messages().iter().any(|m| m.contains(needle))
    }
}

impl DiagnosticSink for MemorySink {
    fn debug(&self, message: &str) {
        self.messages
            .lock()
            .expect("sink poisoned")
            .push(message.to_string());
    }
}

/// Install a `tracing_subscriber` fmt subscriber honoring `RUST_LOG`.
///
/// For examples and embedders without their own subscriber; library code
/// only ever emits events.
pub fn init() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("resaltar=debug")
        }))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_records_messages() {
        let sink = MemorySink::new();
        sink.debug("[CSS] .submit-btn");
        sink.debug("highlight failed: no element");

        assert_eq!(sink.messages().len(), 2);
        assert!(sink.contains(".submit-btn"));
        assert!(sink.contains("highlight failed"));
        assert!(!sink.contains("never logged"));
    }

    #[test]
    fn test_tracing_sink_is_silent_without_subscriber() {
        // Must not panic when no subscriber is installed
        TracingSink.debug("message into the void");
    }

    #[test]
    fn test_init_is_idempotent() {
        init();
        init();
    }
}
