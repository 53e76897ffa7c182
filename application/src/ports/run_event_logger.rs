//! Port for structured run-event logging.
//!
//! Defines the [`RunEventLogger`] trait for recording the decisions and
//! transitions of a run (resolved tag, selected strategy, state changes,
//! summary) to a structured log that CI can archive.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the run in a
//! machine-readable format (JSONL).

use serde_json::Value;

/// A structured run event for logging.
pub struct RunEvent {
    /// Event type identifier (e.g., "state_change", "tag_resolved").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl RunEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging run events.
///
/// `log` is synchronous and infallible; logging failures never affect the
/// outcome of a run.
pub trait RunEventLogger: Send + Sync {
    fn log(&self, event: RunEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoRunEventLogger;

impl RunEventLogger for NoRunEventLogger {
    fn log(&self, _event: RunEvent) {}
}
