//! Logging capability injected into the release planner
//!
//! The planner never reaches for a global logger; callers hand it an
//! observer. The binary uses [`TracingObserver`], tests use
//! [`RecordingObserver`] to assert on emitted warnings.

use crate::boundary::BoundaryWarning;
use std::sync::Mutex;

/// Receives warnings and diagnostic notes from the planner
pub trait ReleaseObserver: Send + Sync {
    /// A non-fatal condition the user should know about
    fn warn(&self, warning: &BoundaryWarning);

    /// Low-priority diagnostic detail
    fn note(&self, message: &str);
}

/// Forwards events to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ReleaseObserver for TracingObserver {
    fn warn(&self, warning: &BoundaryWarning) {
        if warning.is_diagnostic() {
            tracing::debug!("{}", warning);
        } else {
            tracing::warn!("{}", warning);
        }
    }

    fn note(&self, message: &str) {
        tracing::debug!("{}", message);
    }
}

/// Collects events in memory
#[derive(Debug, Default)]
pub struct RecordingObserver {
    warnings: Mutex<Vec<BoundaryWarning>>,
    notes: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> Vec<BoundaryWarning> {
        self.warnings
            .lock()
            .map(|w| w.clone())
            .unwrap_or_default()
    }

    pub fn notes(&self) -> Vec<String> {
        self.notes.lock().map(|n| n.clone()).unwrap_or_default()
    }
}

impl ReleaseObserver for RecordingObserver {
    fn warn(&self, warning: &BoundaryWarning) {
        if let Ok(mut warnings) = self.warnings.lock() {
            warnings.push(warning.clone());
        }
    }

    fn note(&self, message: &str) {
        if let Ok(mut notes) = self.notes.lock() {
            notes.push(message.to_string());
        }
    }
}
