//! Degradation side channel for the content generator.
//!
//! Falling back to canned sentences is never an error for the caller. It is
//! reported here instead, once per fallback, so operators can see how often
//! learners get generic content.

use std::fmt;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::core::TargetLanguage;

/// Why generation fell back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegradationReason {
    /// No model credential configured.
    MissingCredential,
    /// The model call failed (network, HTTP status, unreadable body).
    Transport,
    /// The model call exceeded the configured timeout.
    Timeout,
    /// The model answered with an empty body.
    EmptyResponse,
    /// The body was not JSON.
    MalformedResponse,
    /// The JSON did not match the sentence schema.
    SchemaMismatch,
}

impl fmt::Display for DegradationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DegradationReason::MissingCredential => "missing_credential",
            DegradationReason::Transport => "transport",
            DegradationReason::Timeout => "timeout",
            DegradationReason::EmptyResponse => "empty_response",
            DegradationReason::MalformedResponse => "malformed_response",
            DegradationReason::SchemaMismatch => "schema_mismatch",
        };
        f.write_str(name)
    }
}

/// A single fallback occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationDegraded {
    /// What went wrong.
    pub reason: DegradationReason,
    /// Human-readable detail (error message, validation failure).
    pub detail: String,
    /// Language the learner asked for.
    pub language: TargetLanguage,
    /// Sentences the caller asked for.
    pub requested: usize,
    /// Sentences actually returned from the fallback set.
    pub returned: usize,
}

/// Receives degradation events.
pub trait DegradationObserver: Send + Sync {
    /// Called exactly once for every fallback.
    fn degraded(&self, event: &GenerationDegraded);
}

impl<T: DegradationObserver + ?Sized> DegradationObserver for Arc<T> {
    fn degraded(&self, event: &GenerationDegraded) {
        (**self).degraded(event)
    }
}

/// Default observer: one structured warning per event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl DegradationObserver for TracingObserver {
    fn degraded(&self, event: &GenerationDegraded) {
        tracing::warn!(
            reason = %event.reason,
            language = %event.language,
            requested = event.requested,
            returned = event.returned,
            detail = %event.detail,
            "practice sentence generation degraded, using fallback sentences"
        );
    }
}

/// In-memory observer that records events, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryObserver {
    events: RwLock<Vec<GenerationDegraded>>,
}

impl MemoryObserver {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events.
    pub fn events(&self) -> Vec<GenerationDegraded> {
        self.events
            .read()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.read().map(|events| events.len()).unwrap_or(0)
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DegradationObserver for MemoryObserver {
    fn degraded(&self, event: &GenerationDegraded) {
        if let Ok(mut events) = self.events.write() {
            events.push(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::capture_logs;
    use tracing::Level;

    fn event(reason: DegradationReason) -> GenerationDegraded {
        GenerationDegraded {
            reason,
            detail: "test".to_string(),
            language: TargetLanguage::English,
            requested: 3,
            returned: 1,
        }
    }

    #[test]
    fn test_memory_observer_records() {
        let observer = MemoryObserver::new();
        assert!(observer.is_empty());

        observer.degraded(&event(DegradationReason::Timeout));
        observer.degraded(&event(DegradationReason::Transport));

        assert_eq!(observer.len(), 2);
        assert_eq!(observer.events()[0].reason, DegradationReason::Timeout);
    }

    #[test]
    fn test_arc_observer_delegates() {
        let observer = Arc::new(MemoryObserver::new());
        let shared: Arc<MemoryObserver> = Arc::clone(&observer);
        shared.degraded(&event(DegradationReason::SchemaMismatch));
        assert_eq!(observer.len(), 1);
    }

    #[test]
    fn test_tracing_observer_emits_one_warning() {
        let logs = capture_logs(Level::TRACE, || {
            TracingObserver.degraded(&event(DegradationReason::MissingCredential))
        });

        let lines: Vec<&str> = logs.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("WARN"));
        assert!(lines[0].contains("reason=missing_credential"));
        assert!(lines[0].contains("requested=3"));
    }

    #[test]
    fn test_reason_serialization() {
        let json = serde_json::to_string(&DegradationReason::MissingCredential).unwrap();
        assert_eq!(json, "\"missing_credential\"");
        assert_eq!(DegradationReason::EmptyResponse.to_string(), "empty_response");
    }
}
