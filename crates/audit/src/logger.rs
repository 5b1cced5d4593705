//! Audit Logger Implementations

use std::sync::Mutex;

use tracing::info;

use crate::AuditEvent;

/// Sink for audit events
///
/// Implementations must not fail the operation being audited; delivery
/// problems are theirs to swallow or report out of band.
pub trait AuditLogger: Send + Sync {
    /// Record a single event
    fn log(&self, event: AuditEvent);
}

/// Emits audit events as structured tracing records under the `audit`
/// target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditLogger;

impl TracingAuditLogger {
    pub fn new() -> Self {
        Self
    }
}

impl AuditLogger for TracingAuditLogger {
    fn log(&self, event: AuditEvent) {
        info!(
            target: "audit",
            action = event.action.as_str(),
            outcome = event.outcome.as_str(),
            record_type = %event.subject.record_type,
            record_id = %event.subject.id,
            error_code = event.error.as_ref().map(|e| e.code.as_str()),
            error_message = event.error.as_ref().map(|e| e.message.as_str()),
            "audit event"
        );
    }
}

/// Buffers events in memory; the audit sink for tests and a building
/// block for batching shippers
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    events: Mutex<Vec<AuditEvent>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Number of recorded events
    pub fn len(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all events (for testing)
    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

impl AuditLogger for MemoryAuditLog {
    fn log(&self, event: AuditEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AuditAction, AuditOutcome, SubjectRef};

    #[test]
    fn test_memory_log_records_in_order() {
        let log = MemoryAuditLog::new();

        log.log(AuditEvent::new(
            AuditAction::AlertMute,
            SubjectRef::new("alert", "1"),
        ));
        log.log(
            AuditEvent::new(AuditAction::AlertUnmute, SubjectRef::new("alert", "2"))
                .with_outcome(AuditOutcome::Failure),
        );

        let events = log.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].action, AuditAction::AlertMute);
        assert_eq!(events[1].action, AuditAction::AlertUnmute);
        assert_eq!(events[1].outcome, AuditOutcome::Failure);
    }

    #[test]
    fn test_memory_log_clear() {
        let log = MemoryAuditLog::new();
        log.log(AuditEvent::new(
            AuditAction::AlertMute,
            SubjectRef::new("alert", "1"),
        ));
        assert_eq!(log.len(), 1);

        log.clear();
        assert!(log.is_empty());
    }
}
