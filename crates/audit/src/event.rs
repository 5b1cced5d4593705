//! Audit Event Model

use std::fmt;

use serde::{Deserialize, Serialize};

/// Recorded action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    AlertMute,
    AlertUnmute,
    AlertInstanceMute,
    AlertInstanceUnmute,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::AlertMute => "alert_mute",
            AuditAction::AlertUnmute => "alert_unmute",
            AuditAction::AlertInstanceMute => "alert_instance_mute",
            AuditAction::AlertInstanceUnmute => "alert_instance_unmute",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event outcome. `Unknown` marks events recorded before the result of
/// the underlying write is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    Success,
    Failure,
    Unknown,
}

impl AuditOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditOutcome::Success => "success",
            AuditOutcome::Failure => "failure",
            AuditOutcome::Unknown => "unknown",
        }
    }
}

impl fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The record an event is about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectRef {
    #[serde(rename = "type")]
    pub record_type: String,
    pub id: String,
}

impl SubjectRef {
    pub fn new(record_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            record_type: record_type.into(),
            id: id.into(),
        }
    }
}

/// Failure details carried on denial events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: String,
    pub message: String,
}

/// A single audit record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub action: AuditAction,
    pub outcome: AuditOutcome,
    pub subject: SubjectRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl AuditEvent {
    /// Event for `action` against `subject`, outcome `Unknown` until set
    pub fn new(action: AuditAction, subject: SubjectRef) -> Self {
        Self {
            action,
            outcome: AuditOutcome::Unknown,
            subject,
            error: None,
        }
    }

    /// Override the outcome
    pub fn with_outcome(mut self, outcome: AuditOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    /// Attach failure details; the outcome becomes `Failure` (call
    /// [`AuditEvent::with_outcome`] afterwards to override)
    pub fn with_error(mut self, code: impl Into<String>, message: impl Into<String>) -> Self {
        self.error = Some(ErrorInfo {
            code: code.into(),
            message: message.into(),
        });
        self.outcome = AuditOutcome::Failure;
        self
    }
}
