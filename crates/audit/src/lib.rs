//! Audit Logging
//!
//! Structured audit events describing who did what to which record:
//! - Pending mutations are recorded with outcome `unknown` before the
//!   underlying write confirms
//! - Denials are recorded with outcome `failure` and the error attached
//!
//! Emission is fire-and-forget; an audit sink never fails the operation
//! being audited.

mod event;
mod logger;

pub use event::{AuditAction, AuditEvent, AuditOutcome, ErrorInfo, SubjectRef};
pub use logger::{AuditLogger, MemoryAuditLog, TracingAuditLogger};
