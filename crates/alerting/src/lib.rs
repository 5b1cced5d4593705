//! Alert Mute-State Management
//!
//! Flips an alert's mute flags through a guarded pipeline: load the
//! record, authorize the caller against the alert's type and owning
//! consumer plus its referenced action connectors, record an audit event,
//! then persist under the version token captured at load time. A denial
//! is audited and re-raised unmodified; a concurrent modification fails
//! the write instead of overwriting it.

mod alert;
mod context;
mod manager;

pub use alert::{Alert, AlertAction, MuteState, ALERT_RECORD_TYPE};
pub use context::{Clock, FixedClock, IdentityProvider, StaticIdentity, SystemClock};
pub use manager::{MuteStateManager, MuteStateManagerOptions};

use authorization::AuthorizationError;
use storage::StoreError;
use thiserror::Error;

/// Mute-state operation errors. Nothing is swallowed or downgraded; the
/// caller sees the underlying failure.
#[derive(Debug, Error)]
pub enum Error {
    /// Record missing, version conflict, or other store failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Policy denial; the authorization message is preserved verbatim
    #[error(transparent)]
    Unauthorized(#[from] AuthorizationError),

    /// The stored attribute document does not deserialize as an alert
    #[error("alert \"{id}\" holds a malformed attribute document: {source}")]
    InvalidRecord {
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// True when the alert record does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Store(StoreError::NotFound { .. }))
    }

    /// True when the conditional write lost to a concurrent modification
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Store(StoreError::Conflict { .. }))
    }

    /// True when the caller was denied by policy
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Unauthorized(_))
    }

    /// Stable identifier recorded as the audit error code
    pub fn code(&self) -> &'static str {
        match self {
            Error::Store(StoreError::NotFound { .. }) => "NotFoundError",
            Error::Store(StoreError::Conflict { .. }) => "ConflictError",
            Error::Store(_) => "StoreError",
            Error::Unauthorized(_) => "UnauthorizedError",
            Error::InvalidRecord { .. } => "InvalidRecordError",
        }
    }
}
