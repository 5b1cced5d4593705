//! Authorization Module
//!
//! Policy checks guarding alert mutations:
//! - Per-alert checks against the alert's type and owning consumer
//! - Connector checks for executing referenced action connectors
//!
//! Callers depend on the traits; [`StaticPolicy`] is the grant-table
//! implementation used when no external privilege system is wired in.

mod policy;

pub use policy::{Grant, StaticPolicy};

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mutating operations on an alert's mute state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WriteOperation {
    MuteAll,
    UnmuteAll,
    MuteInstance,
    UnmuteInstance,
}

impl WriteOperation {
    /// Operation name as used in policy grants and denial messages
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteOperation::MuteAll => "muteAll",
            WriteOperation::UnmuteAll => "unmuteAll",
            WriteOperation::MuteInstance => "muteInstance",
            WriteOperation::UnmuteInstance => "unmuteInstance",
        }
    }
}

impl fmt::Display for WriteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operations on action connectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConnectorOperation {
    Execute,
}

impl ConnectorOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectorOperation::Execute => "execute",
        }
    }
}

impl fmt::Display for ConnectorOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authorization error types. Messages surface to callers unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorizationError {
    /// The caller may not perform the operation on this alert type under
    /// this consumer
    #[error("Unauthorized to {operation} a \"{alert_type_id}\" alert for \"{consumer}\"")]
    AlertTypeDenied {
        operation: WriteOperation,
        alert_type_id: String,
        consumer: String,
    },

    /// The caller may not perform the operation on action connectors
    #[error("Unauthorized to {operation} actions")]
    ConnectorDenied { operation: ConnectorOperation },

    /// Denial with a policy-specific reason, passed through verbatim
    #[error("{0}")]
    Denied(String),
}

/// Checks whether the caller may mutate alerts of a given type owned by a
/// given consumer
#[async_trait]
pub trait AlertAuthorizer: Send + Sync {
    async fn ensure_authorized(
        &self,
        alert_type_id: &str,
        consumer: &str,
        operation: WriteOperation,
    ) -> Result<(), AuthorizationError>;
}

/// Checks whether the caller may operate on action connectors
#[async_trait]
pub trait ConnectorAuthorizer: Send + Sync {
    async fn ensure_authorized(
        &self,
        operation: ConnectorOperation,
    ) -> Result<(), AuthorizationError>;
}
