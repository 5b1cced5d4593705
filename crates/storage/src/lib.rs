//! Record Store
//!
//! Versioned access to JSON attribute documents keyed by `(type, id)`.
//! Every read returns an opaque version token; conditional writes pass the
//! token back so a concurrent modification is rejected instead of silently
//! overwritten.

mod memory;
mod record;

pub use memory::MemoryRecordStore;
pub use record::{Record, Reference};

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record stored under the given type and id
    #[error("record \"{record_type}/{id}\" not found")]
    NotFound { record_type: String, id: String },
    /// The supplied version token no longer matches the stored one
    #[error("version conflict on \"{record_type}/{id}\": expected {expected}, stored {current}")]
    Conflict {
        record_type: String,
        id: String,
        expected: String,
        current: String,
    },
    /// Backend failure
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Options for conditional updates
#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
    /// Version token captured when the record was read. When set, the
    /// write fails with [`StoreError::Conflict`] if the stored token
    /// differs.
    pub version: Option<String>,
}

/// Access to versioned records
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Load a record by type and id
    async fn get(&self, record_type: &str, id: &str) -> Result<Record, StoreError>;

    /// Apply a partial attribute update. Keys present in `patch` replace
    /// the stored values; all other attributes are left untouched.
    async fn update(
        &self,
        record_type: &str,
        id: &str,
        patch: Map<String, Value>,
        options: UpdateOptions,
    ) -> Result<Record, StoreError>;
}
