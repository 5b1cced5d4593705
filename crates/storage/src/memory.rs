//! In-Memory Record Store

use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use crate::record::{Record, Reference};
use crate::{RecordStore, StoreError, UpdateOptions};

#[derive(Debug, Clone)]
struct Entry {
    attributes: Map<String, Value>,
    references: Vec<Reference>,
    version: String,
}

/// In-memory implementation of [`RecordStore`]
///
/// Backs tests and single-process deployments. Durable stores live in the
/// host platform and implement the same trait.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    entries: RwLock<HashMap<(String, String), Entry>>,
}

impl MemoryRecordStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record under a fresh version token
    pub fn insert(
        &self,
        record_type: &str,
        id: &str,
        attributes: Map<String, Value>,
        references: Vec<Reference>,
    ) -> Result<String, StoreError> {
        self.insert_with_version(record_type, id, attributes, references, new_version())
    }

    /// Insert with an explicit version token, for fixtures that assert on
    /// the token value
    pub fn insert_with_version(
        &self,
        record_type: &str,
        id: &str,
        attributes: Map<String, Value>,
        references: Vec<Reference>,
        version: impl Into<String>,
    ) -> Result<String, StoreError> {
        let version = version.into();
        let mut entries = self.entries.write().map_err(lock_error)?;
        entries.insert(
            (record_type.to_string(), id.to_string()),
            Entry {
                attributes,
                references,
                version: version.clone(),
            },
        );
        Ok(version)
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all records (for testing)
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }
}

fn lock_error<T>(err: std::sync::PoisonError<T>) -> StoreError {
    StoreError::Backend(format!("lock error: {}", err))
}

fn new_version() -> String {
    Uuid::new_v4().simple().to_string()
}

#[async_trait::async_trait]
impl RecordStore for MemoryRecordStore {
    async fn get(&self, record_type: &str, id: &str) -> Result<Record, StoreError> {
        let entries = self.entries.read().map_err(lock_error)?;
        let entry = entries
            .get(&(record_type.to_string(), id.to_string()))
            .ok_or_else(|| StoreError::NotFound {
                record_type: record_type.to_string(),
                id: id.to_string(),
            })?;

        Ok(Record {
            id: id.to_string(),
            record_type: record_type.to_string(),
            attributes: entry.attributes.clone(),
            references: entry.references.clone(),
            version: entry.version.clone(),
        })
    }

    async fn update(
        &self,
        record_type: &str,
        id: &str,
        patch: Map<String, Value>,
        options: UpdateOptions,
    ) -> Result<Record, StoreError> {
        let mut entries = self.entries.write().map_err(lock_error)?;
        let key = (record_type.to_string(), id.to_string());
        let entry = entries.get_mut(&key).ok_or_else(|| StoreError::NotFound {
            record_type: record_type.to_string(),
            id: id.to_string(),
        })?;

        if let Some(expected) = options.version {
            if expected != entry.version {
                return Err(StoreError::Conflict {
                    record_type: record_type.to_string(),
                    id: id.to_string(),
                    expected,
                    current: entry.version.clone(),
                });
            }
        }

        // Shallow merge: patched keys replace, everything else survives
        for (key, value) in patch {
            entry.attributes.insert(key, value);
        }
        entry.version = new_version();
        debug!("Updated {}/{} to version {}", record_type, id, entry.version);

        Ok(Record {
            id: id.to_string(),
            record_type: record_type.to_string(),
            attributes: entry.attributes.clone(),
            references: entry.references.clone(),
            version: entry.version.clone(),
        })
    }
}
