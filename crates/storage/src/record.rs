//! Record Representation

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reference from a record to another record, kept outside the attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub id: String,
}

/// A stored record: attribute document plus the version token captured at
/// read time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub attributes: Map<String, Value>,
    #[serde(default)]
    pub references: Vec<Reference>,
    /// Opaque concurrency token; pass back on conditional writes
    pub version: String,
}
