//! Alert Record Model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Record type alerts are stored under
pub const ALERT_RECORD_TYPE: &str = "alert";

/// Routing entry binding an alert to an action connector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertAction {
    pub group: String,
    pub id: String,
    pub action_type_id: String,
    pub action_ref: String,
    #[serde(default)]
    pub params: Map<String, Value>,
}

/// Mute posture derived from the stored flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MuteState {
    /// The global flag is set; every notification is suppressed
    Muted,
    /// Only the listed instance ids are suppressed
    PartiallyMuted,
    /// Nothing is suppressed
    Unmuted,
}

/// An alert's attribute document, reduced to the fields the mute-state
/// pipeline reads. Attributes outside this view are tolerated on read and
/// survive partial updates untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub alert_type_id: String,
    pub consumer: String,
    #[serde(default)]
    pub actions: Vec<AlertAction>,
    #[serde(default)]
    pub mute_all: bool,
    #[serde(default)]
    pub muted_instance_ids: Vec<String>,
}

impl Alert {
    /// Current mute posture
    pub fn mute_state(&self) -> MuteState {
        if self.mute_all {
            MuteState::Muted
        } else if self.muted_instance_ids.is_empty() {
            MuteState::Unmuted
        } else {
            MuteState::PartiallyMuted
        }
    }

    /// True when `instance_id` is individually muted
    pub fn is_instance_muted(&self, instance_id: &str) -> bool {
        self.muted_instance_ids.iter().any(|id| id == instance_id)
    }

    /// Distinct action-connector types referenced by this alert, in
    /// first-seen order
    pub fn referenced_action_types(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for action in &self.actions {
            let action_type = action.action_type_id.as_str();
            if !seen.contains(&action_type) {
                seen.push(action_type);
            }
        }
        seen
    }
}
