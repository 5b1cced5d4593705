//! Mute-State Manager Implementation

use std::sync::Arc;

use audit::{AuditAction, AuditEvent, AuditLogger, SubjectRef};
use authorization::{AlertAuthorizer, ConnectorAuthorizer, ConnectorOperation, WriteOperation};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use storage::{Record, RecordStore, UpdateOptions};
use tracing::debug;

use crate::alert::{Alert, ALERT_RECORD_TYPE};
use crate::context::{Clock, IdentityProvider};
use crate::Error;

/// Collaborators wired into a [`MuteStateManager`]
pub struct MuteStateManagerOptions {
    pub store: Arc<dyn RecordStore>,
    pub alert_authorizer: Arc<dyn AlertAuthorizer>,
    pub connector_authorizer: Arc<dyn ConnectorAuthorizer>,
    /// Absent means audit emission is a no-op
    pub audit: Option<Arc<dyn AuditLogger>>,
    pub clock: Arc<dyn Clock>,
    pub identity: Arc<dyn IdentityProvider>,
}

/// Alert record loaded together with its concurrency token
struct LoadedAlert {
    id: String,
    version: String,
    alert: Alert,
}

/// Flips alert mute flags under authorization, audit logging, and
/// optimistic concurrency
///
/// Every operation follows the same pipeline: load the record capturing
/// its version token, run the policy checks, record the audit event, then
/// write conditionally on the captured token. The manager holds no
/// mutable state of its own.
pub struct MuteStateManager {
    store: Arc<dyn RecordStore>,
    alert_authorizer: Arc<dyn AlertAuthorizer>,
    connector_authorizer: Arc<dyn ConnectorAuthorizer>,
    audit: Option<Arc<dyn AuditLogger>>,
    clock: Arc<dyn Clock>,
    identity: Arc<dyn IdentityProvider>,
}

impl MuteStateManager {
    /// Create a new manager from its collaborators
    pub fn new(options: MuteStateManagerOptions) -> Self {
        Self {
            store: options.store,
            alert_authorizer: options.alert_authorizer,
            connector_authorizer: options.connector_authorizer,
            audit: options.audit,
            clock: options.clock,
            identity: options.identity,
        }
    }

    /// Suppress every notification for the alert. Clears the individually
    /// muted instances as well; always writes, even when already muted.
    pub async fn mute_all(&self, id: &str) -> Result<(), Error> {
        let loaded = self.load(id).await?;
        self.authorize_and_audit(&loaded, WriteOperation::MuteAll, AuditAction::AlertMute)
            .await?;

        let patch = mute_all_patch(true, self.clock.now(), self.updated_by().await);
        self.write(&loaded, patch).await?;
        debug!("Alert \"{}\" muted", id);
        Ok(())
    }

    /// Restore notifications for the alert, clearing the global flag and
    /// every individually muted instance. Always writes, even when
    /// already unmuted.
    pub async fn unmute_all(&self, id: &str) -> Result<(), Error> {
        let loaded = self.load(id).await?;
        self.authorize_and_audit(&loaded, WriteOperation::UnmuteAll, AuditAction::AlertUnmute)
            .await?;

        let patch = mute_all_patch(false, self.clock.now(), self.updated_by().await);
        self.write(&loaded, patch).await?;
        debug!("Alert \"{}\" unmuted", id);
        Ok(())
    }

    /// Suppress notifications for a single instance. The audit event is
    /// recorded unconditionally; the write is skipped when the instance
    /// is already covered by the global flag or the muted list.
    pub async fn mute_instance(&self, id: &str, instance_id: &str) -> Result<(), Error> {
        let loaded = self.load(id).await?;
        self.authorize_and_audit(
            &loaded,
            WriteOperation::MuteInstance,
            AuditAction::AlertInstanceMute,
        )
        .await?;

        if loaded.alert.mute_all || loaded.alert.is_instance_muted(instance_id) {
            debug!("Instance \"{}\" of alert \"{}\" already muted", instance_id, id);
            return Ok(());
        }

        let mut muted_instance_ids = loaded.alert.muted_instance_ids.clone();
        muted_instance_ids.push(instance_id.to_string());
        let patch = instance_patch(muted_instance_ids, self.clock.now(), self.updated_by().await);
        self.write(&loaded, patch).await
    }

    /// Restore notifications for a single instance. The audit event is
    /// recorded unconditionally; the write is skipped when the alert is
    /// globally muted or the instance is not in the muted list.
    pub async fn unmute_instance(&self, id: &str, instance_id: &str) -> Result<(), Error> {
        let loaded = self.load(id).await?;
        self.authorize_and_audit(
            &loaded,
            WriteOperation::UnmuteInstance,
            AuditAction::AlertInstanceUnmute,
        )
        .await?;

        if loaded.alert.mute_all || !loaded.alert.is_instance_muted(instance_id) {
            debug!("Instance \"{}\" of alert \"{}\" not individually muted", instance_id, id);
            return Ok(());
        }

        let muted_instance_ids: Vec<String> = loaded
            .alert
            .muted_instance_ids
            .iter()
            .filter(|muted| *muted != instance_id)
            .cloned()
            .collect();
        let patch = instance_patch(muted_instance_ids, self.clock.now(), self.updated_by().await);
        self.write(&loaded, patch).await
    }

    /// Load the alert and capture its version token
    async fn load(&self, id: &str) -> Result<LoadedAlert, Error> {
        let record = self.store.get(ALERT_RECORD_TYPE, id).await?;
        let Record {
            attributes, version, ..
        } = record;
        let alert =
            serde_json::from_value(Value::Object(attributes)).map_err(|source| {
                Error::InvalidRecord {
                    id: id.to_string(),
                    source,
                }
            })?;
        Ok(LoadedAlert {
            id: id.to_string(),
            version,
            alert,
        })
    }

    /// Run both policy checks. A denial is audited with the error
    /// attached and re-raised; on success the pending mutation is audited
    /// with outcome `unknown` before any write happens.
    async fn authorize_and_audit(
        &self,
        loaded: &LoadedAlert,
        operation: WriteOperation,
        action: AuditAction,
    ) -> Result<(), Error> {
        let subject = SubjectRef::new(ALERT_RECORD_TYPE, &loaded.id);

        if let Err(denied) = self.authorize(&loaded.alert, operation).await {
            let err = Error::from(denied);
            self.emit_audit(
                AuditEvent::new(action, subject).with_error(err.code(), err.to_string()),
            );
            return Err(err);
        }

        self.emit_audit(AuditEvent::new(action, subject));
        Ok(())
    }

    async fn authorize(
        &self,
        alert: &Alert,
        operation: WriteOperation,
    ) -> Result<(), authorization::AuthorizationError> {
        self.alert_authorizer
            .ensure_authorized(&alert.alert_type_id, &alert.consumer, operation)
            .await?;

        for action_type_id in alert.referenced_action_types() {
            debug!("Checking connector execution for \"{}\"", action_type_id);
            self.connector_authorizer
                .ensure_authorized(ConnectorOperation::Execute)
                .await?;
        }
        Ok(())
    }

    /// Persist the patch conditionally on the version captured at load
    async fn write(&self, loaded: &LoadedAlert, patch: Map<String, Value>) -> Result<(), Error> {
        self.store
            .update(
                ALERT_RECORD_TYPE,
                &loaded.id,
                patch,
                UpdateOptions {
                    version: Some(loaded.version.clone()),
                },
            )
            .await?;
        Ok(())
    }

    async fn updated_by(&self) -> Option<String> {
        self.identity.user_name().await
    }

    fn emit_audit(&self, event: AuditEvent) {
        if let Some(audit) = &self.audit {
            audit.log(event);
        }
    }
}

/// Write payload for the global mute flag: the flag itself, a cleared
/// instance list, and the update stamps
fn mute_all_patch(
    mute_all: bool,
    updated_at: DateTime<Utc>,
    updated_by: Option<String>,
) -> Map<String, Value> {
    let mut patch = instance_patch(Vec::new(), updated_at, updated_by);
    patch.insert("muteAll".to_string(), Value::Bool(mute_all));
    patch
}

/// Write payload replacing the individually muted instance list
fn instance_patch(
    muted_instance_ids: Vec<String>,
    updated_at: DateTime<Utc>,
    updated_by: Option<String>,
) -> Map<String, Value> {
    let mut patch = Map::new();
    patch.insert(
        "mutedInstanceIds".to_string(),
        Value::Array(muted_instance_ids.into_iter().map(Value::String).collect()),
    );
    patch.insert(
        "updatedAt".to_string(),
        Value::String(updated_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
    );
    patch.insert(
        "updatedBy".to_string(),
        updated_by.map_or(Value::Null, Value::String),
    );
    patch
}
