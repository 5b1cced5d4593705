//! Grant-Table Policy

use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    AlertAuthorizer, AuthorizationError, ConnectorAuthorizer, ConnectorOperation, WriteOperation,
};

/// A single grant: the operation is allowed on alerts matching the type
/// and consumer patterns. `"*"` matches any value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    pub alert_type_id: String,
    pub consumer: String,
    pub operation: WriteOperation,
}

impl Grant {
    fn covers(&self, alert_type_id: &str, consumer: &str, operation: WriteOperation) -> bool {
        self.operation == operation
            && pattern_matches(&self.alert_type_id, alert_type_id)
            && pattern_matches(&self.consumer, consumer)
    }
}

fn pattern_matches(pattern: &str, value: &str) -> bool {
    pattern == "*" || pattern == value
}

/// Grant-table authorizer
///
/// Holds explicit grants plus a switch per connector operation. Suitable
/// for wiring the service without an external privilege system; richer
/// deployments implement the authorizer traits against their own policy
/// engine.
#[derive(Debug, Clone, Default)]
pub struct StaticPolicy {
    grants: Vec<Grant>,
    connector_operations: HashSet<ConnectorOperation>,
}

impl StaticPolicy {
    /// Create a policy that denies everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a policy that permits every operation, for single-tenant
    /// deployments and tests
    pub fn permit_all() -> Self {
        let mut policy = Self::new();
        for operation in [
            WriteOperation::MuteAll,
            WriteOperation::UnmuteAll,
            WriteOperation::MuteInstance,
            WriteOperation::UnmuteInstance,
        ] {
            policy = policy.allow("*", "*", operation);
        }
        policy.allow_connector(ConnectorOperation::Execute)
    }

    /// Add a grant. `"*"` wildcards match any alert type or consumer.
    pub fn allow(mut self, alert_type_id: &str, consumer: &str, operation: WriteOperation) -> Self {
        self.grants.push(Grant {
            alert_type_id: alert_type_id.to_string(),
            consumer: consumer.to_string(),
            operation,
        });
        self
    }

    /// Permit a connector operation
    pub fn allow_connector(mut self, operation: ConnectorOperation) -> Self {
        self.connector_operations.insert(operation);
        self
    }

    /// Configured grants
    pub fn grants(&self) -> &[Grant] {
        &self.grants
    }
}

#[async_trait]
impl AlertAuthorizer for StaticPolicy {
    async fn ensure_authorized(
        &self,
        alert_type_id: &str,
        consumer: &str,
        operation: WriteOperation,
    ) -> Result<(), AuthorizationError> {
        if self
            .grants
            .iter()
            .any(|grant| grant.covers(alert_type_id, consumer, operation))
        {
            return Ok(());
        }

        debug!(
            "Denying {} on \"{}\" alerts for \"{}\"",
            operation, alert_type_id, consumer
        );
        Err(AuthorizationError::AlertTypeDenied {
            operation,
            alert_type_id: alert_type_id.to_string(),
            consumer: consumer.to_string(),
        })
    }
}

#[async_trait]
impl ConnectorAuthorizer for StaticPolicy {
    async fn ensure_authorized(
        &self,
        operation: ConnectorOperation,
    ) -> Result<(), AuthorizationError> {
        if self.connector_operations.contains(&operation) {
            return Ok(());
        }

        debug!("Denying {} on action connectors", operation);
        Err(AuthorizationError::ConnectorDenied { operation })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_exact_grant_allows() {
        let policy = StaticPolicy::new().allow("myType", "myApp", WriteOperation::UnmuteAll);

        AlertAuthorizer::ensure_authorized(&policy, "myType", "myApp", WriteOperation::UnmuteAll)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_grant_is_operation_specific() {
        let policy = StaticPolicy::new().allow("myType", "myApp", WriteOperation::UnmuteAll);

        let err =
            AlertAuthorizer::ensure_authorized(&policy, "myType", "myApp", WriteOperation::MuteAll)
                .await
                .unwrap_err();
        assert!(matches!(err, AuthorizationError::AlertTypeDenied { .. }));
    }

    #[tokio::test]
    async fn test_wildcard_grant() {
        let policy = StaticPolicy::new().allow("*", "*", WriteOperation::MuteInstance);

        AlertAuthorizer::ensure_authorized(
            &policy,
            "anyType",
            "anyApp",
            WriteOperation::MuteInstance,
        )
        .await
        .unwrap();
    }

    #[test]
    fn test_allow_records_grants_in_order() {
        let policy = StaticPolicy::new()
            .allow("myType", "myApp", WriteOperation::UnmuteAll)
            .allow("*", "*", WriteOperation::MuteAll);

        assert_eq!(
            policy.grants(),
            [
                Grant {
                    alert_type_id: "myType".to_string(),
                    consumer: "myApp".to_string(),
                    operation: WriteOperation::UnmuteAll,
                },
                Grant {
                    alert_type_id: "*".to_string(),
                    consumer: "*".to_string(),
                    operation: WriteOperation::MuteAll,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_denial_message_names_operation_type_and_consumer() {
        let policy = StaticPolicy::new();

        let err =
            AlertAuthorizer::ensure_authorized(&policy, "myType", "myApp", WriteOperation::UnmuteAll)
                .await
                .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unauthorized to unmuteAll a \"myType\" alert for \"myApp\""
        );
    }

    #[tokio::test]
    async fn test_connector_denied_by_default() {
        let policy = StaticPolicy::new();

        let err = ConnectorAuthorizer::ensure_authorized(&policy, ConnectorOperation::Execute)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Unauthorized to execute actions");
    }

    #[tokio::test]
    async fn test_permit_all_covers_every_operation() {
        let policy = StaticPolicy::permit_all();

        for operation in [
            WriteOperation::MuteAll,
            WriteOperation::UnmuteAll,
            WriteOperation::MuteInstance,
            WriteOperation::UnmuteInstance,
        ] {
            AlertAuthorizer::ensure_authorized(&policy, "t", "c", operation)
                .await
                .unwrap();
        }
        ConnectorAuthorizer::ensure_authorized(&policy, ConnectorOperation::Execute)
            .await
            .unwrap();
    }
}
