//! Caller Context Providers

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Source of the current wall-clock time, injected so state transitions
/// are reproducible under test
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// System time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the instant it was built with
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Resolves the identity recorded as `updatedBy` on writes
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The caller's user name, or `None` when the host runs without a
    /// security layer
    async fn user_name(&self) -> Option<String>;
}

/// Fixed identity, typically the service account of the host layer
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    name: Option<String>,
}

impl StaticIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    /// Identity that resolves to no user
    pub fn anonymous() -> Self {
        Self { name: None }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn user_name(&self) -> Option<String> {
        self.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_is_stable() {
        let instant = "2019-02-12T21:01:22.479Z".parse::<DateTime<Utc>>().unwrap();
        let clock = FixedClock(instant);

        assert_eq!(clock.now(), instant);
        assert_eq!(clock.now(), clock.now());
    }

    #[tokio::test]
    async fn test_static_identity() {
        assert_eq!(
            StaticIdentity::new("elastic").user_name().await.as_deref(),
            Some("elastic")
        );
        assert_eq!(StaticIdentity::anonymous().user_name().await, None);
    }
}
