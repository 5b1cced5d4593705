//! Rate Limiting Middleware using GCRA Algorithm
//!
//! Limits the mutation endpoints by peer IP using tower_governor. The
//! Generic Cell Rate Algorithm enforces rates without background sweeps.

use std::sync::Arc;

use governor::middleware::StateInformationMiddleware;
use serde::Deserialize;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;

/// Governor config keyed by peer IP
/// StateInformationMiddleware is what use_headers() installs to add X-RateLimit-* headers
pub type MutationGovernorConfig =
    tower_governor::governor::GovernorConfig<PeerIpKeyExtractor, StateInformationMiddleware>;

/// Layer applied to the mutation routes
pub type MutationRateLimitLayer = GovernorLayer<PeerIpKeyExtractor, StateInformationMiddleware>;

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Apply rate limiting to the mutation endpoints
    pub enabled: bool,
    /// Seconds per replenished request (replenishment interval)
    pub per_second: u64,
    /// Requests that may be made immediately before throttling
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            per_second: 1,
            burst_size: 20,
        }
    }
}

impl RateLimitConfig {
    /// Build the governor layer for these settings
    ///
    /// Returns `None` when the settings are out of range (zero interval
    /// or burst). Requires the service to be started with
    /// `into_make_service_with_connect_info::<SocketAddr>()` so the peer
    /// IP is extractable. Adds X-RateLimit-* headers to responses.
    pub fn layer(&self) -> Option<MutationRateLimitLayer> {
        let config: MutationGovernorConfig = GovernorConfigBuilder::default()
            .per_second(self.per_second)
            .burst_size(self.burst_size)
            .use_headers()
            .finish()?;
        Some(GovernorLayer {
            config: Arc::new(config),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RateLimitConfig::default();

        assert!(config.enabled);
        assert_eq!(config.per_second, 1);
        assert_eq!(config.burst_size, 20);
    }

    #[test]
    fn test_layer_from_valid_settings() {
        let config = RateLimitConfig::default();

        assert!(config.layer().is_some());
    }

    #[test]
    fn test_zero_burst_is_rejected() {
        let config = RateLimitConfig {
            enabled: true,
            per_second: 1,
            burst_size: 0,
        };

        assert!(config.layer().is_none());
    }
}
