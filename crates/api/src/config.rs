//! Server Configuration

use serde::Deserialize;

use crate::rate_limit::RateLimitConfig;

/// Runtime settings for the alert server
///
/// Values are the defaults below overridden by `ALERT_API_*` environment
/// variables, e.g. `ALERT_API_LISTEN_ADDR=0.0.0.0:9090` or
/// `ALERT_API_RATE_LIMIT__BURST_SIZE=50`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Socket address the server binds to
    pub listen_addr: String,
    /// Maximum log level: trace, debug, info, warn, or error
    pub log_level: String,
    /// Emit logs as JSON instead of human-readable lines
    pub log_json: bool,
    /// Identity recorded as `updatedBy` on mutations
    pub updated_by: String,
    /// Rate limiting for the mutation endpoints
    pub rate_limit: RateLimitConfig,
    /// Seed one sample alert at startup (development convenience)
    pub seed_sample_alert: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            log_level: "info".to_string(),
            log_json: false,
            updated_by: "system".to_string(),
            rate_limit: RateLimitConfig::default(),
            seed_sample_alert: false,
        }
    }
}

impl ApiConfig {
    /// Load defaults merged with `ALERT_API_*` environment overrides
    pub fn load() -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("ALERT_API")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}
