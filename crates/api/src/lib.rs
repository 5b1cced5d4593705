//! Alert Mute-State API Server
//!
//! REST host layer wiring the mute-state manager to HTTP: route handlers,
//! configuration, logging, metrics, and rate limiting.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod config;
mod rate_limit;
mod routes;

pub use config::ApiConfig;
pub use rate_limit::{MutationRateLimitLayer, RateLimitConfig};

use alerting::{
    MuteStateManager, MuteStateManagerOptions, StaticIdentity, SystemClock, ALERT_RECORD_TYPE,
};
use anyhow::Context;
use audit::TracingAuditLogger;
use authorization::StaticPolicy;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use storage::MemoryRecordStore;

/// Application state shared across handlers
pub struct AppState {
    /// Manager all mutation routes call into
    pub manager: MuteStateManager,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
    /// Prometheus render handle, when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new application state around a manager
    pub fn new(manager: MuteStateManager) -> Self {
        Self {
            manager,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
            metrics: None,
        }
    }

    /// Attach a Prometheus render handle
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
}

/// Create the application router
///
/// The rate limit layer, when given, wraps only the mutation routes;
/// health and metrics stay unthrottled.
pub fn create_router(state: Arc<AppState>, rate_limit: Option<MutationRateLimitLayer>) -> Router {
    let mut mutations = Router::new()
        .route("/api/v1/alerts/:id/_mute_all", post(routes::alerts::mute_all))
        .route(
            "/api/v1/alerts/:id/_unmute_all",
            post(routes::alerts::unmute_all),
        )
        .route(
            "/api/v1/alerts/:id/instances/:instance_id/_mute",
            post(routes::alerts::mute_instance),
        )
        .route(
            "/api/v1/alerts/:id/instances/:instance_id/_unmute",
            post(routes::alerts::unmute_instance),
        );
    if let Some(layer) = rate_limit {
        mutations = mutations.layer(layer);
    }

    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/metrics", get(metrics_handler))
        .merge(mutations)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

/// Prometheus exposition handler
async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed").into_response(),
    }
}

/// Initialize logging; unrecognized level names fall back to `info`
pub fn init_logging(level: &str, json: bool) {
    let builder = FmtSubscriber::builder()
        .with_max_level(level.parse().unwrap_or(Level::INFO))
        .with_target(true);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())
            .expect("Failed to set tracing subscriber");
    } else {
        tracing::subscriber::set_global_default(builder.finish())
            .expect("Failed to set tracing subscriber");
    }
}

/// Insert one unmuted sample alert; returns its id
fn seed_sample_alert(store: &MemoryRecordStore) -> anyhow::Result<String> {
    let id = uuid::Uuid::new_v4().to_string();
    let attributes = serde_json::json!({
        "alertTypeId": "example.threshold",
        "consumer": "demo",
        "actions": [],
        "muteAll": false,
        "mutedInstanceIds": [],
    });
    let serde_json::Value::Object(attributes) = attributes else {
        anyhow::bail!("sample attributes must be an object");
    };
    store.insert(ALERT_RECORD_TYPE, &id, attributes, Vec::new())?;
    Ok(id)
}

/// Run the server
pub async fn run_server(cfg: ApiConfig) -> anyhow::Result<()> {
    let store = Arc::new(MemoryRecordStore::new());
    if cfg.seed_sample_alert {
        let id = seed_sample_alert(&store)?;
        info!("Seeded sample alert \"{}\"", id);
    }

    let policy = Arc::new(StaticPolicy::permit_all());
    let manager = MuteStateManager::new(MuteStateManagerOptions {
        store: store.clone(),
        alert_authorizer: policy.clone(),
        connector_authorizer: policy,
        audit: Some(Arc::new(TracingAuditLogger::new())),
        clock: Arc::new(SystemClock),
        identity: Arc::new(StaticIdentity::new(&cfg.updated_by)),
    });

    let recorder = PrometheusBuilder::new()
        .install_recorder()
        .context("install metrics recorder")?;
    let state = Arc::new(AppState::new(manager).with_metrics(recorder));

    let rate_limit = if cfg.rate_limit.enabled {
        Some(
            cfg.rate_limit
                .layer()
                .context("rate limit settings out of range")?,
        )
    } else {
        None
    };
    let app = create_router(state, rate_limit);

    info!("Starting alert server on {}", cfg.listen_addr);

    let listener = tokio::net::TcpListener::bind(&cfg.listen_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
