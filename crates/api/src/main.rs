//! Alert Mute-State Service - Main Entry Point

use api::{init_logging, run_server, ApiConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = ApiConfig::load()?;
    init_logging(&cfg.log_level, cfg.log_json);

    info!("=== Alert Mute-State Service v{} ===", env!("CARGO_PKG_VERSION"));

    run_server(cfg).await
}
