use std::path::PathBuf;

use axum::Router;
use common::utils::logging::{init_logging_debug, init_logging_default, init_logging_json};
use configs::{AppConfig, ServerConfig};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, AppState};
use service::FileRecordStore;

/// Initialize logging via shared common utils, picking the flavor from config
pub fn init_logging(server: &ServerConfig) {
    if server.json_logs {
        init_logging_json();
    } else if server.debug {
        init_logging_debug();
    } else {
        init_logging_default();
    }
}

/// Any origin, any method, any header.
pub fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Data file location with relative paths anchored at the executable's directory
pub fn data_file_path(cfg: &AppConfig) -> PathBuf {
    cfg.storage.resolve_data_file(&configs::service_dir())
}

/// Open the record store and build the router on top of it
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let data_file = data_file_path(cfg);
    common::env::ensure_parent_dir(&data_file).await?;
    let store = FileRecordStore::new(&data_file, cfg.storage.pretty).await?;
    Ok(routes::build_router(AppState::new(store), build_cors()))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!(service = "server", event = "shutdown_signal", "received Ctrl+C, shutting down");
    }
}

/// Public entry: build the app and run the HTTP server until Ctrl+C
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await?;

    let addr = cfg.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %listener.local_addr()?, debug = cfg.server.debug, "Server is running");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
