//! Core library for the video upload service: storage, handlers and routing.

pub mod config;
pub mod error;
pub mod files;
pub mod handlers;
pub mod middleware;
pub mod models;

pub use config::AppConfig;
pub use error::{AppError, Result};
pub use files::{StoredVideo, VideoStore, VideoStoreConfig};
pub use handlers::routes::create_routes;
pub use middleware::cors::{cors_layer_from_config, cors_layer_permissive};
pub use middleware::logging::logging_layer;

use axum::{extract::DefaultBodyLimit, Router};
use std::{net::SocketAddr, path::PathBuf};
use tokio::signal;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub app_name: String,
    pub version: String,
    pub video_store: VideoStore,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(video_store: VideoStore) -> Self {
        Self {
            app_name: "Video Vault".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            video_store,
            static_dir: PathBuf::from("public"),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let store = VideoStore::new(VideoStoreConfig::from(&config.storage));
        Self::new(store).with_static_dir(config.storage.static_dir.clone())
    }

    pub fn with_static_dir(mut self, static_dir: impl Into<PathBuf>) -> Self {
        self.static_dir = static_dir.into();
        self
    }
}

pub fn create_app(state: AppState) -> Router {
    create_app_with_config(state, AppConfig::default())
}

pub fn create_app_with_config(state: AppState, config: AppConfig) -> Router {
    let mut router = Router::new().merge(create_routes());

    router = router.layer(DefaultBodyLimit::max(config.storage.max_upload_bytes()));

    router = router.layer(middleware::cors::cors_layer_from_config(&config.cors));

    router = router.layer(middleware::logging::logging_layer());

    router.with_state(state)
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<()> {
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", addr, e))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
