//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use mediarelay_core::Config;
use mediarelay_infra::{NotificationDispatcher, NotificationDispatcherConfig};
use mediarelay_processing::{FfmpegTranscoder, Transcoder};
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    mediarelay_infra::init_telemetry(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        config.environment(),
    )
    .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");

    let state = build_state(config.clone()).await?;
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}

/// Build the shared state: storage backend, transcoder and both webhook clients.
pub async fn build_state(config: Config) -> Result<Arc<AppState>> {
    let storage = storage::setup_storage(&config).await?;

    let transcoder: Arc<dyn Transcoder> = Arc::new(FfmpegTranscoder::new(config.ffmpeg_path()));

    let notifier = NotificationDispatcher::new(NotificationDispatcherConfig {
        url: config.workflow_trigger_url().to_string(),
        signing_secret: config.workflow_trigger_signing_secret().map(String::from),
        timeout_seconds: config.workflow_trigger_timeout_seconds(),
    })?;

    let passthrough = NotificationDispatcher::new(NotificationDispatcherConfig {
        url: config.passthrough_webhook_url().to_string(),
        signing_secret: config.workflow_trigger_signing_secret().map(String::from),
        timeout_seconds: config.workflow_trigger_timeout_seconds(),
    })?;

    Ok(Arc::new(AppState {
        config,
        storage,
        transcoder,
        notifier,
        passthrough,
    }))
}
