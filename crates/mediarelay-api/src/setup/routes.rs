//! Route configuration and setup

use crate::api_doc::get_openapi_spec;
use crate::constants::{
    HEALTH_PATH, MULTIPART_OVERHEAD_BYTES, OPENAPI_PATH, PASSTHROUGH_BODY_LIMIT_BYTES,
    PASSTHROUGH_PATH, UPLOAD_AUDIO_PATH, UPLOAD_VIDEO_PATH,
};
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use mediarelay_core::{Config, MediaKind};
use crate::error::expose_error_details;
use mediarelay_infra::{request_id_middleware, RequestSpan};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let video_limit = body_limit_for(config, MediaKind::Video);
    let audio_limit = body_limit_for(config, MediaKind::Audio);

    let mut router = Router::new()
        .route(
            UPLOAD_VIDEO_PATH,
            post(handlers::upload::upload_video).layer(DefaultBodyLimit::max(video_limit)),
        )
        .route(
            UPLOAD_AUDIO_PATH,
            post(handlers::upload::upload_audio).layer(DefaultBodyLimit::max(audio_limit)),
        )
        .route(
            PASSTHROUGH_PATH,
            post(handlers::passthrough::forward_document)
                .layer(DefaultBodyLimit::max(PASSTHROUGH_BODY_LIMIT_BYTES)),
        )
        .route(HEALTH_PATH, get(handlers::health::health_check))
        .route(OPENAPI_PATH, get(|| async { Json(get_openapi_spec()) }))
        .with_state(state);

    if let Some(dir) = config.static_dir() {
        tracing::info!(path = %dir.display(), "Serving static files");
        router = router.fallback_service(ServeDir::new(dir));
    }

    if !config.is_production() {
        router = router.layer(axum::middleware::from_fn(expose_error_details));
    }

    Ok(router
        .layer(TraceLayer::new_for_http().make_span_with(RequestSpan))
        .layer(cors)
        .layer(axum::middleware::from_fn(request_id_middleware)))
}

fn body_limit_for(config: &Config, kind: MediaKind) -> usize {
    config
        .max_size_for(kind)
        .saturating_add(MULTIPART_OVERHEAD_BYTES)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}
