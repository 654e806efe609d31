//! Test helpers: build AppState and router for integration tests.
//!
//! Storage is the in-memory backend, the workflow trigger is a mockito
//! server and ffmpeg is a shell script that copies its input.

#![allow(dead_code)]

pub mod ffmpeg;
pub mod storage;

use std::path::PathBuf;
use std::sync::Arc;

use axum_test::TestServer;
use mediarelay_api::setup::routes;
use mediarelay_api::AppState;
use mediarelay_core::constants::{DEFAULT_MAX_AUDIO_SIZE_MB, DEFAULT_MAX_VIDEO_SIZE_MB, MIB};
use mediarelay_core::{BaseConfig, Config, RelayConfig, StorageBackend};
use mediarelay_infra::{NotificationDispatcher, NotificationDispatcherConfig};
use mediarelay_processing::FfmpegTranscoder;
use mediarelay_storage::{MemoryStorage, Storage};
use tempfile::TempDir;

pub use ffmpeg::FakeFfmpeg;
pub use storage::FailingStorage;

pub const STORAGE_BASE_URL: &str = "https://media.example.com";
pub const TRIGGER_PATH: &str = "/trigger";
pub const PASSTHROUGH_PATH: &str = "/legacy";

/// Knobs for a test application.
#[derive(Debug, Clone)]
pub struct TestOptions {
    pub transcode_video: bool,
    pub transcode_audio: bool,
    pub ffmpeg: FakeFfmpeg,
    pub max_video_size_bytes: usize,
    pub max_audio_size_bytes: usize,
    pub static_dir: Option<PathBuf>,
    /// Every storage write fails instead of landing in `TestApp::storage`
    pub failing_storage: bool,
    pub production: bool,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            transcode_video: true,
            transcode_audio: false,
            ffmpeg: FakeFfmpeg::Copy,
            max_video_size_bytes: DEFAULT_MAX_VIDEO_SIZE_MB * MIB,
            max_audio_size_bytes: DEFAULT_MAX_AUDIO_SIZE_MB * MIB,
            static_dir: None,
            failing_storage: false,
            production: false,
        }
    }
}

/// Test application: server plus the resources it points at.
pub struct TestApp {
    pub server: TestServer,
    pub storage: MemoryStorage,
    /// Mock workflow trigger and passthrough sink
    pub trigger: mockito::ServerGuard,
    /// Root under which request workspaces are created
    pub temp_root: TempDir,
    _bin_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Entries left under the workspace root.
    pub fn temp_entries(&self) -> usize {
        std::fs::read_dir(self.temp_root.path())
            .map(|d| d.count())
            .unwrap_or(0)
    }
}

pub fn test_config(trigger_url: &str, temp_root: PathBuf, ffmpeg_path: String, options: &TestOptions) -> Config {
    Config(Box::new(RelayConfig {
        base: BaseConfig {
            server_port: 0,
            cors_origins: vec!["*".to_string()],
            environment: if options.production { "production" } else { "test" }.to_string(),
            static_dir: options.static_dir.clone(),
        },
        storage_backend: Some(StorageBackend::Memory),
        s3_bucket: None,
        s3_region: None,
        s3_endpoint: None,
        aws_region: None,
        local_storage_path: None,
        local_storage_base_url: None,
        max_video_size_bytes: options.max_video_size_bytes,
        max_audio_size_bytes: options.max_audio_size_bytes,
        transcode_video: options.transcode_video,
        transcode_audio: options.transcode_audio,
        ffmpeg_path,
        transcode_temp_dir: Some(temp_root),
        workflow_trigger_url: format!("{}{}", trigger_url, TRIGGER_PATH),
        workflow_trigger_signing_secret: None,
        workflow_trigger_timeout_seconds: 5,
        passthrough_webhook_url: Some(format!("{}{}", trigger_url, PASSTHROUGH_PATH)),
    }))
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(TestOptions::default()).await
}

pub async fn setup_test_app_with(options: TestOptions) -> TestApp {
    let trigger = mockito::Server::new_async().await;
    let temp_root = TempDir::new().expect("Failed to create temp root");
    let bin_dir = TempDir::new().expect("Failed to create bin dir");
    let ffmpeg_path = ffmpeg::write_fake_ffmpeg(bin_dir.path(), options.ffmpeg);

    let config = test_config(
        &trigger.url(),
        temp_root.path().to_path_buf(),
        ffmpeg_path.to_string_lossy().to_string(),
        &options,
    );

    let storage = MemoryStorage::new(STORAGE_BASE_URL);
    let backend: Arc<dyn Storage> = if options.failing_storage {
        Arc::new(FailingStorage)
    } else {
        Arc::new(storage.clone())
    };
    let dispatcher = |url: &str| {
        NotificationDispatcher::new(NotificationDispatcherConfig {
            url: url.to_string(),
            signing_secret: None,
            timeout_seconds: 5,
        })
        .expect("Failed to create dispatcher")
    };

    let state = Arc::new(AppState {
        notifier: dispatcher(config.workflow_trigger_url()),
        passthrough: dispatcher(config.passthrough_webhook_url()),
        storage: backend,
        transcoder: Arc::new(FfmpegTranscoder::new(config.ffmpeg_path())),
        config: config.clone(),
    });

    let app = routes::setup_routes(&config, state).expect("Failed to build router");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        storage,
        trigger,
        temp_root,
        _bin_dir: bin_dir,
    }
}
