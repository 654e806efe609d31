//! Configuration module
//!
//! Configuration is read once from the environment at start-up and never
//! mutated afterwards. Components receive what they need from `Config`
//! explicitly at construction time.

use std::env;
use std::path::PathBuf;

use crate::constants::{DEFAULT_MAX_AUDIO_SIZE_MB, DEFAULT_MAX_VIDEO_SIZE_MB, MIB};
use crate::models::MediaKind;
use crate::storage_types::StorageBackend;

const SERVER_PORT: u16 = 3000;
const WORKFLOW_TRIGGER_TIMEOUT_SECS: u64 = 30;

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub static_dir: Option<PathBuf>,
}

/// Relay configuration
#[derive(Clone, Debug)]
pub struct RelayConfig {
    pub base: BaseConfig,
    // Storage configuration
    pub storage_backend: Option<StorageBackend>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, DigitalOcean Spaces, etc.)
    pub aws_region: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Upload limits
    pub max_video_size_bytes: usize,
    pub max_audio_size_bytes: usize,
    // Transcoding
    pub transcode_video: bool,
    pub transcode_audio: bool,
    pub ffmpeg_path: String,
    pub transcode_temp_dir: Option<PathBuf>,
    // Workflow trigger
    pub workflow_trigger_url: String,
    pub workflow_trigger_signing_secret: Option<String>,
    pub workflow_trigger_timeout_seconds: u64,
    pub passthrough_webhook_url: Option<String>,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<RelayConfig>);

impl Config {
    fn as_relay(&self) -> &RelayConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = RelayConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_relay().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_env(&self.as_relay().base.environment)
    }

    pub fn server_port(&self) -> u16 {
        self.as_relay().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_relay().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.as_relay().base.environment
    }

    pub fn static_dir(&self) -> Option<&std::path::Path> {
        self.as_relay().base.static_dir.as_deref()
    }

    pub fn storage_backend(&self) -> Option<StorageBackend> {
        self.as_relay().storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.as_relay().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.as_relay().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.as_relay().s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.as_relay().aws_region.as_deref()
    }

    /// `S3_REGION`, falling back to `AWS_REGION`.
    pub fn effective_s3_region(&self) -> Option<&str> {
        self.as_relay().effective_s3_region()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.as_relay().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.as_relay().local_storage_base_url.as_deref()
    }

    pub fn max_video_size_bytes(&self) -> usize {
        self.as_relay().max_video_size_bytes
    }

    pub fn max_audio_size_bytes(&self) -> usize {
        self.as_relay().max_audio_size_bytes
    }

    /// Size ceiling for an upload of `kind`.
    pub fn max_size_for(&self, kind: MediaKind) -> usize {
        match kind {
            MediaKind::Video => self.max_video_size_bytes(),
            MediaKind::Audio => self.max_audio_size_bytes(),
        }
    }

    /// Whether uploads of `kind` go through the transcoder.
    pub fn transcode_enabled_for(&self, kind: MediaKind) -> bool {
        match kind {
            MediaKind::Video => self.as_relay().transcode_video,
            MediaKind::Audio => self.as_relay().transcode_audio,
        }
    }

    pub fn ffmpeg_path(&self) -> &str {
        &self.as_relay().ffmpeg_path
    }

    /// Root directory for per-request temporary workspaces.
    pub fn transcode_temp_dir(&self) -> PathBuf {
        self.as_relay()
            .transcode_temp_dir
            .clone()
            .unwrap_or_else(env::temp_dir)
    }

    pub fn workflow_trigger_url(&self) -> &str {
        &self.as_relay().workflow_trigger_url
    }

    pub fn workflow_trigger_signing_secret(&self) -> Option<&str> {
        self.as_relay().workflow_trigger_signing_secret.as_deref()
    }

    pub fn workflow_trigger_timeout_seconds(&self) -> u64 {
        self.as_relay().workflow_trigger_timeout_seconds
    }

    /// Sink of the legacy passthrough route; defaults to the workflow trigger.
    pub fn passthrough_webhook_url(&self) -> &str {
        self.as_relay()
            .passthrough_webhook_url
            .as_deref()
            .unwrap_or(&self.as_relay().workflow_trigger_url)
    }
}

fn is_production_env(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .to_lowercase()
        .parse()
        .unwrap_or(default)
}

fn env_non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}

/// Read a megabyte ceiling from `name` and convert it to bytes.
fn env_size_mb(name: &str, default_mb: usize) -> Result<usize, anyhow::Error> {
    let mb = match env_non_empty(name) {
        Some(value) => value
            .trim()
            .parse::<usize>()
            .map_err(|_| anyhow::anyhow!("{} must be a whole number of megabytes", name))?,
        None => default_mb,
    };
    mb_to_bytes(name, mb)
}

fn mb_to_bytes(name: &str, mb: usize) -> Result<usize, anyhow::Error> {
    mb.checked_mul(MIB)
        .ok_or_else(|| anyhow::anyhow!("{} is too large: {} MB", name, mb))
}

impl RelayConfig {
    fn effective_s3_region(&self) -> Option<&str> {
        self.s3_region.as_deref().or(self.aws_region.as_deref())
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        if is_production_env(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            static_dir: env_non_empty("STATIC_DIR").map(PathBuf::from),
        };

        let storage_backend = match env_non_empty("STORAGE_BACKEND") {
            Some(value) => Some(value.parse::<StorageBackend>()?),
            None => None,
        };

        let config = RelayConfig {
            base,
            storage_backend,
            s3_bucket: env_non_empty("S3_BUCKET"),
            s3_region: env_non_empty("S3_REGION"),
            s3_endpoint: env_non_empty("S3_ENDPOINT"),
            aws_region: env_non_empty("AWS_REGION"),
            local_storage_path: env_non_empty("LOCAL_STORAGE_PATH"),
            local_storage_base_url: env_non_empty("LOCAL_STORAGE_BASE_URL"),
            max_video_size_bytes: env_size_mb("MAX_VIDEO_SIZE_MB", DEFAULT_MAX_VIDEO_SIZE_MB)?,
            max_audio_size_bytes: env_size_mb("MAX_AUDIO_SIZE_MB", DEFAULT_MAX_AUDIO_SIZE_MB)?,
            transcode_video: env_flag("TRANSCODE_VIDEO", true),
            transcode_audio: env_flag("TRANSCODE_AUDIO", false),
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
            transcode_temp_dir: env_non_empty("TRANSCODE_TEMP_DIR").map(PathBuf::from),
            workflow_trigger_url: env::var("WORKFLOW_TRIGGER_URL")
                .map_err(|_| anyhow::anyhow!("WORKFLOW_TRIGGER_URL must be set"))?,
            workflow_trigger_signing_secret: env_non_empty("WORKFLOW_TRIGGER_SIGNING_SECRET"),
            workflow_trigger_timeout_seconds: env::var("WORKFLOW_TRIGGER_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| WORKFLOW_TRIGGER_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(WORKFLOW_TRIGGER_TIMEOUT_SECS),
            passthrough_webhook_url: env_non_empty("PASSTHROUGH_WEBHOOK_URL"),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        validate_http_url("WORKFLOW_TRIGGER_URL", &self.workflow_trigger_url)?;
        if let Some(ref url) = self.passthrough_webhook_url {
            validate_http_url("PASSTHROUGH_WEBHOOK_URL", url)?;
        }

        if self.max_video_size_bytes == 0 || self.max_audio_size_bytes == 0 {
            return Err(anyhow::anyhow!(
                "MAX_VIDEO_SIZE_MB and MAX_AUDIO_SIZE_MB must be greater than zero"
            ));
        }

        if self.workflow_trigger_timeout_seconds == 0 {
            return Err(anyhow::anyhow!(
                "WORKFLOW_TRIGGER_TIMEOUT_SECONDS must be greater than zero"
            ));
        }

        let backend = self.storage_backend.unwrap_or(StorageBackend::S3);
        match backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.effective_s3_region().is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
            StorageBackend::Memory => {}
        }

        Ok(())
    }
}

fn validate_http_url(name: &str, url: &str) -> Result<(), anyhow::Error> {
    let trimmed = url.trim();
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(anyhow::anyhow!("{} must be an http(s) URL", name));
    }
    Ok(())
}
