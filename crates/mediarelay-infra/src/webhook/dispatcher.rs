use std::time::{Duration, Instant};

use anyhow::Context;
use hmac::{Hmac, Mac};
use mediarelay_core::models::NotificationPayload;
use mediarelay_core::AppError;
use reqwest::Client;
use serde_json::Value as JsonValue;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "X-Webhook-Signature";

const USER_AGENT: &str = concat!("Mediarelay-Webhook/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("Failed to serialize notification: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to sign notification: {0}")]
    Signing(String),

    #[error("Failed to send notification: {0}")]
    Transport(String),

    #[error("Workflow trigger returned non-2xx status: {status} - {body}")]
    Status { status: u16, body: String },
}

impl From<NotificationError> for AppError {
    fn from(err: NotificationError) -> Self {
        AppError::Notification(err.to_string())
    }
}

/// Configuration for the notification dispatcher
#[derive(Clone, Debug)]
pub struct NotificationDispatcherConfig {
    pub url: String,
    pub signing_secret: Option<String>,
    pub timeout_seconds: u64,
}

/// Delivers JSON bodies to a workflow-trigger endpoint.
///
/// Each delivery is a single POST; nothing is queued or retried.
#[derive(Clone, Debug)]
pub struct NotificationDispatcher {
    http_client: Client,
    url: String,
    signing_secret: Option<String>,
}

impl NotificationDispatcher {
    pub fn new(config: NotificationDispatcherConfig) -> anyhow::Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client for workflow trigger")?;

        Ok(Self {
            http_client,
            url: config.url,
            signing_secret: config.signing_secret,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Announce a stored upload. Returns the trigger's response body.
    pub async fn notify(&self, payload: &NotificationPayload) -> Result<JsonValue, NotificationError> {
        let body = serde_json::to_string(payload)?;
        tracing::debug!(
            file_name = %payload.file_name,
            file_type = %payload.file_type,
            "Sending upload notification"
        );
        self.send(body).await
    }

    /// Forward an arbitrary JSON document verbatim.
    pub async fn forward(&self, document: &JsonValue) -> Result<JsonValue, NotificationError> {
        let body = serde_json::to_string(document)?;
        self.send(body).await
    }

    async fn send(&self, body: String) -> Result<JsonValue, NotificationError> {
        let start = Instant::now();

        let mut request = self
            .http_client
            .post(&self.url)
            .header("Content-Type", "application/json");

        if let Some(ref secret) = self.signing_secret {
            let signature = sign_payload(&body, secret)?;
            request = request.header(SIGNATURE_HEADER, format!("v1={}", signature));
        }

        let response = request.body(body).send().await.map_err(|e| {
            tracing::error!(
                error = %e,
                url = %self.url,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Workflow trigger request failed"
            );
            NotificationError::Transport(e.to_string())
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| NotificationError::Transport(e.to_string()))?;

        if !status.is_success() {
            tracing::error!(
                status = status.as_u16(),
                url = %self.url,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Workflow trigger returned non-2xx status"
            );
            return Err(NotificationError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        tracing::info!(
            status = status.as_u16(),
            url = %self.url,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Workflow trigger accepted notification"
        );

        Ok(parse_response_body(&text))
    }
}

/// Sign a body with HMAC-SHA256, hex encoded
pub fn sign_payload(body: &str, secret: &str) -> Result<String, NotificationError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| NotificationError::Signing(e.to_string()))?;
    mac.update(body.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Interpret a trigger response body: JSON when it parses, otherwise the raw
/// text as a JSON string. Blank bodies become `null`.
pub fn parse_response_body(text: &str) -> JsonValue {
    if text.trim().is_empty() {
        return JsonValue::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| JsonValue::String(text.to_string()))
}
