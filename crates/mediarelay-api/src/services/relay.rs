//! Relay orchestration: validated upload → optional transcode → storage →
//! workflow trigger.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use chrono::Utc;
use mediarelay_core::models::{extension_for_mime, NotificationPayload};
use mediarelay_core::{AppError, Config, MediaKind};
use mediarelay_infra::NotificationDispatcher;
use mediarelay_processing::{RequestWorkspace, TranscodeProfile, Transcoder};
use mediarelay_storage::{generate_storage_key, Storage};
use serde_json::Value as JsonValue;
use tracing::Instrument;

use crate::state::AppState;

/// A validated upload, fully buffered.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub kind: MediaKind,
    /// Caller identity, forwarded as received
    pub logged_in_user: Option<JsonValue>,
    /// Normalized MIME type
    pub content_type: String,
    pub original_file_name: Option<String>,
    pub data: Bytes,
}

impl UploadRequest {
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Result of a relay that reached `Succeeded`.
#[derive(Debug, Clone)]
pub struct RelayOutcome {
    pub kind: MediaKind,
    pub url: String,
    pub storage_key: String,
    /// Workflow-trigger response body
    pub data: JsonValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayStage {
    Received,
    Validated,
    Transcoded,
    Stored,
    Notified,
    Succeeded,
    Failed,
}

impl RelayStage {
    pub fn as_str(self) -> &'static str {
        match self {
            RelayStage::Received => "received",
            RelayStage::Validated => "validated",
            RelayStage::Transcoded => "transcoded",
            RelayStage::Stored => "stored",
            RelayStage::Notified => "notified",
            RelayStage::Succeeded => "succeeded",
            RelayStage::Failed => "failed",
        }
    }
}

impl fmt::Display for RelayStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracks the current stage of one relay and logs each transition.
///
/// Created by the upload handler when the request arrives, so intake
/// failures are logged as `Failed` transitions too.
#[derive(Debug)]
pub struct StageTracker {
    stage: RelayStage,
    started: Instant,
}

impl StageTracker {
    /// Start tracking a request that has just been `Received`.
    pub fn received() -> Self {
        Self::new(RelayStage::Received)
    }

    fn new(stage: RelayStage) -> Self {
        Self {
            stage,
            started: Instant::now(),
        }
    }

    pub fn stage(&self) -> RelayStage {
        self.stage
    }

    pub fn advance(&mut self, next: RelayStage) {
        tracing::debug!(
            from = %self.stage,
            stage = %next,
            elapsed_ms = self.started.elapsed().as_secs_f64() * 1000.0,
            "Relay stage transition"
        );
        self.stage = next;
    }

    pub fn fail(&mut self, error: &AppError) {
        tracing::warn!(
            failed_at = %self.stage,
            stage = %RelayStage::Failed,
            error = %error,
            elapsed_ms = self.started.elapsed().as_secs_f64() * 1000.0,
            "Relay failed"
        );
        self.stage = RelayStage::Failed;
    }
}

/// Runs the per-request pipeline. Cheap to clone; holds shared handles only.
#[derive(Clone)]
pub struct RelayOrchestrator {
    config: Config,
    storage: Arc<dyn Storage>,
    transcoder: Arc<dyn Transcoder>,
    notifier: NotificationDispatcher,
}

impl RelayOrchestrator {
    pub fn new(
        config: Config,
        storage: Arc<dyn Storage>,
        transcoder: Arc<dyn Transcoder>,
        notifier: NotificationDispatcher,
    ) -> Self {
        Self {
            config,
            storage,
            transcoder,
            notifier,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            state.config.clone(),
            state.storage.clone(),
            state.transcoder.clone(),
            state.notifier.clone(),
        )
    }

    /// Run the relay on its own task so a dropped client connection cannot
    /// cancel transcode, storage or notification work midway.
    pub async fn spawn(
        self,
        request: UploadRequest,
        tracker: StageTracker,
    ) -> Result<RelayOutcome, AppError> {
        let span = tracing::Span::current();
        tokio::spawn(async move { self.run(request, tracker).await }.instrument(span))
            .await
            .map_err(|e| AppError::Internal(format!("Relay task failed: {}", e)))?
    }

    /// Drive one validated upload to a terminal state. `tracker` is expected
    /// to be at `Validated`.
    pub async fn run(
        &self,
        request: UploadRequest,
        mut tracker: StageTracker,
    ) -> Result<RelayOutcome, AppError> {
        match self.relay(request, &mut tracker).await {
            Ok(outcome) => {
                tracker.advance(RelayStage::Succeeded);
                tracing::info!(
                    key = %outcome.storage_key,
                    url = %outcome.url,
                    duration_ms = tracker.started.elapsed().as_secs_f64() * 1000.0,
                    "Relay succeeded"
                );
                Ok(outcome)
            }
            Err(e) => {
                tracker.fail(&e);
                Err(e)
            }
        }
    }

    async fn relay(
        &self,
        request: UploadRequest,
        tracker: &mut StageTracker,
    ) -> Result<RelayOutcome, AppError> {
        let UploadRequest {
            kind,
            logged_in_user,
            content_type,
            original_file_name,
            data,
        } = request;

        let (data, content_type, extension) = if self.config.transcode_enabled_for(kind) {
            let profile = TranscodeProfile::for_kind(kind);
            let output = self.transcode(data, &profile).await?;
            tracker.advance(RelayStage::Transcoded);
            (
                output,
                profile.content_type.to_string(),
                profile.extension.to_string(),
            )
        } else {
            let extension = extension_for_mime(&content_type);
            (data, content_type, extension)
        };

        let storage_key = generate_storage_key(&extension);
        let file_size = data.len() as u64;
        let url = self
            .storage
            .put_object(&storage_key, data, &content_type)
            .await?;
        tracker.advance(RelayStage::Stored);

        let payload = NotificationPayload {
            file_url: url.clone(),
            file_name: storage_key.clone(),
            original_file_name,
            logged_in_user,
            file_type: kind,
            content_type,
            file_size,
            timestamp: Utc::now(),
        };
        let response = self.notifier.notify(&payload).await?;
        tracker.advance(RelayStage::Notified);

        Ok(RelayOutcome {
            kind,
            url,
            storage_key,
            data: response,
        })
    }

    /// Transcode inside a fresh request workspace, released on every path.
    async fn transcode(&self, data: Bytes, profile: &TranscodeProfile) -> Result<Bytes, AppError> {
        let root = self.config.transcode_temp_dir();
        let workspace = RequestWorkspace::acquire(&root).map_err(|e| {
            AppError::Internal(format!(
                "Failed to create workspace under {}: {}",
                root.display(),
                e
            ))
        })?;

        let result = self.transcoder.transcode(&workspace, data, profile).await;
        workspace.release();

        Ok(result?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_labels() {
        assert_eq!(RelayStage::Transcoded.to_string(), "transcoded");
        assert_eq!(RelayStage::Failed.as_str(), "failed");
    }

    #[test]
    fn tracker_records_failure() {
        let mut tracker = StageTracker::received();
        tracker.advance(RelayStage::Validated);
        tracker.advance(RelayStage::Transcoded);
        assert_eq!(tracker.stage, RelayStage::Transcoded);

        tracker.fail(&AppError::Storage("denied".to_string()));
        assert_eq!(tracker.stage(), RelayStage::Failed);
    }

    #[test]
    fn tracker_can_fail_before_validation() {
        let mut tracker = StageTracker::received();
        tracker.fail(&AppError::InvalidInput("Empty file".to_string()));
        assert_eq!(tracker.stage(), RelayStage::Failed);
    }
}
