use std::io;
use std::path::Path;
use std::process::Stdio;
use std::time::Instant;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use mediarelay_core::constants::TEMP_PREFIX;
use mediarelay_core::AppError;
use tempfile::NamedTempFile;
use tokio::process::Command;

use super::profile::TranscodeProfile;
use super::workspace::RequestWorkspace;

/// Longest stderr tail kept in an error.
const STDERR_TAIL_BYTES: usize = 4096;

#[derive(Debug, thiserror::Error)]
pub enum TranscodeError {
    #[error("Failed to prepare transcode artifacts: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to execute ffmpeg: {0}")]
    Spawn(String),

    #[error("FFmpeg failed ({status}): {stderr}")]
    Failed { status: String, stderr: String },

    #[error("FFmpeg produced no output")]
    EmptyOutput,
}

impl From<TranscodeError> for AppError {
    fn from(err: TranscodeError) -> Self {
        AppError::Transcode(err.to_string())
    }
}

/// Converts media bytes into a target profile.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Transcode `input` into `profile`. Intermediate files are written under
    /// `workspace` and are gone by the time this returns.
    async fn transcode(
        &self,
        workspace: &RequestWorkspace,
        input: Bytes,
        profile: &TranscodeProfile,
    ) -> Result<Bytes, TranscodeError>;
}

/// Input and output artifacts of a single transcode.
///
/// Both files are removed by `cleanup`, or by drop when the future is
/// abandoned mid-flight.
#[derive(Debug)]
pub struct TranscodeJob {
    input: NamedTempFile,
    output: NamedTempFile,
    profile: TranscodeProfile,
}

impl TranscodeJob {
    pub fn create(dir: &Path, profile: &TranscodeProfile) -> io::Result<Self> {
        let prefix = format!("{}-{}-", TEMP_PREFIX, Utc::now().timestamp_millis());
        let input = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".in")
            .tempfile_in(dir)?;
        let output = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(&format!(".{}", profile.extension))
            .tempfile_in(dir)?;

        Ok(Self {
            input,
            output,
            profile: profile.clone(),
        })
    }

    pub fn input_path(&self) -> &Path {
        self.input.path()
    }

    pub fn output_path(&self) -> &Path {
        self.output.path()
    }

    /// ffmpeg argument list for this job.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "-hide_banner".to_string(),
            "-nostdin".to_string(),
            "-y".to_string(),
            "-i".to_string(),
            self.input_path().to_string_lossy().to_string(),
        ];

        match self.profile.video_codec {
            Some(codec) => args.extend(["-c:v".to_string(), codec.to_string()]),
            None => args.push("-vn".to_string()),
        }

        args.extend([
            "-c:a".to_string(),
            self.profile.audio_codec.to_string(),
            "-b:a".to_string(),
            self.profile.audio_bitrate.to_string(),
        ]);
        args.extend(self.profile.extra_args.iter().map(|a| a.to_string()));
        args.extend([
            "-f".to_string(),
            self.profile.container.to_string(),
            self.output_path().to_string_lossy().to_string(),
        ]);

        args
    }

    /// Remove both artifacts. Failures are logged, never returned.
    pub fn cleanup(self) {
        for (role, file) in [("input", self.input), ("output", self.output)] {
            let path = file.path().to_path_buf();
            if let Err(e) = file.close() {
                tracing::warn!(
                    error = %e,
                    path = %path.display(),
                    artifact = role,
                    "Failed to remove transcode artifact"
                );
            }
        }
    }
}

/// Transcoder backed by an external ffmpeg binary.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    ffmpeg_path: String,
}

impl FfmpegTranscoder {
    pub fn new(ffmpeg_path: impl Into<String>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }

    pub fn ffmpeg_path(&self) -> &str {
        &self.ffmpeg_path
    }

    async fn run(&self, job: &TranscodeJob, input: Bytes) -> Result<Bytes, TranscodeError> {
        tokio::fs::write(job.input_path(), &input).await?;

        let output = Command::new(&self.ffmpeg_path)
            .args(job.args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| TranscodeError::Spawn(e.to_string()))?;

        if !output.status.success() {
            return Err(TranscodeError::Failed {
                status: output.status.to_string(),
                stderr: stderr_tail(&output.stderr),
            });
        }

        let data = tokio::fs::read(job.output_path()).await?;
        if data.is_empty() {
            return Err(TranscodeError::EmptyOutput);
        }

        Ok(Bytes::from(data))
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn transcode(
        &self,
        workspace: &RequestWorkspace,
        input: Bytes,
        profile: &TranscodeProfile,
    ) -> Result<Bytes, TranscodeError> {
        let input_size = input.len();
        let start = Instant::now();

        let job = TranscodeJob::create(workspace.path(), profile)?;
        let result = self.run(&job, input).await;
        job.cleanup();

        match &result {
            Ok(data) => tracing::info!(
                container = profile.container,
                input_bytes = input_size,
                output_bytes = data.len(),
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Transcode finished"
            ),
            Err(e) => tracing::error!(
                error = %e,
                container = profile.container,
                input_bytes = input_size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Transcode failed"
            ),
        }

        result
    }
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let trimmed = text.trim();
    if trimmed.len() <= STDERR_TAIL_BYTES {
        return trimmed.to_string();
    }
    let mut start = trimmed.len() - STDERR_TAIL_BYTES;
    while !trimmed.is_char_boundary(start) {
        start += 1;
    }
    format!("...{}", &trimmed[start..])
}
