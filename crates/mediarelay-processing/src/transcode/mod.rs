//! Transcoding stage: ffmpeg invocation inside a per-request workspace.

mod ffmpeg;
mod profile;
mod workspace;

pub use ffmpeg::{FfmpegTranscoder, TranscodeError, TranscodeJob, Transcoder};
pub use profile::TranscodeProfile;
pub use workspace::RequestWorkspace;
