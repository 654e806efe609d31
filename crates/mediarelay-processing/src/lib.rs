//! Mediarelay Media Processing Library
//!
//! Upload validation and the ffmpeg-backed transcoding stage.

pub mod transcode;
pub mod validator;

// Re-export commonly used types
pub use transcode::{
    FfmpegTranscoder, RequestWorkspace, TranscodeError, TranscodeJob, TranscodeProfile,
    Transcoder,
};
pub use validator::{parse_identity, MediaValidator, ValidationError};
