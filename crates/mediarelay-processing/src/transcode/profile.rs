use mediarelay_core::MediaKind;

/// Target format of a transcode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeProfile {
    /// ffmpeg muxer name passed to `-f`
    pub container: &'static str,
    pub extension: &'static str,
    pub content_type: &'static str,
    /// `None` drops the video stream (`-vn`)
    pub video_codec: Option<&'static str>,
    pub audio_codec: &'static str,
    pub audio_bitrate: &'static str,
    pub extra_args: &'static [&'static str],
}

impl TranscodeProfile {
    /// H.264/AAC in MP4 with the moov atom moved up for progressive playback.
    pub fn video() -> Self {
        Self {
            container: "mp4",
            extension: "mp4",
            content_type: "video/mp4",
            video_codec: Some("libx264"),
            audio_codec: "aac",
            audio_bitrate: "128k",
            extra_args: &["-movflags", "+faststart"],
        }
    }

    /// AAC in an M4A (ipod muxer) container.
    pub fn audio() -> Self {
        Self {
            container: "ipod",
            extension: "m4a",
            content_type: "audio/mp4",
            video_codec: None,
            audio_codec: "aac",
            audio_bitrate: "128k",
            extra_args: &[],
        }
    }

    pub fn for_kind(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Video => Self::video(),
            MediaKind::Audio => Self::audio(),
        }
    }
}
