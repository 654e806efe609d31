#![cfg(unix)]

mod helpers;

use bytes::Bytes;
use helpers::{entries, write_fake_ffmpeg, FakeFfmpeg};
use mediarelay_processing::{
    FfmpegTranscoder, RequestWorkspace, TranscodeError, TranscodeProfile, Transcoder,
};
use tempfile::TempDir;

#[tokio::test]
async fn transcode_returns_output_and_leaves_no_artifacts() {
    let bin = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    let transcoder =
        FfmpegTranscoder::new(write_fake_ffmpeg(bin.path(), FakeFfmpeg::Copy).to_string_lossy());
    let workspace = RequestWorkspace::acquire(root.path()).unwrap();

    let input = Bytes::from(vec![7u8; 64 * 1024]);
    let output = transcoder
        .transcode(&workspace, input.clone(), &TranscodeProfile::video())
        .await
        .unwrap();

    assert_eq!(output, input);
    assert_eq!(entries(workspace.path()), 0);

    workspace.release();
    assert_eq!(entries(root.path()), 0);
}

#[tokio::test]
async fn non_zero_exit_captures_stderr() {
    let bin = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    let transcoder =
        FfmpegTranscoder::new(write_fake_ffmpeg(bin.path(), FakeFfmpeg::Fail).to_string_lossy());
    let workspace = RequestWorkspace::acquire(root.path()).unwrap();

    let err = transcoder
        .transcode(&workspace, Bytes::from_static(b"not media"), &TranscodeProfile::audio())
        .await
        .unwrap_err();

    match err {
        TranscodeError::Failed { stderr, .. } => {
            assert!(stderr.contains("Invalid data found"))
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(entries(workspace.path()), 0);
    workspace.release();
}

#[tokio::test]
async fn empty_output_is_an_error() {
    let bin = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    let transcoder =
        FfmpegTranscoder::new(write_fake_ffmpeg(bin.path(), FakeFfmpeg::Silent).to_string_lossy());
    let workspace = RequestWorkspace::acquire(root.path()).unwrap();

    let err = transcoder
        .transcode(&workspace, Bytes::from_static(b"data"), &TranscodeProfile::video())
        .await
        .unwrap_err();

    assert!(matches!(err, TranscodeError::EmptyOutput));
    assert_eq!(entries(workspace.path()), 0);
    workspace.release();
}
