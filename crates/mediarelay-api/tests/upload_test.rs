#![cfg(unix)]

mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use bytes::Bytes;
use helpers::{setup_test_app, setup_test_app_with, FakeFfmpeg, TestOptions, TRIGGER_PATH};
use mediarelay_core::constants::MIB;
use mediarelay_storage::Storage;
use mockito::Matcher;
use serde_json::{json, Value};

fn media_part(data: Vec<u8>, file_name: &str, mime: &str) -> Part {
    Part::bytes(Bytes::from(data))
        .file_name(file_name.to_string())
        .mime_type(mime.to_string())
}

fn identity() -> &'static str {
    r#"{"email":"ada@example.com","name":"Ada"}"#
}

#[tokio::test]
async fn webm_video_is_transcoded_stored_and_announced() {
    let mut app = setup_test_app().await;
    let size = 10 * MIB;

    let trigger = app
        .trigger
        .mock("POST", TRIGGER_PATH)
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "fileType": "Video",
            "contentType": "video/mp4",
            "fileSize": size,
            "originalFileName": "clip.webm",
            "loggedInUser": {"email": "ada@example.com", "name": "Ada"}
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"recordId":"rec42"}"#)
        .create_async()
        .await;

    let form = MultipartForm::new()
        .add_text("loggedInUser", identity())
        .add_part("video", media_part(vec![1u8; size], "clip.webm", "video/webm;codecs=vp8"));

    let response = app.client().post("/upload-video").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["recordId"], "rec42");
    assert!(body.get("audioUrl").is_none());

    let url = body["videoUrl"].as_str().unwrap();
    assert!(url.starts_with(helpers::STORAGE_BASE_URL));
    assert!(url.ends_with(".mp4"));

    let keys = app.storage.keys();
    assert_eq!(keys.len(), 1);
    assert_eq!(url, format!("{}/{}", helpers::STORAGE_BASE_URL, keys[0]));
    assert_eq!(
        app.storage.content_type_of(&keys[0]).as_deref(),
        Some("video/mp4")
    );

    trigger.assert_async().await;
    assert_eq!(app.temp_entries(), 0);
}

#[tokio::test]
async fn audio_is_stored_as_is_when_transcoding_is_off() {
    let mut app = setup_test_app().await;

    let trigger = app
        .trigger
        .mock("POST", TRIGGER_PATH)
        .match_body(Matcher::PartialJson(json!({
            "fileType": "Audio",
            "contentType": "audio/mpeg",
            "fileSize": 2048
        })))
        .with_status(200)
        .with_body("Accepted")
        .create_async()
        .await;

    let form = MultipartForm::new()
        .add_part("audio", media_part(vec![3u8; 2048], "memo.mp3", "audio/mpeg"));

    let response = app.client().post("/upload-audio").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], "Accepted");
    assert!(body.get("videoUrl").is_none());
    assert!(body["audioUrl"].as_str().unwrap().ends_with(".mp3"));

    let keys = app.storage.keys();
    assert_eq!(app.storage.content_type_of(&keys[0]).as_deref(), Some("audio/mpeg"));
    assert_eq!(app.storage.get(&keys[0]).unwrap().data.len(), 2048);

    trigger.assert_async().await;
}

#[tokio::test]
async fn audio_is_transcoded_to_m4a_when_enabled() {
    let mut app = setup_test_app_with(TestOptions {
        transcode_audio: true,
        ..TestOptions::default()
    })
    .await;

    let trigger = app
        .trigger
        .mock("POST", TRIGGER_PATH)
        .match_body(Matcher::PartialJson(json!({"contentType": "audio/mp4"})))
        .with_status(204)
        .create_async()
        .await;

    let form = MultipartForm::new()
        .add_part("audio", media_part(vec![5u8; 4096], "memo.webm", "audio/webm"));

    let response = app.client().post("/upload-audio").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert!(body["audioUrl"].as_str().unwrap().ends_with(".m4a"));
    assert!(body["data"].is_null());

    trigger.assert_async().await;
    assert_eq!(app.temp_entries(), 0);
}

#[tokio::test]
async fn oversized_video_is_rejected_without_storing() {
    let mut app = setup_test_app_with(TestOptions {
        max_video_size_bytes: MIB,
        ..TestOptions::default()
    })
    .await;
    let trigger = app
        .trigger
        .mock("POST", TRIGGER_PATH)
        .expect(0)
        .create_async()
        .await;

    let form = MultipartForm::new()
        .add_part("video", media_part(vec![0u8; 2 * MIB], "big.mp4", "video/mp4"));

    let response = app.client().post("/upload-video").multipart(form).await;

    assert_eq!(response.status_code(), 413);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");
    assert!(app.storage.is_empty());
    assert_eq!(app.temp_entries(), 0);
    trigger.assert_async().await;
}

#[tokio::test]
async fn two_hundred_mib_audio_is_rejected() {
    let mut app = setup_test_app().await;
    let trigger = app
        .trigger
        .mock("POST", TRIGGER_PATH)
        .expect(0)
        .create_async()
        .await;

    let form = MultipartForm::new()
        .add_part("audio", media_part(vec![0u8; 200 * MIB], "long.wav", "audio/wav"));

    let response = app.client().post("/upload-audio").multipart(form).await;

    assert_eq!(response.status_code(), 413);
    assert!(app.storage.is_empty());
    trigger.assert_async().await;
}

#[tokio::test]
async fn mime_mismatch_is_rejected_before_transcoding() {
    // A failing ffmpeg would turn any transcode attempt into a 500.
    let mut app = setup_test_app_with(TestOptions {
        ffmpeg: FakeFfmpeg::Fail,
        ..TestOptions::default()
    })
    .await;
    let trigger = app
        .trigger
        .mock("POST", TRIGGER_PATH)
        .expect(0)
        .create_async()
        .await;

    let form = MultipartForm::new()
        .add_part("video", media_part(vec![1u8; 1024], "song.mp3", "audio/mpeg"));

    let response = app.client().post("/upload-video").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
    assert!(body["error"].as_str().unwrap().contains("audio/mpeg"));
    assert!(app.storage.is_empty());
    trigger.assert_async().await;
}

#[tokio::test]
async fn missing_file_field_is_rejected() {
    let app = setup_test_app().await;

    let form = MultipartForm::new()
        .add_text("loggedInUser", identity())
        .add_part("file", media_part(vec![1u8; 16], "clip.mp4", "video/mp4"));

    let response = app.client().post("/upload-video").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("video"));
    assert!(body["details"].as_str().unwrap().contains("Missing file field"));
}

#[tokio::test]
async fn production_hides_error_details() {
    let app = setup_test_app_with(TestOptions {
        production: true,
        ..TestOptions::default()
    })
    .await;

    let form = MultipartForm::new().add_text("loggedInUser", identity());
    let response = app.client().post("/upload-video").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
    assert!(body["error"].as_str().unwrap().contains("video"));
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn duplicate_file_field_is_rejected() {
    let app = setup_test_app().await;

    let form = MultipartForm::new()
        .add_part("audio", media_part(vec![1u8; 16], "a.mp3", "audio/mpeg"))
        .add_part("audio", media_part(vec![2u8; 16], "b.mp3", "audio/mpeg"));

    let response = app.client().post("/upload-audio").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    assert!(app.storage.is_empty());
}

#[tokio::test]
async fn empty_file_is_rejected() {
    let app = setup_test_app().await;

    let form = MultipartForm::new().add_part("audio", media_part(Vec::new(), "a.mp3", "audio/mpeg"));

    let response = app.client().post("/upload-audio").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    assert!(app.storage.is_empty());
}

#[tokio::test]
async fn malformed_logged_in_user_is_rejected() {
    let app = setup_test_app().await;

    let form = MultipartForm::new()
        .add_text("loggedInUser", "{not json")
        .add_part("audio", media_part(vec![1u8; 16], "a.mp3", "audio/mpeg"));

    let response = app.client().post("/upload-audio").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
    assert!(body["error"].as_str().unwrap().contains("loggedInUser"));
    assert!(app.storage.is_empty());
}

#[tokio::test]
async fn blank_logged_in_user_is_treated_as_absent() {
    let mut app = setup_test_app().await;
    let trigger = app
        .trigger
        .mock("POST", TRIGGER_PATH)
        .match_body(Matcher::PartialJson(json!({"loggedInUser": null})))
        .with_status(200)
        .create_async()
        .await;

    let form = MultipartForm::new()
        .add_text("loggedInUser", "")
        .add_part("audio", media_part(vec![1u8; 16], "a.mp3", "audio/mpeg"));

    let response = app.client().post("/upload-audio").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    trigger.assert_async().await;
}

#[tokio::test]
async fn transcode_failure_stores_nothing_and_cleans_up() {
    let mut app = setup_test_app_with(TestOptions {
        ffmpeg: FakeFfmpeg::Fail,
        ..TestOptions::default()
    })
    .await;
    let trigger = app
        .trigger
        .mock("POST", TRIGGER_PATH)
        .expect(0)
        .create_async()
        .await;

    let form = MultipartForm::new()
        .add_part("video", media_part(vec![1u8; 4096], "clip.webm", "video/webm"));

    let response = app.client().post("/upload-video").multipart(form).await;

    assert_eq!(response.status_code(), 500);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "TRANSCODE_ERROR");
    assert_eq!(body["error"], "Failed to transcode media");
    assert!(app.storage.is_empty());
    assert_eq!(app.temp_entries(), 0);
    trigger.assert_async().await;
}

#[tokio::test]
async fn storage_failure_after_transcode_skips_notification() {
    let mut app = setup_test_app_with(TestOptions {
        failing_storage: true,
        ..TestOptions::default()
    })
    .await;
    let trigger = app
        .trigger
        .mock("POST", TRIGGER_PATH)
        .expect(0)
        .create_async()
        .await;

    let form = MultipartForm::new()
        .add_part("video", media_part(vec![4u8; 4096], "clip.webm", "video/webm"));

    let response = app.client().post("/upload-video").multipart(form).await;

    assert_eq!(response.status_code(), 500);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "STORAGE_ERROR");
    assert_eq!(body["error"], "Failed to store media");
    assert!(body.get("details").is_none());
    assert_eq!(app.temp_entries(), 0);
    trigger.assert_async().await;
}

#[tokio::test]
async fn notification_failure_keeps_stored_object() {
    let mut app = setup_test_app().await;
    let trigger = app
        .trigger
        .mock("POST", TRIGGER_PATH)
        .with_status(502)
        .with_body("upstream down")
        .create_async()
        .await;

    let form = MultipartForm::new()
        .add_part("video", media_part(vec![9u8; 4096], "clip.mp4", "video/mp4"));

    let response = app.client().post("/upload-video").multipart(form).await;

    assert_eq!(response.status_code(), 500);
    let body: Value = response.json();
    assert_eq!(body["code"], "NOTIFICATION_ERROR");

    let keys = app.storage.keys();
    assert_eq!(keys.len(), 1);
    assert_eq!(app.storage.get_object(&keys[0]).await.unwrap().len(), 4096);
    assert_eq!(app.temp_entries(), 0);
    trigger.assert_async().await;
}

#[tokio::test]
async fn non_multipart_body_is_rejected() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/upload-video")
        .json(&json!({"video": "not a file"}))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = setup_test_app().await;

    let form = MultipartForm::new().add_text("loggedInUser", identity());
    let response = app.client().post("/upload-audio").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    assert!(response.headers().get("x-request-id").is_some());
}
