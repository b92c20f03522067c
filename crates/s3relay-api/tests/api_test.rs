//! HTTP API integration tests.
//!
//! Run with: `cargo test -p s3relay-api --test api_test`

mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use helpers::{admin_path, api_path, create_test_png, setup_test_app, setup_test_app_with_policy};
use s3relay_core::constants::PLUGIN_ID;
use s3relay_core::UploadPolicy;
use s3relay_services::SettingsRepository;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// Counts events that report an `AppError` (they carry an `error_type` field).
#[derive(Clone, Default)]
struct ErrorEventCounter(Arc<AtomicUsize>);

struct HasErrorType(bool);

impl Visit for HasErrorType {
    fn record_debug(&mut self, field: &Field, _value: &dyn std::fmt::Debug) {
        if field.name() == "error_type" {
            self.0 = true;
        }
    }
}

impl<S: Subscriber> Layer<S> for ErrorEventCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = HasErrorType(false);
        event.record(&mut visitor);
        if visitor.0 {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

fn file_form(name: &str, content: Vec<u8>, mime: &str) -> MultipartForm {
    let part = Part::bytes(bytes::Bytes::from(content))
        .file_name(name.to_string())
        .mime_type(mime.to_string());
    MultipartForm::new().add_part("file", part)
}

#[tokio::test]
async fn test_health() {
    let app = setup_test_app(&[]).await;
    let response = app.client().get("/health").await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "alive");
}

#[tokio::test]
async fn test_admin_view_hides_env_only_credentials() {
    let app = setup_test_app(&[("bucket", "b"), ("accessKeyId", "AKIA")]).await;

    let response = app.client().get(&admin_path("")).await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["bucket"], "b");
    assert_eq!(body["region"], "us-east-1");
    assert_eq!(body["accessKeyId"], "AKIA");
    assert_eq!(body["secretAccessKey"], "");
}

#[tokio::test]
async fn test_save_bucket_settings_updates_snapshot() {
    let app = setup_test_app(&[]).await;

    let response = app
        .client()
        .post(&admin_path("/s3settings"))
        .json(&serde_json::json!({
            "bucket": "new-bucket",
            "path": "avatars",
            "acl": "public-read"
        }))
        .await;
    assert_eq!(response.status_code(), 200);
    let message: String = response.json();
    assert_eq!(message, "Saved!");

    let snapshot = app.state.settings.snapshot();
    assert_eq!(snapshot.bucket, "new-bucket");
    assert_eq!(snapshot.path, "avatars");
    assert_eq!(snapshot.acl, "public-read");

    let persisted = app
        .repository
        .get_fields(PLUGIN_ID, &["bucket", "host"])
        .await
        .unwrap();
    assert_eq!(persisted.get("bucket").map(String::as_str), Some("new-bucket"));
    assert_eq!(persisted.get("host").map(String::as_str), Some(""));
}

#[tokio::test]
async fn test_save_credentials_round_trip() {
    let app = setup_test_app(&[]).await;

    let response = app
        .client()
        .post(&admin_path("/credentials"))
        .json(&serde_json::json!({
            "accessKeyId": "AKIA",
            "secretAccessKey": "shh"
        }))
        .await;
    assert_eq!(response.status_code(), 200);

    let view: serde_json::Value = app.client().get(&admin_path("")).await.json();
    assert_eq!(view["accessKeyId"], "AKIA");
    assert_eq!(view["secretAccessKey"], "shh");
}

#[tokio::test]
async fn test_save_settings_rejects_malformed_body() {
    let app = setup_test_app(&[]).await;

    let response = app
        .client()
        .post(&admin_path("/s3settings"))
        .text("{not json")
        .await;
    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_upload_file_multipart() {
    let app = setup_test_app(&[("bucket", "media"), ("host", "cdn.example.com")]).await;

    let response = app
        .client()
        .post(&api_path("/uploads/file"))
        .multipart(file_form("report.pdf", b"%PDF-1.4".to_vec(), "application/pdf"))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: serde_json::Value = response.json();
    assert_eq!(body["name"], "report.pdf");
    let url = body["url"].as_str().unwrap();
    assert!(url.starts_with("http://cdn.example.com/"));
    assert!(url.ends_with(".pdf"));

    let objects = app.store.objects();
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].bucket, "media");
    assert_eq!(objects[0].body.as_ref(), b"%PDF-1.4");
    assert_eq!(objects[0].content_type, "application/pdf");
}

#[tokio::test]
async fn test_upload_file_too_big() {
    let policy = UploadPolicy::new(Vec::<String>::new(), Some(1), 0);
    let app = setup_test_app_with_policy(&[("bucket", "media")], policy).await;

    let response = app
        .client()
        .post(&api_path("/uploads/file"))
        .multipart(file_form("big.txt", vec![b'a'; 2048], "text/plain"))
        .await;
    assert_eq!(response.status_code(), 413);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "[[error:file-too-big, 1]]");
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn test_upload_file_rejects_disallowed_extension() {
    let policy = UploadPolicy::new([".png", ".jpg"], None, 0);
    let app = setup_test_app_with_policy(&[("bucket", "media")], policy).await;

    let response = app
        .client()
        .post(&api_path("/uploads/file"))
        .multipart(file_form("script.exe", b"MZ".to_vec(), "application/octet-stream"))
        .await;
    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "[[error:invalid-file-type, .png&#44; .jpg]]");
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn test_upload_file_without_file_field() {
    let app = setup_test_app(&[("bucket", "media")]).await;

    let form = MultipartForm::new().add_text("note", "no file here");
    let response = app
        .client()
        .post(&api_path("/uploads/file"))
        .multipart(form)
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_upload_image_multipart_is_stored_unchanged() {
    let app = setup_test_app(&[("bucket", "media")]).await;
    let png = create_test_png(40, 20);

    let response = app
        .client()
        .post(&api_path("/uploads/image"))
        .multipart(file_form("photo.png", png.clone(), "image/png"))
        .await;
    assert_eq!(response.status_code(), 200);

    let objects = app.store.objects();
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].body.as_ref(), png.as_slice());
    assert_eq!(objects[0].content_type, "image/png");
}

#[tokio::test]
async fn test_upload_image_from_url_is_resized() {
    let app = setup_test_app(&[("bucket", "media")]).await;
    app.fetcher
        .serve("https://img.example.com/a/avatar.png", create_test_png(300, 150));

    let response = app
        .client()
        .post(&api_path("/uploads/image"))
        .json(&serde_json::json!({
            "url": "https://img.example.com/a/avatar.png",
            "size": 1000
        }))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: serde_json::Value = response.json();
    assert_eq!(body["name"], "avatar.png");
    assert!(body["url"]
        .as_str()
        .unwrap()
        .starts_with("https://media.s3.amazonaws.com/"));

    let objects = app.store.objects();
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].content_type, "image/png");
    let resized = image::load_from_memory(&objects[0].body).unwrap();
    let dimension = app.state.config.upload_policy.profile_image_dimension;
    assert_eq!((resized.width(), resized.height()), (dimension, dimension));
}

#[tokio::test]
async fn test_upload_image_from_url_storage_failure() {
    let app = setup_test_app(&[("bucket", "media")]).await;
    app.fetcher
        .serve("https://img.example.com/avatar.png", create_test_png(10, 10));
    app.store.set_failing(true);

    let response = app
        .client()
        .post(&api_path("/uploads/image"))
        .json(&serde_json::json!({
            "url": "https://img.example.com/avatar.png",
            "size": 10
        }))
        .await;
    assert_eq!(response.status_code(), 502);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "STORAGE_ERROR");
    assert_eq!(body["recoverable"], true);
}

#[tokio::test]
async fn test_failed_upload_is_logged_once() {
    let counter = ErrorEventCounter::default();
    let _guard =
        tracing::subscriber::set_default(tracing_subscriber::registry().with(counter.clone()));

    let app = setup_test_app(&[("bucket", "media")]).await;
    app.store.set_failing(true);

    let response = app
        .client()
        .post(&api_path("/uploads/file"))
        .multipart(file_form("notes.txt", b"hello".to_vec(), "text/plain"))
        .await;
    assert_eq!(response.status_code(), 502);
    assert_eq!(counter.0.load(Ordering::SeqCst), 1);
}
