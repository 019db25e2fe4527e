//! Integration tests for local file and folder uploads.

mod helpers;

use std::sync::Arc;

use nexo_core::config::AppConfig;
use nexo_core::error::ErrorKind;
use nexo_service::UploadProgress;
use nexo_service::file::{LocalFile, collect_folder};
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn test_upload_folder_recreates_structure() {
    let app = helpers::TestApp::new();
    let ctx = app.create_test_user("ana", "ana@example.com").await;
    app.write_file("photos/a.jpg", b"aaaa");
    app.write_file("photos/2024/b.jpg", b"bb");
    app.write_file("photos/2024/c.jpg", b"c");

    let entries = collect_folder(&app.path().join("photos")).unwrap();
    let tracker = Arc::new(UploadProgress::new(7));
    let report = app
        .services
        .uploads
        .upload_folder(&ctx, None, &entries, Some(tracker.clone()), &CancellationToken::new())
        .await
        .unwrap();

    assert!(!report.cancelled);
    assert_eq!(report.files.len(), 3);
    assert_eq!(app.names("folders"), ["2024", "photos"]);
    assert_eq!(tracker.uploaded(), 7);
    assert_eq!(tracker.snapshot().percent, 100);

    let root = app.services.folders.list(&ctx, None).await.unwrap();
    let photos = &root.folders[0];
    let inside = app.services.folders.list(&ctx, Some(photos.id)).await.unwrap();
    assert_eq!(inside.files.len(), 1);
    assert_eq!(inside.folders.len(), 1);
    let nested = app
        .services
        .folders
        .list(&ctx, Some(inside.folders[0].id))
        .await
        .unwrap();
    assert_eq!(nested.files.len(), 2);
    assert_eq!(nested.breadcrumbs.display_path(), "/photos/2024");

    for file in &report.files {
        assert_eq!(file.upload_session.as_deref(), Some(report.session.as_str()));
        assert!(app.backend.object(&file.url).is_some());
    }
}

#[tokio::test]
async fn test_oversized_batch_rejected_before_any_upload() {
    let mut config = AppConfig::default();
    config.upload.max_file_size_bytes = 4;
    let app = helpers::TestApp::with_config(config);
    let ctx = app.create_test_user("ana", "ana@example.com").await;
    let small = LocalFile::from_path(app.write_file("small.txt", b"ok")).unwrap();
    let big = LocalFile::from_path(app.write_file("big.txt", b"too large")).unwrap();
    let before = app.backend.request_count();

    let err = app
        .services
        .uploads
        .upload_files(&ctx, None, &[small, big], None, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(err.message.contains("big.txt"));
    assert_eq!(app.backend.request_count(), before);
    assert!(app.backend.rows("files").is_empty());
}

#[tokio::test]
async fn test_cancelled_batch_stops_before_next_file() {
    let app = helpers::TestApp::new();
    let ctx = app.create_test_user("ana", "ana@example.com").await;
    let file = LocalFile::from_path(app.write_file("one.txt", b"1")).unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let report = app
        .services
        .uploads
        .upload_files(&ctx, None, &[file], None, &cancel)
        .await
        .unwrap();

    assert!(report.cancelled);
    assert!(report.files.is_empty());
    assert!(app.backend.rows("files").is_empty());
}

#[tokio::test]
async fn test_download_returns_uploaded_bytes() {
    let app = helpers::TestApp::new();
    let ctx = app.create_test_user("ana", "ana@example.com").await;
    let file = LocalFile::from_path(app.write_file("report.pdf", b"%PDF-1.7")).unwrap();

    let report = app
        .services
        .uploads
        .upload_files(&ctx, None, &[file], None, &CancellationToken::new())
        .await
        .unwrap();
    let stored = &report.files[0];
    assert_eq!(stored.mime_type, "application/pdf");
    assert!(stored.url.ends_with(".pdf"));

    let (record, body) = app.services.files.download(&ctx, stored.id).await.unwrap();
    assert_eq!(record.name, "report.pdf");
    assert_eq!(&body[..], b"%PDF-1.7");
}
