//! Integration tests for folder browsing and recursive deletion.

mod helpers;

use bytes::Bytes;
use nexo_core::error::ErrorKind;

#[tokio::test]
async fn test_nested_listing_and_breadcrumbs() {
    let app = helpers::TestApp::new();
    let ctx = app.create_test_user("ana", "ana@example.com").await;
    let folders = &app.services.folders;

    let docs = folders.create(&ctx, None, "Docs").await.unwrap();
    let work = folders.create(&ctx, Some(docs.id), "Work").await.unwrap();
    folders.create(&ctx, Some(docs.id), "Archive").await.unwrap();

    let listing = folders.list(&ctx, Some(docs.id)).await.unwrap();
    let names: Vec<_> = listing.folders.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["Archive", "Work"]);
    assert_eq!(listing.breadcrumbs.display_path(), "/Docs");

    let crumbs = folders.breadcrumbs(&ctx, Some(work.id)).await.unwrap();
    assert_eq!(crumbs.display_path(), "/Docs/Work");

    let root = folders.list(&ctx, None).await.unwrap();
    assert_eq!(root.folders.len(), 1);
    assert_eq!(root.breadcrumbs.display_path(), "/");
}

#[tokio::test]
async fn test_blank_folder_name_rejected() {
    let app = helpers::TestApp::new();
    let ctx = app.create_test_user("ana", "ana@example.com").await;

    let err = app.services.folders.create(&ctx, None, "   ").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(app.backend.rows("folders").is_empty());
}

#[tokio::test]
async fn test_delete_removes_whole_subtree() {
    let app = helpers::TestApp::new();
    let ctx = app.create_test_user("ana", "ana@example.com").await;
    let folders = &app.services.folders;
    let uploads = &app.services.uploads;

    let a = folders.create(&ctx, None, "A").await.unwrap();
    let b = folders.create(&ctx, Some(a.id), "B").await.unwrap();
    let c = folders.create(&ctx, Some(b.id), "C").await.unwrap();
    folders.create(&ctx, None, "Keep").await.unwrap();
    for (folder, name) in [(a.id, "a.txt"), (b.id, "b.txt"), (c.id, "c.txt")] {
        uploads
            .upload_bytes(&ctx, Some(folder), name, Bytes::from_static(b"x"), None, None)
            .await
            .unwrap();
    }

    let subtree = folders.collect_subtree(&ctx, a.id).await.unwrap();
    assert_eq!(subtree, vec![a.id, b.id, c.id]);

    let summary = folders.delete(&ctx, a.id).await.unwrap();
    assert_eq!(summary.folders, 3);
    assert_eq!(summary.files, 3);
    assert_eq!(app.names("folders"), ["Keep"]);
    assert!(app.backend.rows("files").is_empty());
}

#[tokio::test]
async fn test_is_within_detects_descendants() {
    let app = helpers::TestApp::new();
    let ctx = app.create_test_user("ana", "ana@example.com").await;
    let folders = &app.services.folders;

    let a = folders.create(&ctx, None, "A").await.unwrap();
    let b = folders.create(&ctx, Some(a.id), "B").await.unwrap();
    let other = folders.create(&ctx, None, "Other").await.unwrap();

    assert!(folders.is_within(&ctx, a.id, b.id).await.unwrap());
    assert!(folders.is_within(&ctx, a.id, a.id).await.unwrap());
    assert!(!folders.is_within(&ctx, b.id, a.id).await.unwrap());
    assert!(!folders.is_within(&ctx, a.id, other.id).await.unwrap());
}
