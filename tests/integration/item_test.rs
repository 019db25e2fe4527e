//! Integration tests for moves, locks and bulk operations across users.

mod helpers;

use bytes::Bytes;
use nexo_core::error::ErrorKind;
use nexo_entity::item::ItemRef;

#[tokio::test]
async fn test_move_folder_into_descendant_rejected() {
    let app = helpers::TestApp::new();
    let ctx = app.create_test_user("ana", "ana@example.com").await;
    let folders = &app.services.folders;
    let items = &app.services.items;

    let a = folders.create(&ctx, None, "A").await.unwrap();
    let b = folders.create(&ctx, Some(a.id), "B").await.unwrap();

    let err = items
        .move_item(&ctx, ItemRef::Folder(a.id), Some(b.id))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    let err = items
        .move_item(&ctx, ItemRef::Folder(a.id), Some(a.id))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    items.move_item(&ctx, ItemRef::Folder(b.id), None).await.unwrap();
    let root = folders.list(&ctx, None).await.unwrap();
    assert_eq!(root.folders.len(), 2);
}

#[tokio::test]
async fn test_move_file_between_folders() {
    let app = helpers::TestApp::new();
    let ctx = app.create_test_user("ana", "ana@example.com").await;
    let folder = app.services.folders.create(&ctx, None, "Inbox").await.unwrap();
    let file = app
        .services
        .uploads
        .upload_bytes(&ctx, None, "note.txt", Bytes::from_static(b"hi"), None, None)
        .await
        .unwrap();

    app.services
        .items
        .move_item(&ctx, ItemRef::File(file.id), Some(folder.id))
        .await
        .unwrap();

    let listing = app.services.folders.list(&ctx, Some(folder.id)).await.unwrap();
    assert_eq!(listing.files.len(), 1);
    assert_eq!(listing.files[0].name, "note.txt");
    assert!(app.services.folders.list(&ctx, None).await.unwrap().files.is_empty());
}

#[tokio::test]
async fn test_non_owner_cannot_relock_private_item() {
    let app = helpers::TestApp::new();
    let ana = app.create_test_user("ana", "ana@example.com").await;
    let bob = app.create_test_user("bob", "bob@example.com").await;
    let folder = app.services.folders.create(&ana, None, "Secret").await.unwrap();
    let item = ItemRef::Folder(folder.id);
    app.services.items.lock(&ana, item).await.unwrap();

    let err = app.services.items.lock(&bob, item).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
    assert!(err.message.contains("ana@example.com"));
    let err = app.services.items.toggle_private(&bob, item).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);

    let row = app.services.folders.get(&ana, folder.id).await.unwrap();
    assert!(row.is_private);
    assert_eq!(row.owner_id, ana.user_id);
}

#[tokio::test]
async fn test_copy_target_is_public_url_for_files() {
    let app = helpers::TestApp::new();
    let ctx = app.create_test_user("ana", "ana@example.com").await;
    let file = app
        .services
        .uploads
        .upload_bytes(&ctx, None, "pic.png", Bytes::from_static(b"png"), None, None)
        .await
        .unwrap();

    let target = app
        .services
        .items
        .copy_target(&ctx, ItemRef::File(file.id))
        .await
        .unwrap();
    assert_eq!(target, file.url);
    assert_eq!(app.backend.object(&target), Some(Bytes::from_static(b"png")));
}
