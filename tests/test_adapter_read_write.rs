mod helpers;

use std::sync::Arc;

use bytes::Bytes;

use helpers::TEST_BUCKET;
use helpers::mock_store::MockStore;
use obsfs::fs::WriteOptions;
use obsfs::types::{FilesystemError, ObsError};
use obsfs::{Filesystem, ObsFilesystem};

fn filesystem(store: Arc<MockStore>) -> ObsFilesystem {
    ObsFilesystem::new(store, TEST_BUCKET, "").unwrap()
}

#[tokio::test]
async fn test_write_then_read() {
    let store = Arc::new(MockStore::new());
    let fs = filesystem(store.clone());

    fs.write(
        "notes/today.txt",
        Bytes::from_static(b"remember the milk"),
        &WriteOptions::default(),
    )
    .await
    .unwrap();

    let contents = fs.read("notes/today.txt").await.unwrap();
    assert_eq!(contents, Bytes::from_static(b"remember the milk"));
}

#[tokio::test]
async fn test_write_applies_prefix() {
    let store = Arc::new(MockStore::new());
    let fs = ObsFilesystem::new(store.clone(), TEST_BUCKET, "uploads").unwrap();

    fs.write("a.txt", Bytes::from_static(b"x"), &WriteOptions::default())
        .await
        .unwrap();

    assert!(store.contains("uploads/a.txt"));
}

#[tokio::test]
async fn test_write_options_become_headers() {
    let store = Arc::new(MockStore::new());
    let fs = filesystem(store.clone());

    let mut options = WriteOptions {
        content_type: Some("text/markdown".to_string()),
        ..Default::default()
    };
    options
        .metadata
        .insert("author".to_string(), "alice".to_string());

    fs.write("readme.md", Bytes::from_static(b"# hi"), &options)
        .await
        .unwrap();

    let headers = store.put_headers.lock().unwrap();
    assert_eq!(headers.len(), 1);
    assert_eq!(headers[0].get("Content-Type").unwrap(), "text/markdown");
    assert_eq!(headers[0].get("x-obs-meta-author").unwrap(), "alice");
}

#[tokio::test]
async fn test_write_failure_is_path_aware() {
    let store = Arc::new(MockStore::new());
    store.fail("put", ObsError::Transport("broken pipe".to_string()));
    let fs = filesystem(store);

    let err = fs
        .write("a.txt", Bytes::from_static(b"x"), &WriteOptions::default())
        .await
        .unwrap_err();

    match err {
        FilesystemError::Write { path, source } => {
            assert_eq!(path, "a.txt");
            assert!(matches!(source, ObsError::Transport(_)));
        }
        other => panic!("expected write error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_read_missing_file_fails() {
    let store = Arc::new(MockStore::new());
    let fs = filesystem(store);

    let err = fs.read("missing.txt").await.unwrap_err();
    match err {
        FilesystemError::Read { path, source } => {
            assert_eq!(path, "missing.txt");
            assert!(matches!(source, ObsError::Remote { status: 404, .. }));
        }
        other => panic!("expected read error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_create_directory_writes_marker() {
    let store = Arc::new(MockStore::new());
    let fs = filesystem(store.clone());

    fs.create_directory("new/dir").await.unwrap();

    assert!(store.contains("new/dir/"));
    let objects = store.objects.lock().unwrap();
    assert!(objects.get("new/dir/").unwrap().data.is_empty());
}

#[tokio::test]
async fn test_create_directory_failure_is_wrapped() {
    let store = Arc::new(MockStore::new());
    store.fail(
        "put",
        ObsError::Remote {
            status: 403,
            body: "AccessDenied".to_string(),
        },
    );
    let fs = filesystem(store);

    assert!(matches!(
        fs.create_directory("dir").await.unwrap_err(),
        FilesystemError::CreateDirectory { .. }
    ));
}
