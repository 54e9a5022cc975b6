use signage_media::{MediaError, MediaLibrary};

#[tokio::test]
async fn save_then_list_then_delete() {
    let root = tempfile::tempdir().expect("tempdir");
    let library = MediaLibrary::new(root.path());

    library
        .save_file("acme", "a.mp4", b"video", false)
        .await
        .expect("save");
    let files = library.list_files("acme").await.expect("list");
    assert_eq!(files, vec!["a.mp4"]);

    library.delete_file("acme", "a.mp4").await.expect("delete");
    assert!(library.list_files("acme").await.expect("list").is_empty());
    // 再删一次：不存在时静默成功
    library.delete_file("acme", "a.mp4").await.expect("delete again");
}

#[tokio::test]
async fn save_without_replace_conflicts() {
    let root = tempfile::tempdir().expect("tempdir");
    let library = MediaLibrary::new(root.path());

    library
        .save_file("acme", "a.mp4", b"v1", false)
        .await
        .expect("save");
    let err = library
        .save_file("acme", "a.mp4", b"v2", false)
        .await
        .expect_err("conflict");
    assert!(matches!(err, MediaError::AlreadyExists(_)));

    library
        .save_file("acme", "a.mp4", b"v2", true)
        .await
        .expect("replace");
}

#[tokio::test]
async fn path_escaping_names_are_rejected() {
    let root = tempfile::tempdir().expect("tempdir");
    let library = MediaLibrary::new(root.path());

    let err = library
        .save_file("acme", "../escape.mp4", b"x", false)
        .await
        .expect_err("escape attempt");
    assert!(matches!(err, MediaError::InvalidName(_)));

    let err = library
        .read_device_file("acme", "", "a.mp4")
        .await
        .expect_err("empty location");
    assert!(matches!(err, MediaError::InvalidName(_)));
}

#[tokio::test]
async fn device_file_read_maps_missing_to_not_found() {
    let root = tempfile::tempdir().expect("tempdir");
    let device_dir = root.path().join("acme").join("lobby");
    std::fs::create_dir_all(&device_dir).expect("device dir");
    std::fs::write(device_dir.join("a.mp4"), b"video").expect("seed");

    let library = MediaLibrary::new(root.path());
    let bytes = library
        .read_device_file("acme", "lobby", "a.mp4")
        .await
        .expect("read");
    assert_eq!(bytes, b"video");

    let err = library
        .read_device_file("acme", "lobby", "ghost.mp4")
        .await
        .expect_err("missing file");
    assert!(matches!(err, MediaError::NotFound(_)));
}

#[tokio::test]
async fn listing_missing_site_is_empty() {
    let root = tempfile::tempdir().expect("tempdir");
    let library = MediaLibrary::new(root.path());
    assert!(library.list_files("ghost").await.expect("list").is_empty());
}
