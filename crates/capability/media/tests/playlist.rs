use signage_media::{MediaError, MediaLibrary, PLAYLIST_FILE};

#[tokio::test]
async fn build_playlist_filters_sorts_and_terminates_lines() {
    let root = tempfile::tempdir().expect("tempdir");
    let site_dir = root.path().join("acme");
    std::fs::create_dir_all(&site_dir).expect("site dir");
    for name in ["b.png", "a.mp4", "c.jpg", "notes.txt", "clip.MOV"] {
        std::fs::write(site_dir.join(name), b"x").expect("seed file");
    }

    let library = MediaLibrary::new(root.path());
    let entries = library.build_playlist("acme").await.expect("build");

    assert_eq!(entries, vec!["a.mp4", "b.png", "c.jpg", "clip.MOV"]);
    let content = std::fs::read_to_string(site_dir.join(PLAYLIST_FILE)).expect("playlist");
    assert_eq!(content, "a.mp4\nb.png\nc.jpg\nclip.MOV\n");
}

#[tokio::test]
async fn build_playlist_overwrites_previous_content() {
    let root = tempfile::tempdir().expect("tempdir");
    let site_dir = root.path().join("acme");
    std::fs::create_dir_all(&site_dir).expect("site dir");
    std::fs::write(site_dir.join(PLAYLIST_FILE), "stale.mp4\n").expect("stale playlist");
    std::fs::write(site_dir.join("a.mp4"), b"x").expect("seed file");

    let library = MediaLibrary::new(root.path());
    library.build_playlist("acme").await.expect("build");

    let content = std::fs::read_to_string(site_dir.join(PLAYLIST_FILE)).expect("playlist");
    assert_eq!(content, "a.mp4\n");
}

#[tokio::test]
async fn build_playlist_missing_site_is_not_found() {
    let root = tempfile::tempdir().expect("tempdir");
    let library = MediaLibrary::new(root.path());
    let err = library.build_playlist("ghost").await.expect_err("missing site");
    assert!(matches!(err, MediaError::NotFound(_)));
}

#[tokio::test]
async fn read_playlist_skips_blank_lines_and_tolerates_absence() {
    let root = tempfile::tempdir().expect("tempdir");
    let device_dir = root.path().join("acme").join("lobby");
    std::fs::create_dir_all(&device_dir).expect("device dir");
    std::fs::write(device_dir.join(PLAYLIST_FILE), "a.mp4\n\n  \nb.png\n").expect("playlist");

    let library = MediaLibrary::new(root.path());
    let playlist = library.read_playlist("acme", "lobby").await.expect("read");
    assert_eq!(playlist, vec!["a.mp4", "b.png"]);

    let empty = library.read_playlist("acme", "hall").await.expect("read");
    assert!(empty.is_empty());
}
