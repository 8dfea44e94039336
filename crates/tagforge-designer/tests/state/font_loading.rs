use tagforge_core::FontError;
use tagforge_designer::{read_font_file, BuilderState};
use tempfile::TempDir;

#[tokio::test]
async fn test_missing_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let err = read_font_file(&dir.path().join("missing.ttf"))
        .await
        .unwrap_err();
    assert!(matches!(err, FontError::Io { .. }));
}

#[tokio::test]
async fn test_non_font_bytes_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("image.ttf");
    std::fs::write(&path, [0x89, b'P', b'N', b'G', 0x0D, 0x0A]).unwrap();

    let mut state = BuilderState::new();
    let err = state.load_font_file(&path).await.unwrap_err();
    assert_eq!(
        err,
        FontError::InvalidMagic {
            signature: "89 50 4E 47".to_string()
        }
    );
    assert!(state.font().is_none());
}

#[tokio::test]
async fn test_stale_load_is_ignored() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.otf");
    std::fs::write(&path, b"OTTO-but-not-really").unwrap();

    let mut state = BuilderState::new();
    let slow = state.begin_font_load();
    let fast = state.begin_font_load();

    // The newer load completes first and fails; the older one is dropped
    let fast_result = read_font_file(&path).await;
    assert!(state.finish_font_load(fast, fast_result).is_err());
    let slow_result = read_font_file(&path).await;
    assert_eq!(state.finish_font_load(slow, slow_result), Ok(false));
}
