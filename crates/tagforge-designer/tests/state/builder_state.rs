use crate::glyphs::{metrics, two_letters};
use std::io::Cursor;
use std::sync::Arc;
use tagforge_designer::{BuilderState, ExportFormat};
use tagforge_settings::StyleConfig;

#[test]
fn test_failed_rebuild_keeps_previous_assembly() {
    let mut state = BuilderState::new();
    let first = state
        .rebuild_from_commands(&two_letters(), Some(&metrics()), &StyleConfig::default())
        .unwrap();

    let broken = StyleConfig {
        letter_height_mm: f64::NAN,
        ..StyleConfig::default()
    };
    let err = state
        .rebuild_from_commands(&two_letters(), Some(&metrics()), &broken)
        .unwrap_err();
    assert!(err.is_config_error());

    let current = state.assembly().unwrap();
    assert!(Arc::ptr_eq(&first, &current));
}

#[test]
fn test_empty_outline_keeps_previous_assembly() {
    let mut state = BuilderState::new();
    let first = state
        .rebuild_from_commands(&two_letters(), None, &StyleConfig::default())
        .unwrap();
    assert!(state
        .rebuild_from_commands(&[], None, &StyleConfig::default())
        .is_err());
    assert!(Arc::ptr_eq(&first, &state.assembly().unwrap()));
}

#[test]
fn test_rebuild_replaces_assembly() {
    let mut state = BuilderState::new();
    let first = state
        .rebuild_from_commands(&two_letters(), None, &StyleConfig::default())
        .unwrap();
    let second = state
        .rebuild_from_commands(
            &two_letters(),
            None,
            &StyleConfig {
                outline_margin_mm: 6.0,
                ..StyleConfig::default()
            },
        )
        .unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert!(second.size().unwrap().x > first.size().unwrap().x);
}

#[tokio::test]
async fn test_export_without_assembly_fails() {
    let state = BuilderState::new();
    let err = state.export_3mf().await.unwrap_err();
    assert!(err.is_export_error());
}

#[tokio::test]
async fn test_export_snapshot_is_a_valid_package() {
    let mut state = BuilderState::new();
    state
        .rebuild_from_commands(&two_letters(), None, &StyleConfig::default())
        .unwrap();

    let bytes = state.export_3mf().await.unwrap();
    let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    assert_eq!(archive.len(), 4);

    let stl = state.export(ExportFormat::StlBinary).await.unwrap();
    let mesh = stl_io::read_stl(&mut Cursor::new(stl)).unwrap();
    assert!(!mesh.faces.is_empty());
}
