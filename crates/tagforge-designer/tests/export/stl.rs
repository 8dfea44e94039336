use crate::glyphs::two_letters;
use std::io::Cursor;
use tagforge_designer::{
    export_to_file, write_stl_ascii, write_stl_binary, ExportFormat, NametagBuilder,
};
use tagforge_settings::StyleConfig;
use tempfile::TempDir;

#[test]
fn test_binary_stl_merges_solid_parts() {
    let assembly = NametagBuilder::new()
        .build_from_commands(&two_letters(), None, &StyleConfig::default())
        .unwrap();
    let expected: usize = assembly
        .solid_parts()
        .map(|p| p.mesh.triangle_count())
        .sum();

    let bytes = write_stl_binary(&assembly).unwrap();
    let mesh = stl_io::read_stl(&mut Cursor::new(bytes)).unwrap();
    assert_eq!(mesh.faces.len(), expected);

    // Vertices come out centered like the assembly
    let (min, max) = assembly.bounds().unwrap();
    for v in &mesh.vertices {
        assert!(v[0] as f64 >= min.x - 1e-3 && v[0] as f64 <= max.x + 1e-3);
        assert!(v[2] as f64 >= min.z - 1e-3 && v[2] as f64 <= max.z + 1e-3);
    }
}

#[test]
fn test_ascii_stl_facet_count() {
    let assembly = NametagBuilder::new()
        .build_from_commands(&two_letters(), None, &StyleConfig::default())
        .unwrap();
    let expected: usize = assembly
        .solid_parts()
        .map(|p| p.mesh.triangle_count())
        .sum();

    let text = write_stl_ascii(&assembly, "AB").unwrap();
    assert_eq!(text.matches("endfacet").count(), expected);
    let parsed = stl_io::read_stl(&mut Cursor::new(text.into_bytes())).unwrap();
    assert_eq!(parsed.faces.len(), expected);
}

#[test]
fn test_export_to_file_picks_format() {
    let dir = TempDir::new().unwrap();
    let assembly = NametagBuilder::new()
        .build_from_commands(&two_letters(), None, &StyleConfig::default())
        .unwrap();

    let path = dir.path().join("tag.3mf");
    let format = ExportFormat::from_path(&path).unwrap();
    export_to_file(&assembly, format, &path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..2], b"PK");

    let missing = dir.path().join("no/such/dir/tag.stl");
    assert!(export_to_file(&assembly, ExportFormat::StlBinary, &missing).is_err());
}
