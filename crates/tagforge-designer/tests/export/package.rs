use crate::glyphs::{solid_square, two_letters};
use std::io::{Cursor, Read};
use tagforge_core::{ExportError, Rgb};
use tagforge_designer::export::threemf::{
    CONTENT_TYPES_PATH, MODEL_PATH, MODEL_RELS_PATH, ROOT_RELS_PATH,
};
use tagforge_designer::{model_xml, write_3mf, Assembly, NametagBuilder, Part, PartRole};
use tagforge_settings::{PlateStyle, StyleConfig};

fn raised() -> Assembly {
    NametagBuilder::new()
        .build_from_commands(&two_letters(), None, &StyleConfig::default())
        .unwrap()
}

fn read_entry(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut file = archive.by_name(name).unwrap();
    let mut text = String::new();
    file.read_to_string(&mut text).unwrap();
    text
}

#[test]
fn test_archive_has_the_four_parts() {
    let bytes = write_3mf(&raised()).unwrap();
    let archive = zip::ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
    let mut names: Vec<&str> = archive.file_names().collect();
    names.sort_unstable();
    assert_eq!(
        names,
        vec![MODEL_PATH, MODEL_RELS_PATH, CONTENT_TYPES_PATH, ROOT_RELS_PATH]
    );

    let rels = read_entry(&bytes, ROOT_RELS_PATH);
    assert!(rels.contains("Target=\"/3D/3dmodel.model\""));
    let types = read_entry(&bytes, CONTENT_TYPES_PATH);
    assert!(types.contains("application/vnd.ms-package.3dmanufacturing-3dmodel+xml"));
}

#[test]
fn test_model_entry_is_deterministic() {
    let assembly = raised();
    let first = write_3mf(&assembly).unwrap();
    let second = write_3mf(&assembly).unwrap();
    assert_eq!(read_entry(&first, MODEL_PATH), read_entry(&second, MODEL_PATH));
    assert_eq!(read_entry(&first, MODEL_PATH), model_xml(&assembly).unwrap());
}

#[test]
fn test_model_header_and_units() {
    let xml = model_xml(&raised()).unwrap();
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.contains("<model unit=\"millimeter\""));
    assert!(xml.contains("<basematerials id=\"1\">"));
    assert!(xml.contains("displaycolor=\"#DDDDDD\""));
    assert!(xml.contains("displaycolor=\"#333333\""));
    assert_eq!(xml.matches("<object ").count(), 2);
    assert_eq!(xml.matches("<item ").count(), 2);
    assert!(xml.contains("<item objectid=\"2\" />"));
    assert!(xml.contains("<item objectid=\"3\" />"));
}

#[test]
fn test_empty_part_is_not_written() {
    let config = StyleConfig {
        style: PlateStyle::Cutout,
        ..StyleConfig::default()
    };
    let assembly = NametagBuilder::new()
        .build_from_commands(&two_letters(), None, &config)
        .unwrap();
    assert_eq!(assembly.parts.len(), 2);

    let xml = model_xml(&assembly).unwrap();
    assert_eq!(xml.matches("<object ").count(), 1);
    assert_eq!(xml.matches("<base ").count(), 1);
}

#[test]
fn test_shared_colors_share_a_material() {
    let source = NametagBuilder::new()
        .build_from_commands(&solid_square(0.0, 40.0), None, &StyleConfig::default())
        .unwrap();
    let mesh = source.part(PartRole::Text).unwrap().mesh.clone();

    let red = Rgb::new(0xC0, 0x10, 0x0A);
    let blue = Rgb::new(0x00, 0x00, 0xFF);
    let assembly = Assembly {
        parts: vec![
            Part::new("One", PartRole::Other, red, mesh.clone()),
            Part::new("Two", PartRole::Other, blue, mesh.clone()),
            Part::new("Three", PartRole::Other, red, mesh),
        ],
        ..Assembly::default()
    };

    let xml = model_xml(&assembly).unwrap();
    assert_eq!(xml.matches("<base ").count(), 2);
    assert!(xml.contains("displaycolor=\"#C0100A\""));
    assert!(xml.contains("name=\"One\" type=\"model\" pid=\"1\" pindex=\"0\""));
    assert!(xml.contains("name=\"Two\" type=\"model\" pid=\"1\" pindex=\"1\""));
    assert!(xml.contains("name=\"Three\" type=\"model\" pid=\"1\" pindex=\"0\""));
}

#[test]
fn test_nothing_to_export() {
    let assembly = Assembly {
        parts: vec![Part::new(
            "Empty",
            PartRole::Text,
            Rgb::new(0, 0, 0),
            Default::default(),
        )],
        ..Assembly::default()
    };
    let err = write_3mf(&assembly).unwrap_err();
    assert_eq!(err, ExportError::NoGeometry);
    assert_eq!(err.to_string(), "No geometry to export");
}
