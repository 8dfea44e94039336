use crate::glyphs::two_letters;
use tagforge_designer::{
    build_plate, letter_tree, sample_path, ClipperEngine, NametagBuilder, PartRole, PlateSpec,
};
use tagforge_settings::{PlateStyle, StyleConfig};

fn cutout_spec() -> PlateSpec {
    // 4 mm margin and 3 mm corners at 0.25 mm per unit
    PlateSpec {
        style: PlateStyle::Cutout,
        margin: 16.0,
        corner_radius: 12.0,
        keep_away: 20.0,
        curve_steps: 16,
        hole: None,
    }
}

#[test]
fn test_two_letters_cut_through_frame() {
    let engine = ClipperEngine::default();
    let contours = sample_path(&two_letters(), 16);
    assert_eq!(contours.len(), 4);

    let letters = letter_tree(&engine, &contours, 0.0);
    let plate = build_plate(&engine, &letters, &[], &cutout_spec()).unwrap();

    // Frame with one hole per letter silhouette, counters as islands
    assert_eq!(plate.base.len(), 3);
    let frame = &plate.base[0];
    assert_eq!(frame.holes.len(), 2);
    for island in &plate.base[1..] {
        assert!(island.holes.is_empty());
        assert!((island.outer.area() - 600.0).abs() < 1e-6);
    }
    assert!(plate.text.is_empty());
}

#[test]
fn test_frame_is_padded_by_margin() {
    let engine = ClipperEngine::default();
    let letters = letter_tree(&engine, &sample_path(&two_letters(), 16), 0.0);
    let plate = build_plate(&engine, &letters, &[], &cutout_spec()).unwrap();

    let b = plate.base[0].bounds();
    assert!((b.min_x + 16.0).abs() < 1e-6);
    assert!((b.max_x - 126.0).abs() < 1e-6);
    assert!((b.min_y + 86.0).abs() < 1e-6);
    assert!((b.max_y - 16.0).abs() < 1e-6);
}

#[test]
fn test_cutout_assembly_is_closed_with_empty_text() {
    let config = StyleConfig {
        style: PlateStyle::Cutout,
        ..StyleConfig::default()
    };
    let assembly = NametagBuilder::new()
        .build_from_commands(&two_letters(), None, &config)
        .unwrap();

    let base = assembly.part(PartRole::Base).unwrap();
    assert_eq!(base.mesh.open_edge_count(), 0);
    assert!(base.mesh.signed_volume() > 0.0);

    let text = assembly.part(PartRole::Text).unwrap();
    assert!(!text.has_geometry());
    assert_eq!(text.mesh.vertex_count(), 0);
}
