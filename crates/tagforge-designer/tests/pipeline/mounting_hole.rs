use crate::glyphs::{solid_square, two_letters};
use crate::measure::hole_diameter_in_mesh;
use tagforge_designer::{NametagBuilder, PartRole};
use tagforge_settings::{HolePlacement, HoleSide, MountingHoleConfig, PlateStyle, StyleConfig};

fn config(style: PlateStyle, side: HoleSide, placement: HolePlacement) -> StyleConfig {
    StyleConfig {
        style,
        mounting_hole: MountingHoleConfig {
            enabled: true,
            side,
            placement,
            ..MountingHoleConfig::default()
        },
        ..StyleConfig::default()
    }
}

#[test]
fn test_outside_ear_extends_plate() {
    let plain = NametagBuilder::new()
        .build_from_commands(&two_letters(), None, &StyleConfig::default())
        .unwrap();
    let eared = NametagBuilder::new()
        .build_from_commands(
            &two_letters(),
            None,
            &config(PlateStyle::Raised, HoleSide::Left, HolePlacement::Outside),
        )
        .unwrap();

    // Ring reaches 2 * (3 + 2) - 2 = 8 mm past the plate edge
    let grow = eared.size().unwrap().x - plain.size().unwrap().x;
    assert!((grow - 8.0).abs() < 0.05, "grew by {}", grow);

    let hole = eared.mounting_hole.unwrap();
    assert_eq!(hole.diameter_mm, 6.0);
    assert!((hole_diameter_in_mesh(&eared) - 6.0).abs() < 0.01);
    let (min, _) = eared.bounds().unwrap();
    // Hole center sits one ring radius inside the left edge
    assert!((hole.center.x - (min.x + 5.0)).abs() < 0.05);
    assert!(eared.warnings.is_empty());
}

#[test]
fn test_top_ear_extends_height() {
    let plain = NametagBuilder::new()
        .build_from_commands(&two_letters(), None, &StyleConfig::default())
        .unwrap();
    let eared = NametagBuilder::new()
        .build_from_commands(
            &two_letters(),
            None,
            &config(PlateStyle::Raised, HoleSide::Top, HolePlacement::Outside),
        )
        .unwrap();

    let grow = eared.size().unwrap().y - plain.size().unwrap().y;
    assert!((grow - 8.0).abs() < 0.05);
    let hole = eared.mounting_hole.unwrap();
    let (_, max) = eared.bounds().unwrap();
    assert!((hole.center.y - (max.y - 5.0)).abs() < 0.05);
}

#[test]
fn test_wide_overlap_on_raised_plate_is_reported() {
    let mut cfg = config(PlateStyle::Raised, HoleSide::Right, HolePlacement::Outside);
    cfg.mounting_hole.attach_overlap_mm = 5.0;
    let assembly = NametagBuilder::new()
        .build_from_commands(&two_letters(), None, &cfg)
        .unwrap();
    assert_eq!(assembly.warnings.len(), 1);
    assert!(assembly.part(PartRole::Base).unwrap().has_geometry());
}

#[test]
fn test_inside_hole_keeps_plate_size() {
    let plain = NametagBuilder::new()
        .build_from_commands(&solid_square(0.0, 40.0), None, &StyleConfig {
            outline_margin_mm: 10.0,
            ..StyleConfig::default()
        })
        .unwrap();
    let mut cfg = config(PlateStyle::Raised, HoleSide::Left, HolePlacement::Inside);
    cfg.outline_margin_mm = 10.0;
    let holed = NametagBuilder::new()
        .build_from_commands(&solid_square(0.0, 40.0), None, &cfg)
        .unwrap();

    let (a, b) = (plain.size().unwrap(), holed.size().unwrap());
    assert!((a.x - b.x).abs() < 1e-9);
    assert!((a.y - b.y).abs() < 1e-9);

    // The hole removes a cylinder from the base
    let base_plain = plain.part(PartRole::Base).unwrap().mesh.signed_volume();
    let base_holed = holed.part(PartRole::Base).unwrap().mesh.signed_volume();
    assert!(base_plain - base_holed > 50.0);
    assert!((hole_diameter_in_mesh(&holed) - 6.0).abs() < 0.01);
    assert!(holed.warnings.is_empty());
}

#[test]
fn test_inside_hole_collision_is_only_reported() {
    let mut cfg = config(PlateStyle::Raised, HoleSide::Left, HolePlacement::Inside);
    cfg.outline_margin_mm = 1.0;
    let assembly = NametagBuilder::new()
        .build_from_commands(&two_letters(), None, &cfg)
        .unwrap();
    assert_eq!(assembly.warnings.len(), 1);
    assert!(assembly.mounting_hole.is_some());
}

#[test]
fn test_cutout_inside_hole_pushes_letters_away() {
    let plain = NametagBuilder::new()
        .build_from_commands(
            &two_letters(),
            None,
            &StyleConfig {
                style: PlateStyle::Cutout,
                ..StyleConfig::default()
            },
        )
        .unwrap();
    let holed = NametagBuilder::new()
        .build_from_commands(
            &two_letters(),
            None,
            &config(PlateStyle::Cutout, HoleSide::Right, HolePlacement::Inside),
        )
        .unwrap();

    // Frame grows by the keep-away distance
    let grow = holed.size().unwrap().x - plain.size().unwrap().x;
    assert!((grow - 5.0).abs() < 1e-6);
    assert!(holed.warnings.is_empty());
    assert_eq!(holed.part(PartRole::Base).unwrap().mesh.open_edge_count(), 0);
}
