use crate::glyphs::{block_with_counter, rect};
use crate::measure::part_volume;
use tagforge_designer::{
    reconstruct_by_area, sample_path, shapes_from_tree, Contour, NametagBuilder, PartRole,
    PathCommand, Point, PolyNode, PolygonTree,
};
use tagforge_settings::StyleConfig;

fn square(x: f64, y: f64, size: f64) -> Contour {
    Contour::new(vec![
        Point::new(x, y),
        Point::new(x + size, y),
        Point::new(x + size, y + size),
        Point::new(x, y + size),
    ])
}

#[test]
fn test_nested_squares_reconstruct_to_one_shape() {
    let outer = square(0.0, 0.0, 10.0).with_orientation(true);
    let inner = square(3.0, 3.0, 4.0).with_orientation(false);
    let tree = PolygonTree {
        roots: vec![PolyNode {
            contour: outer,
            is_hole: false,
            children: vec![PolyNode::new(inner, true)],
        }],
    };

    let shapes = shapes_from_tree(&tree);
    assert_eq!(shapes.len(), 1);
    assert_eq!(shapes[0].holes.len(), 1);
    assert!((shapes[0].holes[0].area() - 16.0).abs() < 1e-9);
}

#[test]
fn test_untagged_rings_classified_by_area() {
    let shapes = reconstruct_by_area(&[square(3.0, 3.0, 4.0), square(0.0, 0.0, 10.0)]);
    assert_eq!(shapes.len(), 1);
    assert!((shapes[0].outer.area() - 100.0).abs() < 1e-9);
    assert!((shapes[0].holes[0].area() - 16.0).abs() < 1e-9);
}

#[test]
fn test_sampler_closes_each_subpath() {
    let p = Point::new;
    let commands = [
        PathCommand::MoveTo(p(0.0, 0.0)),
        PathCommand::LineTo(p(10.0, 0.0)),
        PathCommand::LineTo(p(10.0, 10.0)),
        PathCommand::Close,
        PathCommand::MoveTo(p(2.0, 2.0)),
        PathCommand::LineTo(p(8.0, 2.0)),
        PathCommand::LineTo(p(8.0, 8.0)),
        PathCommand::Close,
    ];
    let contours = sample_path(&commands, 12);
    assert_eq!(contours.len(), 2);
    for contour in &contours {
        let points = contour.points();
        assert!(points.len() >= 3);
        assert_ne!(points.first(), points.last());
    }
}

#[test]
fn test_overlapping_glyph_contours_merge_into_one_solid() {
    // Two contours wound the same way, overlapping by 20 x 30 units
    let mut commands = Vec::new();
    rect(&mut commands, 0.0, -40.0, 40.0, 0.0);
    rect(&mut commands, 20.0, -30.0, 60.0, 10.0);

    let config = StyleConfig::default();
    let assembly = NametagBuilder::new()
        .build_from_commands(&commands, None, &config)
        .unwrap();

    let text = assembly.part(PartRole::Text).unwrap();
    assert_eq!(text.mesh.open_edge_count(), 0);
    // 2600 square units at 0.25 mm per unit
    let expected = 2600.0 * 0.0625 * config.letter_height_mm;
    let volume = part_volume(&assembly, PartRole::Text);
    assert!((volume - expected).abs() < 0.01, "text volume {}", volume);
}

#[test]
fn test_counter_wound_against_outline_stays_open() {
    let config = StyleConfig::default();
    let assembly = NametagBuilder::new()
        .build_from_commands(&block_with_counter(0.0), None, &config)
        .unwrap();

    // 50 x 70 block less its 20 x 30 counter
    let expected = (3500.0 - 600.0) * 0.0625 * config.letter_height_mm;
    let volume = part_volume(&assembly, PartRole::Text);
    assert!((volume - expected).abs() < 0.01, "text volume {}", volume);
}
