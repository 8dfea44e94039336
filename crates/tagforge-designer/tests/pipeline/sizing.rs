use crate::glyphs::{metrics, solid_square, two_letters};
use crate::measure::hole_diameter_in_mesh;
use proptest::prelude::*;
use tagforge_designer::{NametagBuilder, PartRole};
use tagforge_settings::{HolePlacement, HoleSide, MountingHoleConfig, PlateStyle, StyleConfig};

fn with_ear(style: PlateStyle, side: HoleSide, placement: HolePlacement) -> StyleConfig {
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
fn test_no_target_keeps_unit_scale() {
    let config = StyleConfig::default();
    let assembly = NametagBuilder::new()
        .build_from_commands(&two_letters(), None, &config)
        .unwrap();
    assert_eq!(assembly.scale_factor, 1.0);
    assert_eq!(assembly.hole_compensation, 1.0);

    // 110 units of text plus 4 mm margin on both sides
    let size = assembly.size().unwrap();
    assert!((size.x - (27.5 + 8.0)).abs() < 0.05);
    assert!((size.z - 5.0).abs() < 1e-9);
}

#[test]
fn test_stroke_widens_text_but_not_plate() {
    let config = StyleConfig {
        stroke_width_mm: 1.0,
        ..StyleConfig::default()
    };
    let assembly = NametagBuilder::new()
        .build_from_commands(&solid_square(0.0, 40.0), None, &config)
        .unwrap();

    // 10 mm glyph plus the 4 mm margin on each side; the stroke adds 1 mm per side to the text only
    let size = assembly.size().unwrap();
    assert!((size.x - 18.0).abs() < 0.05, "plate is {} mm wide", size.x);
    let (min, max) = assembly
        .part(PartRole::Text)
        .unwrap()
        .world_bounds()
        .unwrap();
    assert!((max.x - min.x - 12.0).abs() < 0.05);
}

#[test]
fn test_height_target_uses_font_reference() {
    let config = StyleConfig {
        target_total_height_mm: Some(25.0),
        ..with_ear(PlateStyle::Raised, HoleSide::Left, HolePlacement::Outside)
    };
    let assembly = NametagBuilder::new()
        .build_from_commands(&two_letters(), Some(&metrics()), &config)
        .unwrap();

    // x-height 50 units at 0.25 mm per unit is 12.5 mm
    assert!((assembly.scale_factor - 2.0).abs() < 1e-12);
    let hole = assembly.mounting_hole.unwrap();
    assert!((hole.diameter_mm - 6.0).abs() < 0.01);
    let measured = hole_diameter_in_mesh(&assembly);
    assert!((measured - 6.0).abs() < 0.01, "hole is {} mm", measured);
}

#[test]
fn test_height_target_without_metrics_uses_letter_bounds() {
    let config = StyleConfig {
        target_total_height_mm: Some(35.0),
        ..StyleConfig::default()
    };
    let assembly = NametagBuilder::new()
        .build_from_commands(&two_letters(), None, &config)
        .unwrap();
    // Letters are 70 units = 17.5 mm tall
    assert!((assembly.scale_factor - 2.0).abs() < 1e-12);
}

#[test]
fn test_width_wins_over_height() {
    let config = StyleConfig {
        target_total_width_mm: Some(71.0),
        target_total_height_mm: Some(5.0),
        ..StyleConfig::default()
    };
    let assembly = NametagBuilder::new()
        .build_from_commands(&two_letters(), Some(&metrics()), &config)
        .unwrap();
    assert!((assembly.size().unwrap().x - 71.0).abs() < 0.01);
}

#[test]
fn test_thickness_is_never_scaled() {
    let config = StyleConfig {
        target_total_width_mm: Some(200.0),
        ..StyleConfig::default()
    };
    let assembly = NametagBuilder::new()
        .build_from_commands(&two_letters(), None, &config)
        .unwrap();
    assert!((assembly.size().unwrap().z - 5.0).abs() < 1e-9);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn prop_target_width_is_hit(target in 20.0f64..300.0) {
        let config = StyleConfig {
            target_total_width_mm: Some(target),
            ..with_ear(PlateStyle::Raised, HoleSide::Left, HolePlacement::Outside)
        };
        let assembly = NametagBuilder::new()
            .build_from_commands(&two_letters(), None, &config)
            .unwrap();
        let width = assembly.size().unwrap().x;
        prop_assert!((width - target).abs() < 0.01, "width {} for target {}", width, target);
    }

    #[test]
    fn prop_hole_diameter_survives_width_fit(
        target in 20.0f64..300.0,
        right in any::<bool>(),
        cutout in any::<bool>(),
    ) {
        let side = if right { HoleSide::Right } else { HoleSide::Left };
        let style = if cutout { PlateStyle::Cutout } else { PlateStyle::Raised };
        let config = StyleConfig {
            target_total_width_mm: Some(target),
            ..with_ear(style, side, HolePlacement::Outside)
        };
        let assembly = NametagBuilder::new()
            .build_from_commands(&two_letters(), None, &config)
            .unwrap();
        let hole = assembly.mounting_hole.unwrap();
        prop_assert!((hole.diameter_mm - 6.0).abs() < 0.01);
        let measured = hole_diameter_in_mesh(&assembly);
        prop_assert!((measured - 6.0).abs() < 0.01, "hole is {} mm at k {}", measured, assembly.scale_factor);
        prop_assert!((assembly.size().unwrap().x - target).abs() < 0.01);
    }

    #[test]
    fn prop_hole_diameter_survives_height_fit(target in 8.0f64..30.0) {
        let config = StyleConfig {
            target_total_height_mm: Some(target),
            ..with_ear(PlateStyle::Raised, HoleSide::Top, HolePlacement::Inside)
        };
        let assembly = NametagBuilder::new()
            .build_from_commands(&two_letters(), Some(&metrics()), &config)
            .unwrap();
        let hole = assembly.mounting_hole.unwrap();
        prop_assert!((hole.diameter_mm - 6.0).abs() < 0.01);
        let measured = hole_diameter_in_mesh(&assembly);
        prop_assert!((measured - 6.0).abs() < 0.01, "hole is {} mm at k {}", measured, assembly.scale_factor);
    }
}
