//! Base-plate construction.
//!
//! All work here happens in layout units with Y pointing down, so the top
//! edge of the text is the smallest Y.
//!
//! - Raised: the letters are padded outward by the margin and merged into
//!   one outline plate; the letters themselves become the text part.
//! - Cutout: a rounded rectangle around the letters with every letter
//!   silhouette cut through it. Counters inside the letters stay as
//!   separate islands of plate material.
//!
//! Either style can carry a mounting hole, either in a ring ("ear")
//! attached to the plate edge or cut straight into the plate body.

use crate::geometry::{circle, shapes_bounds, Bounds, Contour, Point, Shape};
use crate::polygon::{PolyNode, PolygonEngine, PolygonTree};
use crate::reconstruct::{reconstruct_by_area, shapes_from_tree};
use crate::sampler::{sample_path, PathCommand};
use tagforge_core::GeometryError;
use tagforge_settings::{HolePlacement, HoleSide, PlateStyle};
use tracing::{debug, warn};

/// Segments used for mounting-hole circles
pub const HOLE_SEGMENTS: usize = 64;

/// Stroke widths below this are treated as no stroke
const STROKE_EPSILON: f64 = 1e-9;

/// Mounting hole parameters in layout units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoleSpec {
    pub side: HoleSide,
    pub placement: HolePlacement,
    pub radius: f64,
    pub ring: f64,
    pub overlap: f64,
    pub y_shift: f64,
}

/// Plate parameters in layout units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlateSpec {
    pub style: PlateStyle,
    pub margin: f64,
    pub corner_radius: f64,
    pub keep_away: f64,
    pub curve_steps: u32,
    pub hole: Option<HoleSpec>,
}

/// Where the mounting hole ended up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedHole {
    pub center: Point,
    pub radius: f64,
}

/// Output of the plate builder
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlateLayout {
    /// Plate shapes (outline or frame, counter islands, ear)
    pub base: Vec<Shape>,
    /// Solid letter shapes; empty in cutout style
    pub text: Vec<Shape>,
    /// Letter bounds before any plate offset
    pub text_bounds: Bounds,
    pub hole: Option<PlacedHole>,
    pub warnings: Vec<String>,
}

/// Merge sampled letter contours into a hole-aware tree, optionally stroked
pub fn letter_tree<E: PolygonEngine + ?Sized>(
    engine: &E,
    contours: &[Contour],
    stroke: f64,
) -> PolygonTree {
    if contours.is_empty() {
        return PolygonTree::default();
    }

    let set = if stroke.abs() < STROKE_EPSILON {
        engine.fill(contours)
    } else {
        engine.offset(contours, stroke)
    };
    let tree = engine.union(&set);

    if tree.is_empty() {
        warn!(
            "Union of {} letter contours came back empty, classifying by area",
            contours.len()
        );
        return PolygonTree::from_contours(contours);
    }
    tree
}

fn rings_of(shapes: &[Shape]) -> Vec<Contour> {
    shapes
        .iter()
        .flat_map(|s| std::iter::once(&s.outer).chain(s.holes.iter()))
        .cloned()
        .collect()
}

/// Rounded rectangle ring with the radius clamped to half the short side
pub fn rounded_rect(bounds: &Bounds, radius: f64, steps: u32) -> Contour {
    let (x, y, w, h) = (bounds.min_x, bounds.min_y, bounds.width(), bounds.height());
    let r = radius.min(w.min(h) * 0.5).max(0.0);
    let p = Point::new;

    let commands = [
        PathCommand::MoveTo(p(x + r, y)),
        PathCommand::LineTo(p(x + w - r, y)),
        PathCommand::QuadTo {
            ctrl: p(x + w, y),
            to: p(x + w, y + r),
        },
        PathCommand::LineTo(p(x + w, y + h - r)),
        PathCommand::QuadTo {
            ctrl: p(x + w, y + h),
            to: p(x + w - r, y + h),
        },
        PathCommand::LineTo(p(x + r, y + h)),
        PathCommand::QuadTo {
            ctrl: p(x, y + h),
            to: p(x, y + h - r),
        },
        PathCommand::LineTo(p(x, y + r)),
        PathCommand::QuadTo {
            ctrl: p(x, y),
            to: p(x + r, y),
        },
        PathCommand::Close,
    ];

    sample_path(&commands, steps)
        .into_iter()
        .next()
        .unwrap_or_default()
}

fn distance_to_segment(p: &Point, a: &Point, b: &Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len2 = dx * dx + dy * dy;
    if len2 <= f64::EPSILON {
        return p.distance_to(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0);
    p.distance_to(&Point::new(a.x + t * dx, a.y + t * dy))
}

/// True if a circle touches or lies inside any of the rings
pub fn circle_hits_rings(center: &Point, radius: f64, rings: &[Contour]) -> bool {
    rings.iter().any(|ring| {
        let pts = ring.points();
        ring.contains(center)
            || (0..pts.len())
                .any(|i| distance_to_segment(center, &pts[i], &pts[(i + 1) % pts.len()]) < radius)
    })
}

fn hole_center(hole: &HoleSpec, plate: &Bounds) -> Point {
    let mid_y = (plate.min_y + plate.max_y) / 2.0 + hole.y_shift;
    let mid_x = (plate.min_x + plate.max_x) / 2.0;
    match hole.placement {
        HolePlacement::Outside => {
            let reach = hole.radius + hole.ring - hole.overlap;
            match hole.side {
                HoleSide::Left => Point::new(plate.min_x - reach, mid_y),
                HoleSide::Right => Point::new(plate.max_x + reach, mid_y),
                HoleSide::Top => Point::new(mid_x, plate.min_y - reach + hole.y_shift),
            }
        }
        HolePlacement::Inside => {
            let inset = hole.ring + hole.radius;
            match hole.side {
                HoleSide::Left => Point::new(plate.min_x + inset, mid_y),
                HoleSide::Right => Point::new(plate.max_x - inset, mid_y),
                HoleSide::Top => Point::new(mid_x, plate.min_y + inset + hole.y_shift),
            }
        }
    }
}

/// Add the mounting hole to `layout.base`, checking it against `letter_rings`
fn add_mounting_hole(
    layout: &mut PlateLayout,
    hole: &HoleSpec,
    plate_bounds: &Bounds,
    letter_rings: &[Contour],
    raised_margin: Option<f64>,
) {
    let center = hole_center(hole, plate_bounds);

    match hole.placement {
        HolePlacement::Outside => {
            if let Some(margin) = raised_margin {
                if hole.overlap > margin {
                    let msg = format!(
                        "Mounting ring overlaps the plate by more than the outline margin ({:.2} > {:.2} units); it may reach the letters",
                        hole.overlap, margin
                    );
                    warn!("{}", msg);
                    layout.warnings.push(msg);
                }
            }
            let ear = Shape::new(
                circle(center, hole.radius + hole.ring, HOLE_SEGMENTS),
                vec![circle(center, hole.radius, HOLE_SEGMENTS).reversed()],
            );
            layout.base.push(ear);
        }
        HolePlacement::Inside => {
            if circle_hits_rings(&center, hole.radius, letter_rings) {
                let msg = "Mounting hole overlaps the letters; move it with the Y shift or enlarge the margin".to_string();
                warn!("{}", msg);
                layout.warnings.push(msg);
            }
            let target = layout
                .base
                .iter_mut()
                .max_by(|a, b| a.outer.area().total_cmp(&b.outer.area()));
            if let Some(shape) = target {
                shape
                    .holes
                    .push(circle(center, hole.radius, HOLE_SEGMENTS).reversed());
            }
        }
    }

    debug!(
        "Mounting hole at ({:.2}, {:.2}) r={:.3}",
        center.x, center.y, hole.radius
    );
    layout.hole = Some(PlacedHole {
        center,
        radius: hole.radius,
    });
}

fn build_raised<E: PolygonEngine + ?Sized>(
    engine: &E,
    letters: &PolygonTree,
    outline: &[Contour],
    spec: &PlateSpec,
) -> Result<PlateLayout, GeometryError> {
    let text = shapes_from_tree(letters);
    // The outline follows the unstroked glyphs
    let rings = if outline.is_empty() {
        rings_of(&text)
    } else {
        outline.to_vec()
    };

    let padded = engine.offset(&rings, spec.margin);
    let mut base = shapes_from_tree(&engine.union(&padded));
    if base.is_empty() && !padded.is_empty() {
        warn!("Plate union came back empty, classifying by area");
        base = reconstruct_by_area(&rings_of(&padded));
    }
    if base.is_empty() {
        return Err(GeometryError::NoPlateGeometry {
            reason: "outline offset produced no polygons".to_string(),
        });
    }

    let plate_bounds = shapes_bounds(&base);
    let letter_outers: Vec<Contour> = text.iter().map(|s| s.outer.clone()).collect();
    let mut layout = PlateLayout {
        base,
        text_bounds: shapes_bounds(&text),
        text,
        hole: None,
        warnings: Vec::new(),
    };

    if let Some(hole) = &spec.hole {
        add_mounting_hole(&mut layout, hole, &plate_bounds, &letter_outers, Some(spec.margin));
    }
    Ok(layout)
}

fn build_cutout(letters: &PolygonTree, spec: &PlateSpec) -> Result<PlateLayout, GeometryError> {
    let original = Bounds::from_points(
        letters
            .roots
            .iter()
            .filter(|n| !n.is_hole)
            .flat_map(|n| n.contour.points()),
    );
    if original.is_empty() {
        return Err(GeometryError::NoPlateGeometry {
            reason: "no letter outlines to cut".to_string(),
        });
    }

    // Letters move away from an inside hole; the frame still encloses both positions
    let (dx, dy) = match spec.hole {
        Some(HoleSpec {
            placement: HolePlacement::Inside,
            side,
            ..
        }) => match side {
            HoleSide::Left => (spec.keep_away, 0.0),
            HoleSide::Right => (-spec.keep_away, 0.0),
            HoleSide::Top => (0.0, spec.keep_away),
        },
        _ => (0.0, 0.0),
    };
    let moved: Vec<PolyNode> = letters.roots.iter().map(|n| n.translated(dx, dy)).collect();
    let text_bounds = Bounds {
        min_x: original.min_x + dx,
        min_y: original.min_y + dy,
        max_x: original.max_x + dx,
        max_y: original.max_y + dy,
    };

    let frame_bounds = original.union(&text_bounds).padded(spec.margin);
    if !(frame_bounds.width() > 0.0 && frame_bounds.height() > 0.0) {
        return Err(GeometryError::DegenerateBounds {
            reason: "cutout frame has no area".to_string(),
        });
    }
    let frame = rounded_rect(&frame_bounds, spec.corner_radius, spec.curve_steps);

    let letter_outers: Vec<Contour> = moved
        .iter()
        .filter(|n| !n.is_hole)
        .map(|n| n.contour.clone())
        .collect();

    let complement = PolygonTree {
        roots: vec![PolyNode {
            contour: frame,
            is_hole: false,
            children: moved.iter().map(PolyNode::inverted).collect(),
        }],
    };

    let mut layout = PlateLayout {
        base: shapes_from_tree(&complement),
        text: Vec::new(),
        text_bounds,
        hole: None,
        warnings: Vec::new(),
    };

    if let Some(hole) = &spec.hole {
        add_mounting_hole(&mut layout, hole, &frame_bounds, &letter_outers, None);
    }
    Ok(layout)
}

/// Build the plate (and text shapes) for the given letters
///
/// `letters` is the merged, possibly stroked letter tree. `outline` holds
/// the sampled glyph contours the raised outline is padded from; when it
/// is empty the letter tree is used instead.
pub fn build_plate<E: PolygonEngine + ?Sized>(
    engine: &E,
    letters: &PolygonTree,
    outline: &[Contour],
    spec: &PlateSpec,
) -> Result<PlateLayout, GeometryError> {
    let layout = match spec.style {
        PlateStyle::Raised => build_raised(engine, letters, outline, spec)?,
        PlateStyle::Cutout => build_cutout(letters, spec)?,
    };
    debug!(
        "{} plate: {} base shapes, {} text shapes",
        spec.style,
        layout.base.len(),
        layout.text.len()
    );
    Ok(layout)
}
