//! Unit conversion and target-size fitting.
//!
//! Layout geometry is converted to millimeters by the configured scale with
//! Y flipped (layout Y points down, model Y points up). A target width or
//! height then gives a uniform XY factor `k`. Mounting-hole dimensions are
//! pre-multiplied by a compensation factor `c ≈ 1/k` so the printed hole
//! keeps its configured size.

use crate::font::FontMetrics;
use crate::geometry::{Point, Shape};
use tagforge_core::{GeometryError, UnitScale};
use tracing::{debug, warn};

/// Iteration cap for the hole compensation solver
const MAX_ITERATIONS: usize = 8;
/// Convergence tolerance on `c`
const TOLERANCE: f64 = 1e-9;

/// Convert layout-unit shapes to millimeters, flipping Y
pub fn shapes_to_mm(shapes: &[Shape], scale: &UnitScale) -> Vec<Shape> {
    let mm = scale.mm_per_unit();
    shapes
        .iter()
        .map(|s| s.map(|p| Point::new(p.x * mm, -p.y * mm)))
        .collect()
}

/// Inverse of [`shapes_to_mm`]
pub fn shapes_from_mm(shapes: &[Shape], scale: &UnitScale) -> Vec<Shape> {
    let mm = scale.mm_per_unit();
    shapes
        .iter()
        .map(|s| s.map(|p| Point::new(p.x / mm, -p.y / mm)))
        .collect()
}

/// Convert a single layout point to millimeters
pub fn point_to_mm(p: &Point, scale: &UnitScale) -> Point {
    let mm = scale.mm_per_unit();
    Point::new(p.x * mm, -p.y * mm)
}

/// Ratio `target / current`, or `None` when either side is unusable
pub fn fit_factor(target: f64, current: f64) -> Option<f64> {
    let k = target / current;
    (target.is_finite() && target > 0.0 && current.is_finite() && current > 0.0 && k.is_finite())
        .then_some(k)
}

/// Height in layout units used to fit a target text height
///
/// Prefers the font's reference height (x-height, cap-height, ascender) and
/// falls back to the letter bounding box.
pub fn reference_height(metrics: Option<&FontMetrics>, letter_height: f64) -> f64 {
    match metrics.and_then(FontMetrics::reference_height) {
        Some(h) => h,
        None => {
            if metrics.is_some() {
                warn!("Font has no usable reference height, using the letter bounds");
            }
            letter_height
        }
    }
}

/// Solve `c = width(c) / target` for the hole compensation factor
///
/// `width_at(c)` returns the overall width in mm of the plate built with
/// hole dimensions multiplied by `c`. The first step is a plain fixed-point
/// update, later steps use the secant method; when the hole does not widen
/// the plate this converges after one evaluation.
pub fn solve_hole_compensation<F>(target: f64, mut width_at: F) -> Result<f64, GeometryError>
where
    F: FnMut(f64) -> Result<f64, GeometryError>,
{
    if !(target.is_finite() && target > 0.0) {
        return Err(GeometryError::NonFiniteScale { factor: target });
    }

    let residual = |c: f64, width: f64| width / target - c;

    let mut c0 = 1.0;
    let mut g0 = residual(c0, width_at(c0)?);
    let mut c1 = c0 + g0;

    for iteration in 0..MAX_ITERATIONS {
        if !(c1.is_finite() && c1 > 0.0) {
            return Err(GeometryError::NonFiniteScale { factor: c1 });
        }
        let g1 = residual(c1, width_at(c1)?);
        if g1.abs() < TOLERANCE {
            debug!("Hole compensation {:.6} after {} steps", c1, iteration + 1);
            return Ok(c1);
        }

        let slope = g1 - g0;
        let mut next = if slope.abs() > f64::EPSILON {
            c1 - g1 * (c1 - c0) / slope
        } else {
            c1 + g1
        };
        if !(next.is_finite() && next > 0.0) {
            next = c1 + g1;
        }

        c0 = c1;
        g0 = g1;
        c1 = next;
    }

    warn!(
        "Hole compensation did not settle after {} steps, using {:.6}",
        MAX_ITERATIONS, c1
    );
    Ok(c1)
}
