//! Nametag assembly pipeline.
//!
//! [`NametagBuilder`] runs the whole text-to-solid chain:
//! sample glyph outlines, merge them into letters, build the plate, fit the
//! requested size, extrude and center. The result is an [`Assembly`] of
//! independently colored parts that share one rigid placement.

use crate::extrude::extrude_shapes;
use crate::font::{FontFace, FontMetrics, LayoutOptions};
use crate::geometry::{contours_bounds, shapes_bounds, Contour, Point};
use crate::mesh::Mesh;
use crate::normalize::{
    fit_factor, point_to_mm, reference_height, shapes_to_mm, solve_hole_compensation,
};
use crate::plate::{build_plate, letter_tree, HoleSpec, PlateLayout, PlateSpec};
use crate::polygon::{ClipperEngine, PolygonEngine, PolygonTree};
use crate::sampler::{sample_path, PathCommand};
use nalgebra::{Point3, Vector3};
use std::fmt;
use tagforge_core::{GeometryError, Result, Rgb, UnitScale};
use tagforge_settings::{StyleConfig, TargetSize};
use tracing::{debug, info, warn};

/// What a part is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartRole {
    Base,
    Text,
    Other,
}

impl fmt::Display for PartRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base => write!(f, "base"),
            Self::Text => write!(f, "text"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// One colored solid of the assembly
///
/// `translation` is a rigid offset applied at export and preview time; the
/// mesh itself stays in its extrusion coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    pub name: String,
    pub role: PartRole,
    pub color: Rgb,
    pub mesh: Mesh,
    pub translation: Vector3<f64>,
}

impl Part {
    pub fn new(name: impl Into<String>, role: PartRole, color: Rgb, mesh: Mesh) -> Self {
        Self {
            name: name.into(),
            role,
            color,
            mesh,
            translation: Vector3::zeros(),
        }
    }

    /// False for placeholder parts such as the cutout style's text
    pub fn has_geometry(&self) -> bool {
        !self.mesh.is_empty()
    }

    /// Vertex positions with the translation applied
    pub fn world_positions(&self) -> impl Iterator<Item = Point3<f64>> + '_ {
        self.mesh.positions.iter().map(move |p| *p + self.translation)
    }

    /// Bounds with the translation applied, `None` when empty
    pub fn world_bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let (min, max) = self.mesh.bounds()?;
        Some((min + self.translation, max + self.translation))
    }
}

/// Final placement of the mounting hole, in mm
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MountingHoleInfo {
    pub center: Point,
    pub diameter_mm: f64,
}

/// A finished nametag
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Assembly {
    pub parts: Vec<Part>,
    pub mounting_hole: Option<MountingHoleInfo>,
    /// Uniform XY factor applied to hit the target size (1.0 when none)
    pub scale_factor: f64,
    /// Factor the hole dimensions were pre-multiplied by
    pub hole_compensation: f64,
    pub warnings: Vec<String>,
}

impl Assembly {
    /// Parts that actually carry triangles
    pub fn solid_parts(&self) -> impl Iterator<Item = &Part> {
        self.parts.iter().filter(|p| p.has_geometry())
    }

    pub fn part(&self, role: PartRole) -> Option<&Part> {
        self.parts.iter().find(|p| p.role == role)
    }

    pub fn has_geometry(&self) -> bool {
        self.solid_parts().next().is_some()
    }

    /// Combined world bounds of all parts with geometry
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        self.solid_parts()
            .filter_map(Part::world_bounds)
            .reduce(|(amin, amax), (bmin, bmax)| (amin.inf(&bmin), amax.sup(&bmax)))
    }

    /// Overall extent in mm
    pub fn size(&self) -> Option<Vector3<f64>> {
        self.bounds().map(|(min, max)| max - min)
    }

    /// Shift every part so the combined bounds are centered on the origin
    pub fn center(&mut self) {
        let Some((min, max)) = self.bounds() else {
            return;
        };
        let shift = -(min.coords + max.coords) * 0.5;
        for part in &mut self.parts {
            part.translation += shift;
        }
        if let Some(hole) = &mut self.mounting_hole {
            hole.center = Point::new(hole.center.x + shift.x, hole.center.y + shift.y);
        }
        debug!(
            "Centered assembly by ({:.3}, {:.3}, {:.3})",
            shift.x, shift.y, shift.z
        );
    }
}

fn plate_spec(config: &StyleConfig, scale: &UnitScale, compensation: f64) -> PlateSpec {
    let units = |mm: f64| scale.mm_to_units(mm);
    let hole = &config.mounting_hole;
    PlateSpec {
        style: config.style,
        margin: units(config.outline_margin_mm),
        corner_radius: units(config.corner_radius_mm),
        keep_away: units(config.keep_away_mm),
        curve_steps: config.curve_steps,
        hole: hole.enabled.then(|| HoleSpec {
            side: hole.side,
            placement: hole.placement,
            radius: units(hole.diameter_mm * 0.5) * compensation,
            ring: units(hole.ring_thickness_mm) * compensation,
            overlap: units(hole.attach_overlap_mm) * compensation,
            // Layout Y points down; a positive shift moves the hole up
            y_shift: -units(hole.y_shift_mm) * compensation,
        }),
    }
}

fn plate_width_mm(layout: &PlateLayout, scale: &UnitScale) -> f64 {
    let bounds = shapes_bounds(&layout.base).union(&shapes_bounds(&layout.text));
    scale.units_to_mm(bounds.width())
}

/// Builds nametag assemblies with a pluggable polygon engine
#[derive(Debug, Clone, Default)]
pub struct NametagBuilder<E: PolygonEngine = ClipperEngine> {
    engine: E,
}

impl NametagBuilder<ClipperEngine> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: PolygonEngine> NametagBuilder<E> {
    pub fn with_engine(engine: E) -> Self {
        Self { engine }
    }

    /// Lay out `config.text` with `font` and build the assembly
    pub fn build(&self, font: &FontFace, config: &StyleConfig) -> Result<Assembly> {
        config.validate()?;
        let scale = config.unit_scale()?;
        let options = LayoutOptions {
            letter_spacing: scale.mm_to_units(config.letter_spacing_mm),
            line_spacing: config.line_spacing,
            align: config.text_align,
        };
        let layout = font.layout(&config.text, &options)?;
        let metrics = font.metrics();
        debug!(
            "Font {}: {} lines, width {:.2} units",
            font.label(),
            layout.line_count,
            layout.width
        );
        self.build_from_commands(&layout.commands, Some(&metrics), config)
    }

    /// Build from already laid-out path commands in layout units
    pub fn build_from_commands(
        &self,
        commands: &[PathCommand],
        metrics: Option<&FontMetrics>,
        config: &StyleConfig,
    ) -> Result<Assembly> {
        config.validate()?;
        let scale = config.unit_scale()?;

        let contours = sample_path(commands, config.curve_steps);
        if contours.is_empty() {
            return Err(GeometryError::EmptyText.into());
        }
        let letters = letter_tree(
            &self.engine,
            &contours,
            scale.mm_to_units(config.stroke_width_mm),
        );
        if letters.is_empty() {
            return Err(GeometryError::NoPlateGeometry {
                reason: "letter outlines produced no polygons".to_string(),
            }
            .into());
        }
        debug!(
            "Sampled {} contours into {} letter rings",
            contours.len(),
            letters.node_count()
        );

        let mut warnings = Vec::new();
        let (compensation, height_factor) =
            self.fit_hole(&letters, metrics, config, &scale, &contours, &mut warnings)?;

        let plate = build_plate(
            &self.engine,
            &letters,
            &contours,
            &plate_spec(config, &scale, compensation),
        )?;
        warnings.extend(plate.warnings.iter().cloned());

        let base_mm = shapes_to_mm(&plate.base, &scale);
        let text_mm = shapes_to_mm(&plate.text, &scale);
        let mut base = extrude_shapes(&base_mm, -config.base_height_mm, 0.0)?;
        let mut text = extrude_shapes(&text_mm, 0.0, config.letter_height_mm)?;
        if base.is_empty() {
            return Err(GeometryError::NoPlateGeometry {
                reason: "plate extrusion is empty".to_string(),
            }
            .into());
        }

        let factor = match config.target_size() {
            Some(TargetSize::Width(target)) => {
                let width = [&base, &text]
                    .into_iter()
                    .filter_map(|m| m.bounds())
                    .map(|(min, max)| (min.x, max.x))
                    .reduce(|a, b| (a.0.min(b.0), a.1.max(b.1)))
                    .map(|(lo, hi)| hi - lo)
                    .unwrap_or(0.0);
                fit_factor(target, width).unwrap_or_else(|| {
                    let msg = format!("Cannot fit width {} mm to a {:.3} mm model", target, width);
                    warn!("{}", msg);
                    warnings.push(msg);
                    1.0
                })
            }
            Some(TargetSize::Height(_)) => height_factor.unwrap_or(1.0),
            None => 1.0,
        };

        if (factor - 1.0).abs() > f64::EPSILON {
            for mesh in [&mut base, &mut text] {
                mesh.scale_xy(factor);
                mesh.compute_normals();
            }
        }

        let mounting_hole = plate.hole.map(|hole| {
            let c = point_to_mm(&hole.center, &scale);
            MountingHoleInfo {
                center: Point::new(c.x * factor, c.y * factor),
                diameter_mm: scale.units_to_mm(hole.radius * 2.0) * factor,
            }
        });

        let mut assembly = Assembly {
            parts: vec![
                Part::new("Base", PartRole::Base, config.base_color, base),
                Part::new("Text", PartRole::Text, config.text_color, text),
            ],
            mounting_hole,
            scale_factor: factor,
            hole_compensation: compensation,
            warnings,
        };
        assembly.center();

        let size = assembly.size().unwrap_or_else(Vector3::zeros);
        info!(
            "Built {} nametag {:.1} x {:.1} x {:.1} mm ({} solid parts, scale {:.4})",
            config.style,
            size.x,
            size.y,
            size.z,
            assembly.solid_parts().count(),
            factor
        );
        Ok(assembly)
    }

    /// Pick the hole compensation factor and, for height targets, the XY factor
    fn fit_hole(
        &self,
        letters: &PolygonTree,
        metrics: Option<&FontMetrics>,
        config: &StyleConfig,
        scale: &UnitScale,
        contours: &[Contour],
        warnings: &mut Vec<String>,
    ) -> Result<(f64, Option<f64>)> {
        match config.target_size() {
            None => Ok((1.0, None)),
            Some(TargetSize::Width(target)) => {
                if !config.mounting_hole.enabled {
                    return Ok((1.0, None));
                }
                let c = solve_hole_compensation(target, |c| {
                    let layout = build_plate(
                        &self.engine,
                        letters,
                        contours,
                        &plate_spec(config, scale, c),
                    )?;
                    Ok(plate_width_mm(&layout, scale))
                })?;
                Ok((c, None))
            }
            Some(TargetSize::Height(target)) => {
                let reference =
                    reference_height(metrics, contours_bounds(contours).height());
                match fit_factor(target, scale.units_to_mm(reference)) {
                    Some(k) => Ok((1.0 / k, Some(k))),
                    None => {
                        let msg = format!(
                            "Cannot fit height {} mm to a reference of {:.3} units",
                            target, reference
                        );
                        warn!("{}", msg);
                        warnings.push(msg);
                        Ok((1.0, None))
                    }
                }
            }
        }
    }
}
