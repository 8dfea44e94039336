//! Measurements taken on finished meshes.

#![allow(dead_code)]

use tagforge_designer::{Assembly, PartRole};

/// Diameter of the mounting hole as cut into the base mesh
///
/// The hole ring's vertices are the base vertices closest to the reported
/// center, so twice that distance is the hole diameter.
pub fn hole_diameter_in_mesh(assembly: &Assembly) -> f64 {
    let hole = assembly.mounting_hole.expect("assembly has a mounting hole");
    let base = assembly.part(PartRole::Base).expect("assembly has a base");
    let nearest = base
        .world_positions()
        .map(|p| (p.x - hole.center.x).hypot(p.y - hole.center.y))
        .fold(f64::INFINITY, f64::min);
    nearest * 2.0
}

/// Volume enclosed by a part's mesh
pub fn part_volume(assembly: &Assembly, role: PartRole) -> f64 {
    assembly
        .part(role)
        .map(|p| p.mesh.signed_volume().abs())
        .unwrap_or(0.0)
}
