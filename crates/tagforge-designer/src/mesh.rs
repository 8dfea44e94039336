//! # Triangle Mesh Module
//!
//! Indexed triangle meshes used for extruded parts. Vertices are welded on
//! insertion so that extruded solids come out closed and manifold.

use nalgebra::{Point3, Vector3};
use std::collections::HashMap;

/// Vertices closer than this (mm) are welded into one
const WELD_TOLERANCE: f64 = 1e-6;

/// An indexed triangle mesh
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    pub positions: Vec<Point3<f64>>,
    pub normals: Vec<Vector3<f64>>,
    pub triangles: Vec<[u32; 3]>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when there is nothing to draw or export
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.triangles.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Axis-aligned bounds, `None` for an empty mesh
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.positions.first()?;
        let mut min = *first;
        let mut max = *first;
        for p in &self.positions[1..] {
            min = min.inf(p);
            max = max.sup(p);
        }
        Some((min, max))
    }

    /// The three corner positions of triangle `i`
    pub fn triangle(&self, i: usize) -> [Point3<f64>; 3] {
        let [a, b, c] = self.triangles[i];
        [
            self.positions[a as usize],
            self.positions[b as usize],
            self.positions[c as usize],
        ]
    }

    /// Unit normal of triangle `i`, zero for degenerate triangles
    pub fn face_normal(&self, i: usize) -> Vector3<f64> {
        let [a, b, c] = self.triangle(i);
        (b - a)
            .cross(&(c - a))
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vector3::zeros)
    }

    /// Area-weighted vertex normals
    pub fn compute_normals(&mut self) {
        let mut normals = vec![Vector3::zeros(); self.positions.len()];
        for &[a, b, c] in &self.triangles {
            let (pa, pb, pc) = (
                self.positions[a as usize],
                self.positions[b as usize],
                self.positions[c as usize],
            );
            // Cross product length is twice the area, which gives the weighting
            let n = (pb - pa).cross(&(pc - pa));
            for i in [a, b, c] {
                normals[i as usize] += n;
            }
        }
        self.normals = normals
            .into_iter()
            .map(|n| n.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::zeros))
            .collect();
    }

    /// Scale X and Y about the origin, leaving Z (thickness) alone
    pub fn scale_xy(&mut self, factor: f64) {
        for p in &mut self.positions {
            p.x *= factor;
            p.y *= factor;
        }
    }

    /// Enclosed volume by the divergence theorem; positive for outward-facing triangles
    pub fn signed_volume(&self) -> f64 {
        (0..self.triangles.len())
            .map(|i| {
                let [a, b, c] = self.triangle(i);
                a.coords.dot(&b.coords.cross(&c.coords)) / 6.0
            })
            .sum()
    }

    /// Count of edges not shared by exactly two triangles (0 for a closed manifold)
    pub fn open_edge_count(&self) -> usize {
        let mut edges: HashMap<(u32, u32), i32> = HashMap::new();
        for &[a, b, c] in &self.triangles {
            for (u, v) in [(a, b), (b, c), (c, a)] {
                let key = if u < v { (u, v) } else { (v, u) };
                *edges.entry(key).or_insert(0) += 1;
            }
        }
        edges.values().filter(|&&n| n != 2).count()
    }
}

/// Incrementally builds a welded [`Mesh`]
#[derive(Debug, Default)]
pub struct MeshBuilder {
    mesh: Mesh,
    lookup: HashMap<(i64, i64, i64), u32>,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the vertex at `p`, inserting it if no vertex is within tolerance
    pub fn vertex(&mut self, p: Point3<f64>) -> u32 {
        let key = (
            (p.x / WELD_TOLERANCE).round() as i64,
            (p.y / WELD_TOLERANCE).round() as i64,
            (p.z / WELD_TOLERANCE).round() as i64,
        );
        if let Some(&i) = self.lookup.get(&key) {
            return i;
        }
        let i = self.mesh.positions.len() as u32;
        self.mesh.positions.push(p);
        self.lookup.insert(key, i);
        i
    }

    /// Add a triangle; triangles that collapse after welding are dropped
    pub fn triangle(&mut self, a: u32, b: u32, c: u32) {
        if a != b && b != c && a != c {
            self.mesh.triangles.push([a, b, c]);
        }
    }

    pub fn finish(mut self) -> Mesh {
        self.mesh.compute_normals();
        self.mesh
    }
}
