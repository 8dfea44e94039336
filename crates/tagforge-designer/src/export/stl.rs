//! STL export.
//!
//! STL has no notion of parts or colors, so every solid part is merged into
//! one triangle soup with the part translations applied.

use crate::assembly::Assembly;
use nalgebra::{Point3, Vector3};
use std::fmt::{self, Write as _};
use std::io::Cursor;
use stl_io::{Normal, Triangle, Vertex};
use tagforge_core::ExportError;
use tracing::info;

fn facets(assembly: &Assembly) -> Vec<Facet> {
    assembly
        .solid_parts()
        .flat_map(|part| {
            (0..part.mesh.triangle_count()).map(move |i| {
                let [a, b, c] = part.mesh.triangle(i);
                let t = part.translation;
                (part.mesh.face_normal(i), [a + t, b + t, c + t])
            })
        })
        .collect()
}

fn to_f32(p: &Point3<f64>) -> [f32; 3] {
    [p.x as f32, p.y as f32, p.z as f32]
}

/// Binary STL of all solid parts
pub fn write_stl_binary(assembly: &Assembly) -> Result<Vec<u8>, ExportError> {
    let facets = facets(assembly);
    if facets.is_empty() {
        return Err(ExportError::NoGeometry);
    }

    let triangles: Vec<Triangle> = facets
        .iter()
        .map(|(n, corners)| Triangle {
            normal: Normal::new([n.x as f32, n.y as f32, n.z as f32]),
            vertices: corners.map(|p| Vertex::new(to_f32(&p))),
        })
        .collect();

    let mut out = Cursor::new(Vec::new());
    stl_io::write_stl(&mut out, triangles.iter()).map_err(|e| ExportError::Archive {
        reason: e.to_string(),
    })?;
    let bytes = out.into_inner();
    info!("Wrote binary STL: {} facets", triangles.len());
    Ok(bytes)
}

type Facet = (Vector3<f64>, [Point3<f64>; 3]);

fn write_ascii(out: &mut String, name: &str, facets: &[Facet]) -> fmt::Result {
    writeln!(out, "solid {}", name)?;
    for (n, corners) in facets {
        writeln!(out, "  facet normal {:e} {:e} {:e}", n.x, n.y, n.z)?;
        out.push_str("    outer loop\n");
        for p in corners {
            writeln!(out, "      vertex {:e} {:e} {:e}", p.x, p.y, p.z)?;
        }
        out.push_str("    endloop\n  endfacet\n");
    }
    writeln!(out, "endsolid {}", name)
}

/// ASCII STL of all solid parts under the given solid name
pub fn write_stl_ascii(assembly: &Assembly, name: &str) -> Result<String, ExportError> {
    let facets = facets(assembly);
    if facets.is_empty() {
        return Err(ExportError::NoGeometry);
    }

    let name: String = name.chars().filter(|c| !c.is_whitespace()).collect();
    let mut out = String::new();
    write_ascii(&mut out, &name, &facets).map_err(|e| ExportError::Archive {
        reason: e.to_string(),
    })?;

    info!("Wrote ASCII STL: {} facets", facets.len());
    Ok(out)
}
