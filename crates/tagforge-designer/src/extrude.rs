//! Linear extrusion of shapes into closed solids.
//!
//! Caps are triangulated with lyon's fill tessellator (even-odd, so holes
//! stay open); side walls are built per ring edge. Rings are normalized
//! before extrusion (outer counter-clockwise, holes clockwise) so every
//! face ends up pointing out of the solid.

use crate::geometry::{Contour, Point, Shape};
use crate::mesh::{Mesh, MeshBuilder};
use lyon::math::point;
use lyon::path::Path;
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillRule, FillTessellator, FillVertex, VertexBuffers,
};
use nalgebra::Point3;
use tagforge_core::GeometryError;
use tracing::debug;

/// Round every coordinate through f32 so caps and walls share exact positions
fn snap(shape: &Shape) -> Shape {
    shape
        .normalized()
        .map(|p| Point::new(p.x as f32 as f64, p.y as f32 as f64))
}

fn tessellate(shape: &Shape) -> Result<VertexBuffers<[f32; 2], u32>, GeometryError> {
    let mut builder = Path::builder();
    for ring in std::iter::once(&shape.outer).chain(shape.holes.iter()) {
        let mut points = ring.points().iter();
        let Some(first) = points.next() else {
            continue;
        };
        builder.begin(point(first.x as f32, first.y as f32));
        for p in points {
            builder.line_to(point(p.x as f32, p.y as f32));
        }
        builder.close();
    }
    let path = builder.build();

    let mut buffers: VertexBuffers<[f32; 2], u32> = VertexBuffers::new();
    let mut tessellator = FillTessellator::new();
    tessellator
        .tessellate_path(
            &path,
            &FillOptions::default().with_fill_rule(FillRule::EvenOdd),
            &mut BuffersBuilder::new(&mut buffers, |v: FillVertex| v.position().to_array()),
        )
        .map_err(|e| GeometryError::Tessellation {
            reason: format!("{:?}", e),
        })?;
    Ok(buffers)
}

fn add_caps(
    builder: &mut MeshBuilder,
    buffers: &VertexBuffers<[f32; 2], u32>,
    z_bottom: f64,
    z_top: f64,
) {
    for tri in buffers.indices.chunks_exact(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| {
            let v = buffers.vertices[i as usize];
            (v[0] as f64, v[1] as f64)
        });
        let area2 = (b.0 - a.0) * (c.1 - a.1) - (c.0 - a.0) * (b.1 - a.1);
        if area2.abs() < f64::EPSILON {
            continue;
        }
        // Counter-clockwise seen from +Z
        let (a, b, c) = if area2 > 0.0 { (a, b, c) } else { (a, c, b) };

        let top = [a, b, c].map(|(x, y)| builder.vertex(Point3::new(x, y, z_top)));
        builder.triangle(top[0], top[1], top[2]);

        let bottom = [a, b, c].map(|(x, y)| builder.vertex(Point3::new(x, y, z_bottom)));
        builder.triangle(bottom[0], bottom[2], bottom[1]);
    }
}

fn add_walls(builder: &mut MeshBuilder, ring: &Contour, z_bottom: f64, z_top: f64) {
    let points = ring.points();
    let n = points.len();
    for i in 0..n {
        let (p, q) = (points[i], points[(i + 1) % n]);
        let a0 = builder.vertex(Point3::new(p.x, p.y, z_bottom));
        let b0 = builder.vertex(Point3::new(q.x, q.y, z_bottom));
        let b1 = builder.vertex(Point3::new(q.x, q.y, z_top));
        let a1 = builder.vertex(Point3::new(p.x, p.y, z_top));
        builder.triangle(a0, b0, b1);
        builder.triangle(a0, b1, a1);
    }
}

/// Extrude shapes (in mm, Y up) between `z_bottom` and `z_top`
///
/// An empty shape list gives an empty mesh.
pub fn extrude_shapes(shapes: &[Shape], z_bottom: f64, z_top: f64) -> Result<Mesh, GeometryError> {
    if !(z_top - z_bottom).is_finite() || z_top <= z_bottom {
        return Err(GeometryError::DegenerateBounds {
            reason: format!("extrusion range {}..{} is empty", z_bottom, z_top),
        });
    }

    let mut builder = MeshBuilder::new();
    for shape in shapes.iter().filter(|s| s.outer.len() >= 3) {
        let shape = snap(shape);
        let buffers = tessellate(&shape)?;
        add_caps(&mut builder, &buffers, z_bottom, z_top);
        add_walls(&mut builder, &shape.outer, z_bottom, z_top);
        for hole in &shape.holes {
            add_walls(&mut builder, hole, z_bottom, z_top);
        }
    }

    let mesh = builder.finish();
    debug!(
        "Extruded {} shapes: {} vertices, {} triangles",
        shapes.len(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}
