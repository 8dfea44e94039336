//! Polygon offset/union engine.
//!
//! Offsetting and unioning are delegated to an integer polygon clipper
//! behind the [`PolygonEngine`] trait. Results come back as a
//! [`PolygonTree`] that records which rings are outer boundaries, which are
//! holes and which islands sit inside those holes.

use crate::geometry::{Contour, Point, Shape};
use geo::{Coord as GeoCoord, LineString, MultiPolygon, Polygon as GeoPolygon};
use geo_clipper::{Clipper, EndType, JoinType};
use tracing::debug;

/// Rings below this area (layout units squared) are discarded as degenerate
const MIN_RING_AREA: f64 = 1e-6;

/// Flat set of polygons with holes, as returned by an offset
pub type PolygonSet = Vec<Shape>;

/// One ring in a polygon tree
#[derive(Debug, Clone, PartialEq)]
pub struct PolyNode {
    pub contour: Contour,
    pub is_hole: bool,
    pub children: Vec<PolyNode>,
}

impl PolyNode {
    pub fn new(contour: Contour, is_hole: bool) -> Self {
        Self {
            contour,
            is_hole,
            children: Vec::new(),
        }
    }

    /// Copy of this subtree with every hole flag flipped
    pub fn inverted(&self) -> PolyNode {
        PolyNode {
            contour: self.contour.clone(),
            is_hole: !self.is_hole,
            children: self.children.iter().map(PolyNode::inverted).collect(),
        }
    }

    pub fn translated(&self, dx: f64, dy: f64) -> PolyNode {
        PolyNode {
            contour: self.contour.translated(dx, dy),
            is_hole: self.is_hole,
            children: self
                .children
                .iter()
                .map(|c| c.translated(dx, dy))
                .collect(),
        }
    }

    fn count(&self) -> usize {
        1 + self.children.iter().map(PolyNode::count).sum::<usize>()
    }
}

/// Hierarchy of outer boundaries, holes and islands
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolygonTree {
    pub roots: Vec<PolyNode>,
}

struct ArenaNode {
    contour: Contour,
    is_hole: bool,
    area: f64,
    parent: Option<usize>,
}

fn assemble(arena: &[ArenaNode], parent: Option<usize>) -> Vec<PolyNode> {
    arena
        .iter()
        .enumerate()
        .filter(|(_, n)| n.parent == parent)
        .map(|(i, n)| PolyNode {
            contour: n.contour.clone(),
            is_hole: n.is_hole,
            children: assemble(arena, Some(i)),
        })
        .collect()
}

/// Smallest node passing `filter` whose ring contains `p`
fn smallest_container(
    arena: &[ArenaNode],
    p: &Point,
    filter: impl Fn(&ArenaNode) -> bool,
) -> Option<usize> {
    arena
        .iter()
        .enumerate()
        .filter(|(_, n)| filter(n) && n.contour.contains(p))
        .min_by(|(_, a), (_, b)| a.area.total_cmp(&b.area))
        .map(|(i, _)| i)
}

fn by_area_desc(contours: &mut [Contour]) {
    contours.sort_by(|a, b| b.area().total_cmp(&a.area()));
}

impl PolygonTree {
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of rings in the tree
    pub fn node_count(&self) -> usize {
        self.roots.iter().map(PolyNode::count).sum()
    }

    /// Build a tree from polygons whose holes are already known, hanging
    /// each polygon under the smallest hole that contains it
    pub fn from_polygons(polygons: &[Shape]) -> PolygonTree {
        let mut order: Vec<&Shape> = polygons.iter().collect();
        order.sort_by(|a, b| b.outer.area().total_cmp(&a.outer.area()));

        let mut arena: Vec<ArenaNode> = Vec::new();
        for polygon in order {
            let Some(first) = polygon.outer.points().first() else {
                continue;
            };
            let parent = smallest_container(&arena, first, |n| n.is_hole);
            arena.push(ArenaNode {
                contour: polygon.outer.clone(),
                is_hole: false,
                area: polygon.outer.area(),
                parent,
            });
            let outer_index = arena.len() - 1;
            for hole in &polygon.holes {
                arena.push(ArenaNode {
                    contour: hole.clone(),
                    is_hole: true,
                    area: hole.area(),
                    parent: Some(outer_index),
                });
            }
        }

        PolygonTree {
            roots: assemble(&arena, None),
        }
    }

    /// Build a tree from loose rings using even-odd nesting by area, for
    /// when no clipper tagging is available
    ///
    /// Rings are visited largest first; each becomes a child of the smallest
    /// ring already placed that contains its first point, alternating
    /// between outer and hole with depth.
    pub fn from_contours(contours: &[Contour]) -> PolygonTree {
        let mut sorted: Vec<Contour> = contours
            .iter()
            .filter(|c| c.len() >= 3 && c.area() > MIN_RING_AREA)
            .cloned()
            .collect();
        by_area_desc(&mut sorted);

        let mut arena: Vec<ArenaNode> = Vec::new();
        for contour in sorted {
            let Some(first) = contour.points().first().copied() else {
                continue;
            };
            let parent = smallest_container(&arena, &first, |_| true);
            let is_hole = parent.map(|i| !arena[i].is_hole).unwrap_or(false);
            arena.push(ArenaNode {
                area: contour.area(),
                contour,
                is_hole,
                parent,
            });
        }

        PolygonTree {
            roots: assemble(&arena, None),
        }
    }
}

/// Offset and union operations on closed rings
pub trait PolygonEngine {
    /// Resolve loose rings into polygons with holes by the nonzero winding
    /// rule, merging rings that overlap with the same winding
    fn fill(&self, contours: &[Contour]) -> PolygonSet;

    /// Grow (positive `delta`) or shrink (negative) every ring with round joins
    fn offset(&self, contours: &[Contour], delta: f64) -> PolygonSet;

    /// Merge overlapping polygons into a hole-aware tree
    fn union(&self, polygons: &PolygonSet) -> PolygonTree;
}

/// [`PolygonEngine`] backed by the Clipper integer clipping library
#[derive(Debug, Clone, Copy)]
pub struct ClipperEngine {
    /// Multiplier applied before coordinates are rounded to integers
    pub scale: f64,
    /// Maximum deviation of round joins from the true arc, in layout units
    pub arc_tolerance: f64,
}

impl Default for ClipperEngine {
    fn default() -> Self {
        Self {
            scale: 100.0,
            arc_tolerance: 0.25,
        }
    }
}

fn ring_to_geo(contour: &Contour) -> LineString<f64> {
    LineString::new(
        contour
            .points()
            .iter()
            .map(|p| GeoCoord { x: p.x, y: p.y })
            .collect(),
    )
}

fn shape_to_geo(shape: &Shape) -> GeoPolygon<f64> {
    let normalized = shape.normalized();
    GeoPolygon::new(
        ring_to_geo(&normalized.outer),
        normalized.holes.iter().map(ring_to_geo).collect(),
    )
}

fn geo_to_ring(ring: &LineString<f64>) -> Contour {
    let mut points: Vec<Point> = ring.coords().map(|c| Point::new(c.x, c.y)).collect();
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    Contour::new(points)
}

fn geo_to_shapes(multi: &MultiPolygon<f64>) -> PolygonSet {
    multi
        .0
        .iter()
        .map(|poly| {
            Shape::new(
                geo_to_ring(poly.exterior()),
                poly.interiors()
                    .iter()
                    .map(geo_to_ring)
                    .filter(|h| h.len() >= 3 && h.area() > MIN_RING_AREA)
                    .collect(),
            )
        })
        .filter(|s| s.outer.len() >= 3 && s.outer.area() > MIN_RING_AREA)
        .collect()
}

impl PolygonEngine for ClipperEngine {
    fn fill(&self, contours: &[Contour]) -> PolygonSet {
        // Each ring keeps its own winding; opposite rings cancel into holes
        let rings: Vec<GeoPolygon<f64>> = contours
            .iter()
            .filter(|c| c.len() >= 3 && c.area() > MIN_RING_AREA)
            .map(|c| GeoPolygon::new(ring_to_geo(c), Vec::new()))
            .collect();
        if rings.is_empty() {
            return Vec::new();
        }

        let subject = MultiPolygon::new(rings);
        let none: MultiPolygon<f64> = MultiPolygon::new(Vec::new());
        let shapes = geo_to_shapes(&subject.union(&none, self.scale));
        debug!(
            "Filled {} rings into {} polygons",
            contours.len(),
            shapes.len()
        );
        shapes
    }

    fn offset(&self, contours: &[Contour], delta: f64) -> PolygonSet {
        let grouped = self.fill(contours);
        if grouped.is_empty() {
            return Vec::new();
        }

        let multi = MultiPolygon::new(grouped.iter().map(shape_to_geo).collect());
        let result = multi.offset(
            delta,
            JoinType::Round(self.arc_tolerance),
            EndType::ClosedPolygon,
            self.scale,
        );
        let shapes = geo_to_shapes(&result);
        debug!(
            "Offset {} rings by {:.3}: {} polygons",
            contours.len(),
            delta,
            shapes.len()
        );
        shapes
    }

    fn union(&self, polygons: &PolygonSet) -> PolygonTree {
        let Some((first, rest)) = polygons.split_first() else {
            return PolygonTree::default();
        };

        let merged = if rest.is_empty() {
            vec![first.normalized()]
        } else {
            let subject = MultiPolygon::new(vec![shape_to_geo(first)]);
            let clip = MultiPolygon::new(rest.iter().map(shape_to_geo).collect());
            geo_to_shapes(&subject.union(&clip, self.scale))
        };

        let tree = PolygonTree::from_polygons(&merged);
        debug!(
            "Union of {} polygons: {} rings",
            polygons.len(),
            tree.node_count()
        );
        tree
    }
}
