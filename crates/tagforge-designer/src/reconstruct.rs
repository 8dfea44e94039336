//! Shape reconstruction from polygon trees.

use crate::geometry::{Contour, Shape};
use crate::polygon::{PolyNode, PolygonTree};

fn walk(node: &PolyNode, out: &mut Vec<Shape>) {
    if !node.is_hole {
        let holes = node
            .children
            .iter()
            .filter(|c| c.is_hole)
            .map(|c| c.contour.clone())
            .collect();
        out.push(Shape::new(node.contour.clone(), holes));
    }
    for child in &node.children {
        walk(child, out);
    }
}

/// Flatten a polygon tree into shapes, depth first
///
/// Every outer ring starts a shape whose holes are its direct hole
/// children. Islands found inside those holes become shapes of their own.
pub fn shapes_from_tree(tree: &PolygonTree) -> Vec<Shape> {
    let mut shapes = Vec::new();
    for root in &tree.roots {
        walk(root, &mut shapes);
    }
    shapes
}

/// Rebuild shapes from untagged rings using area and containment alone
pub fn reconstruct_by_area(contours: &[Contour]) -> Vec<Shape> {
    shapes_from_tree(&PolygonTree::from_contours(contours))
}
