//! # 2D Geometry Module
//!
//! Plain 2D primitives shared by every stage of the pipeline: points,
//! closed contours, axis-aligned bounds and shapes with holes.
//!
//! Contours are stored without a repeated closing point; the last point
//! connects back to the first implicitly.

use std::f64::consts::TAU;

/// A 2D point
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// An empty box that any point will expand
    pub const fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Self {
        let mut bounds = Self::empty();
        for p in points {
            bounds.include(p);
        }
        bounds
    }

    pub fn include(&mut self, p: &Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// True when nothing has been included yet
    pub fn is_empty(&self) -> bool {
        !(self.min_x <= self.max_x && self.min_y <= self.max_y)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Grow the box by `margin` on every side
    pub fn padded(&self, margin: f64) -> Bounds {
        Bounds {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::empty()
    }
}

/// A closed polygon ring
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Contour {
    points: Vec<Point>,
}

impl Contour {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Shoelace area, positive for counter-clockwise rings (Y up)
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut sum = 0.0;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            sum += a.x * b.y - b.x * a.y;
        }
        sum / 2.0
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_points(&self.points)
    }

    /// Even-odd ray casting test against this ring
    pub fn contains(&self, p: &Point) -> bool {
        point_in_polygon(p, &self.points)
    }

    pub fn reversed(&self) -> Contour {
        let mut points = self.points.clone();
        points.reverse();
        Contour { points }
    }

    /// Return a copy with the requested winding
    pub fn with_orientation(&self, ccw: bool) -> Contour {
        if self.is_ccw() == ccw {
            self.clone()
        } else {
            self.reversed()
        }
    }

    pub fn map(&self, f: impl Fn(Point) -> Point) -> Contour {
        Contour {
            points: self.points.iter().map(|p| f(*p)).collect(),
        }
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Contour {
        self.map(|p| Point::new(p.x + dx, p.y + dy))
    }
}

impl From<Vec<Point>> for Contour {
    fn from(points: Vec<Point>) -> Self {
        Self::new(points)
    }
}

/// Ray casting: count crossings of a horizontal ray from `p`; odd means inside
pub fn point_in_polygon(p: &Point, ring: &[Point]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (ring[i], ring[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// A regular polygon approximating a circle, counter-clockwise
pub fn circle(center: Point, radius: f64, segments: usize) -> Contour {
    let segments = segments.max(3);
    let points = (0..segments)
        .map(|i| {
            let a = TAU * i as f64 / segments as f64;
            Point::new(center.x + radius * a.cos(), center.y + radius * a.sin())
        })
        .collect();
    Contour::new(points)
}

/// One outer boundary plus the holes cut through it
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Shape {
    pub outer: Contour,
    pub holes: Vec<Contour>,
}

impl Shape {
    pub fn new(outer: Contour, holes: Vec<Contour>) -> Self {
        Self { outer, holes }
    }

    pub fn bounds(&self) -> Bounds {
        self.outer.bounds()
    }

    /// Filled area: outer minus holes
    pub fn area(&self) -> f64 {
        self.outer.area() - self.holes.iter().map(Contour::area).sum::<f64>()
    }

    pub fn map(&self, f: impl Fn(Point) -> Point) -> Shape {
        Shape {
            outer: self.outer.map(&f),
            holes: self.holes.iter().map(|h| h.map(&f)).collect(),
        }
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Shape {
        self.map(|p| Point::new(p.x + dx, p.y + dy))
    }

    /// Copy with the outer counter-clockwise and holes clockwise
    pub fn normalized(&self) -> Shape {
        Shape {
            outer: self.outer.with_orientation(true),
            holes: self.holes.iter().map(|h| h.with_orientation(false)).collect(),
        }
    }
}

/// Combined bounds of every outer boundary
pub fn shapes_bounds(shapes: &[Shape]) -> Bounds {
    shapes
        .iter()
        .fold(Bounds::empty(), |acc, s| acc.union(&s.bounds()))
}

/// Combined bounds of a set of contours
pub fn contours_bounds(contours: &[Contour]) -> Bounds {
    contours
        .iter()
        .fold(Bounds::empty(), |acc, c| acc.union(&c.bounds()))
}
