//! # Contour Sampler
//!
//! Flattens path commands (move/line/quadratic/cubic/close) into closed
//! polyline contours. Each curve is evaluated at `steps` evenly spaced
//! parameter values in (0, 1]; the start point is never repeated.

use crate::geometry::{Contour, Point};

/// Default number of samples per curve segment
pub const DEFAULT_CURVE_STEPS: u32 = 16;

/// A single path drawing command in layout units
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    QuadTo { ctrl: Point, to: Point },
    CubicTo { ctrl1: Point, ctrl2: Point, to: Point },
    Close,
}

struct SamplerState {
    contours: Vec<Contour>,
    buffer: Vec<Point>,
    pen: Point,
    start: Point,
}

impl SamplerState {
    fn flush(&mut self) {
        let mut points = std::mem::take(&mut self.buffer);
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        if points.len() >= 3 {
            self.contours.push(Contour::new(points));
        }
    }

    fn push(&mut self, p: Point) {
        if self.buffer.is_empty() {
            self.buffer.push(self.pen);
        }
        if self.buffer.last() != Some(&p) {
            self.buffer.push(p);
        }
        self.pen = p;
    }
}

fn quad_point(p0: Point, p1: Point, p2: Point, t: f64) -> Point {
    let u = 1.0 - t;
    Point::new(
        u * u * p0.x + 2.0 * u * t * p1.x + t * t * p2.x,
        u * u * p0.y + 2.0 * u * t * p1.y + t * t * p2.y,
    )
}

fn cubic_point(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    let u = 1.0 - t;
    let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
    Point::new(
        a * p0.x + b * p1.x + c * p2.x + d * p3.x,
        a * p0.y + b * p1.y + c * p2.y + d * p3.y,
    )
}

/// Sample a command list into contours
///
/// Consecutive duplicate points are collapsed, sub-paths with fewer than
/// three points are dropped, and a trailing point equal to the first one is
/// removed.
pub fn sample_path(commands: &[PathCommand], steps: u32) -> Vec<Contour> {
    let steps = steps.max(1);
    let mut state = SamplerState {
        contours: Vec::new(),
        buffer: Vec::new(),
        pen: Point::default(),
        start: Point::default(),
    };

    for command in commands {
        match *command {
            PathCommand::MoveTo(p) => {
                state.flush();
                state.buffer.push(p);
                state.pen = p;
                state.start = p;
            }
            PathCommand::LineTo(p) => state.push(p),
            PathCommand::QuadTo { ctrl, to } => {
                let p0 = state.pen;
                for i in 1..=steps {
                    let t = i as f64 / steps as f64;
                    state.push(quad_point(p0, ctrl, to, t));
                }
            }
            PathCommand::CubicTo { ctrl1, ctrl2, to } => {
                let p0 = state.pen;
                for i in 1..=steps {
                    let t = i as f64 / steps as f64;
                    state.push(cubic_point(p0, ctrl1, ctrl2, to, t));
                }
            }
            PathCommand::Close => {
                state.flush();
                state.pen = state.start;
            }
        }
    }
    state.flush();

    state.contours
}

/// Records outlines emitted by the font rasterizer as path commands
#[derive(Debug, Default)]
pub struct CommandRecorder {
    pub commands: Vec<PathCommand>,
    offset: Point,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorder that shifts every emitted point by `offset`
    pub fn with_offset(offset: Point) -> Self {
        Self {
            commands: Vec::new(),
            offset,
        }
    }

    fn at(&self, x: f32, y: f32) -> Point {
        Point::new(x as f64 + self.offset.x, y as f64 + self.offset.y)
    }
}

impl rusttype::OutlineBuilder for CommandRecorder {
    fn move_to(&mut self, x: f32, y: f32) {
        let p = self.at(x, y);
        self.commands.push(PathCommand::MoveTo(p));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.at(x, y);
        self.commands.push(PathCommand::LineTo(p));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (ctrl, to) = (self.at(x1, y1), self.at(x, y));
        self.commands.push(PathCommand::QuadTo { ctrl, to });
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (ctrl1, ctrl2, to) = (self.at(x1, y1), self.at(x2, y2), self.at(x, y));
        self.commands.push(PathCommand::CubicTo { ctrl1, ctrl2, to });
    }

    fn close(&mut self) {
        self.commands.push(PathCommand::Close);
    }
}
