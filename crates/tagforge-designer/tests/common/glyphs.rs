//! Synthetic glyph outlines in layout units (Y down, baseline at y = 0).

#![allow(dead_code)]

use tagforge_designer::{FontMetrics, PathCommand, Point};

pub fn rect(commands: &mut Vec<PathCommand>, x0: f64, y0: f64, x1: f64, y1: f64) {
    commands.extend([
        PathCommand::MoveTo(Point::new(x0, y0)),
        PathCommand::LineTo(Point::new(x1, y0)),
        PathCommand::LineTo(Point::new(x1, y1)),
        PathCommand::LineTo(Point::new(x0, y1)),
        PathCommand::Close,
    ]);
}

/// Rectangle traced the other way round, as font counters are
pub fn counter(commands: &mut Vec<PathCommand>, x0: f64, y0: f64, x1: f64, y1: f64) {
    commands.extend([
        PathCommand::MoveTo(Point::new(x0, y0)),
        PathCommand::LineTo(Point::new(x0, y1)),
        PathCommand::LineTo(Point::new(x1, y1)),
        PathCommand::LineTo(Point::new(x1, y0)),
        PathCommand::Close,
    ]);
}

/// A 50 x 70 block glyph at `x` with one rectangular counter
pub fn block_with_counter(x: f64) -> Vec<PathCommand> {
    let mut commands = Vec::new();
    rect(&mut commands, x, -70.0, x + 50.0, 0.0);
    counter(&mut commands, x + 15.0, -55.0, x + 35.0, -25.0);
    commands
}

/// Two glyphs standing in for "AB", each with one counter
pub fn two_letters() -> Vec<PathCommand> {
    let mut commands = block_with_counter(0.0);
    commands.extend(block_with_counter(60.0));
    commands
}

/// A plain square glyph without counters
pub fn solid_square(x: f64, size: f64) -> Vec<PathCommand> {
    let mut commands = Vec::new();
    rect(&mut commands, x, -size, x + size, 0.0);
    commands
}

pub fn metrics() -> FontMetrics {
    FontMetrics {
        units_per_em: 1000.0,
        ascender: 80.0,
        descender: 20.0,
        line_gap: 0.0,
        cap_height: Some(70.0),
        x_height: Some(50.0),
    }
}
