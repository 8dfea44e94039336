//! # TagForge Core
//!
//! Core types and utilities for TagForge.
//! Provides the error taxonomy shared by every crate, the conversion
//! between layout units and millimeters, and the color type used for
//! parts and materials.

pub mod color;
pub mod error;
pub mod units;

pub use color::Rgb;

pub use error::{ConfigError, Error, ExportError, FontError, GeometryError, Result};

pub use units::{
    format_length, is_usable_dimension, UnitScale, DEFAULT_MM_PER_UNIT, LAYOUT_EM_SIZE,
};
