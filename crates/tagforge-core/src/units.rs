//! Unit conversion utilities
//!
//! Glyph outlines are laid out in "layout units" (an em of
//! [`LAYOUT_EM_SIZE`] units). Physical output is in millimeters; the bridge
//! between the two is a single `mm_per_unit` factor chosen by the user.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Em size, in layout units, that glyphs are laid out at
pub const LAYOUT_EM_SIZE: f64 = 100.0;

/// Default millimeters per layout unit
pub const DEFAULT_MM_PER_UNIT: f64 = 0.25;

/// Conversion between layout units and millimeters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitScale {
    mm_per_unit: f64,
}

impl Default for UnitScale {
    fn default() -> Self {
        Self {
            mm_per_unit: DEFAULT_MM_PER_UNIT,
        }
    }
}

impl UnitScale {
    /// Create a scale, rejecting non-finite or non-positive factors
    pub fn new(mm_per_unit: f64) -> Result<Self, ConfigError> {
        if !is_usable_dimension(mm_per_unit) {
            return Err(ConfigError::invalid(
                "mm_per_unit",
                format!("must be a finite value > 0, got {}", mm_per_unit),
            ));
        }
        Ok(Self { mm_per_unit })
    }

    pub fn mm_per_unit(&self) -> f64 {
        self.mm_per_unit
    }

    /// Convert a length in millimeters to layout units
    pub fn mm_to_units(&self, mm: f64) -> f64 {
        mm / self.mm_per_unit
    }

    /// Convert a length in layout units to millimeters
    pub fn units_to_mm(&self, units: f64) -> f64 {
        units * self.mm_per_unit
    }
}

impl fmt::Display for UnitScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mm/unit", self.mm_per_unit)
    }
}

/// True for finite, strictly positive values
pub fn is_usable_dimension(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Format a length to three decimals, never printing a negative zero
pub fn format_length(value_mm: f64) -> String {
    let formatted = format!("{:.3}", value_mm);
    if formatted == "-0.000" {
        "0.000".to_string()
    } else {
        formatted
    }
}
