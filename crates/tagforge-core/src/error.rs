//! Error handling for TagForge
//!
//! Provides error types for every stage of the text-to-solid pipeline:
//! - Font errors (loading and parsing font bytes)
//! - Geometry errors (layout, plate construction, scaling, tessellation)
//! - Export errors (packaging and writing model files)
//! - Config errors (style configuration validation and parsing)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Font error type
///
/// Raised at the font boundary, before any geometry is built.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FontError {
    /// The buffer does not start with a TrueType/OpenType signature
    #[error("Not a TTF/OTF font (signature {signature})")]
    InvalidMagic {
        /// Hex dump of the first bytes that were found.
        signature: String,
    },

    /// The signature matched but the font tables could not be parsed
    #[error("Font could not be parsed: {reason}")]
    Unparseable {
        /// The reason parsing failed.
        reason: String,
    },

    /// Reading the font file failed
    #[error("Failed to read font {path}: {reason}")]
    Io {
        /// The path that was being read.
        path: String,
        /// The underlying I/O failure.
        reason: String,
    },

    /// No usable face is available (no bytes loaded and no fallback face)
    #[error("No usable font face available")]
    NoFace,

    /// Layout produced no outlines for non-blank text
    #[error("Font has no outlines for \"{text}\"")]
    NoUsableGlyphs {
        /// The text that produced no outlines.
        text: String,
    },
}

/// Geometry error type
///
/// Structural failures of a build. "Nothing to draw" edge cases that the
/// pipeline can absorb (an empty text part in cutout style) are not errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// The text to render is empty or whitespace
    #[error("Text is empty")]
    EmptyText,

    /// Offsetting/unioning produced no plate outline at all
    #[error("No plate geometry could be produced: {reason}")]
    NoPlateGeometry {
        /// Why the plate came out empty.
        reason: String,
    },

    /// A bounding box with zero or non-finite extent was found where an area is required
    #[error("Degenerate bounds: {reason}")]
    DegenerateBounds {
        /// Which bounds were degenerate.
        reason: String,
    },

    /// A scale factor came out non-finite or non-positive
    #[error("Invalid scale factor {factor}")]
    NonFiniteScale {
        /// The rejected factor.
        factor: f64,
    },

    /// Cap triangulation failed
    #[error("Tessellation failed: {reason}")]
    Tessellation {
        /// The tessellator's failure message.
        reason: String,
    },
}

/// Export error type
///
/// Represents errors raised while packaging or writing model files.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExportError {
    /// Every part was empty; there is nothing to write
    #[error("No geometry to export")]
    NoGeometry,

    /// The archive writer failed
    #[error("Archive error: {reason}")]
    Archive {
        /// The archive writer's failure message.
        reason: String,
    },

    /// Writing the output failed
    #[error("Failed to write {path}: {reason}")]
    Io {
        /// The destination path.
        path: String,
        /// The underlying I/O failure.
        reason: String,
    },

    /// The export task was dropped before it finished
    #[error("Export cancelled: {reason}")]
    Cancelled {
        /// Why the export stopped.
        reason: String,
    },
}

/// Config error type
///
/// Represents errors related to style configuration files and values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A configuration value is out of its valid range
    #[error("Invalid setting '{key}': {reason}")]
    InvalidValue {
        /// The configuration key.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The configuration file format is not supported
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// The configuration file could not be parsed
    #[error("Invalid config file: {0}")]
    Parse(String),
}

impl ConfigError {
    /// Shorthand for [`ConfigError::InvalidValue`]
    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Main error type for TagForge
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Font error
    #[error(transparent)]
    Font(#[from] FontError),

    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Export error
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Config error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a font error
    pub fn is_font_error(&self) -> bool {
        matches!(self, Error::Font(_))
    }

    /// Check if this is a geometry error
    pub fn is_geometry_error(&self) -> bool {
        matches!(self, Error::Geometry(_))
    }

    /// Check if this is an export error
    pub fn is_export_error(&self) -> bool {
        matches!(self, Error::Export(_))
    }

    /// Check if this is a config error
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::Config(_))
    }

    /// Message suitable for the user-visible status line
    pub fn user_message(&self) -> String {
        match self {
            Error::Font(e) => format!("Font problem: {}", e),
            Error::Geometry(e) => format!("Could not build the model: {}", e),
            Error::Export(e) => format!("Export failed: {}", e),
            Error::Config(e) => format!("Check your settings: {}", e),
            Error::Io(e) => format!("I/O error: {}", e),
            Error::Other(msg) => msg.clone(),
        }
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
