//! Model file export.
//!
//! - `threemf`: multi-part, multi-color 3MF packages
//! - `stl`: single-color binary or ASCII STL

pub mod stl;
pub mod threemf;

pub use stl::{write_stl_ascii, write_stl_binary};
pub use threemf::{model_xml, write_3mf, MODEL_CONTENT_TYPE};

use crate::assembly::Assembly;
use std::fmt;
use std::path::Path;
use tagforge_core::ExportError;
use tracing::info;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    ThreeMf,
    StlBinary,
    StlAscii,
}

impl ExportFormat {
    /// Pick a format from a file extension (`.3mf`, `.stl`)
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "3mf" => Some(Self::ThreeMf),
            "stl" => Some(Self::StlBinary),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::ThreeMf => "3mf",
            Self::StlBinary | Self::StlAscii => "stl",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ThreeMf => write!(f, "3MF"),
            Self::StlBinary => write!(f, "binary STL"),
            Self::StlAscii => write!(f, "ASCII STL"),
        }
    }
}

/// Serialize the assembly in the given format
pub fn export_bytes(assembly: &Assembly, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
    match format {
        ExportFormat::ThreeMf => write_3mf(assembly),
        ExportFormat::StlBinary => write_stl_binary(assembly),
        ExportFormat::StlAscii => write_stl_ascii(assembly, "nametag").map(String::into_bytes),
    }
}

/// Serialize and write to `path`
pub fn export_to_file(
    assembly: &Assembly,
    format: ExportFormat,
    path: &Path,
) -> Result<(), ExportError> {
    let bytes = export_bytes(assembly, format)?;
    std::fs::write(path, &bytes).map_err(|e| ExportError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    info!("Exported {} to {}", format, path.display());
    Ok(())
}
