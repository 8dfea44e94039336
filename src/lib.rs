//! # TagForge
//!
//! Parametric nametag and keychain generator. Text is laid out with a
//! TrueType/OpenType font, merged into solid letters, placed on a raised
//! outline plate or cut through a rounded plate, and exported as a
//! multi-color 3MF package or an STL file.
//!
//! ## Architecture
//!
//! TagForge is organized as a workspace with multiple crates:
//!
//! 1. **tagforge-core** - Error types, unit conversion, colors
//! 2. **tagforge-settings** - Style configuration, files and form fields
//! 3. **tagforge-designer** - Geometry pipeline, builder state, exporters
//! 4. **tagforge** - This crate: re-exports, logging and the headless driver

pub mod options;

pub use tagforge_core::{
    ConfigError, Error, ExportError, FontError, GeometryError, Result, Rgb, UnitScale,
};
pub use tagforge_designer as designer;
pub use tagforge_designer::{
    Assembly, BuilderState, ExportFormat, FontFace, MountingHoleInfo, NametagBuilder, Part,
    PartRole,
};
pub use tagforge_settings::{
    HolePlacement, HoleSide, MountingHoleConfig, PlateStyle, StyleConfig, TextAlign,
};

pub use options::DriverOptions;

use std::path::PathBuf;
use tracing::{info, warn};

/// Initialize logging
///
/// Honours `RUST_LOG` (default `info`). Set `TAGFORGE_LOG_FORMAT=json` for
/// one JSON object per line instead of the pretty format.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("TAGFORGE_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .json();
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stdout)
            .with_target(true)
            .with_level(true)
            .with_line_number(true)
            .pretty();
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    }

    Ok(())
}

/// Build one nametag from the driver options and write it out
///
/// Returns the path that was written.
pub async fn run(options: &DriverOptions) -> anyhow::Result<PathBuf> {
    let format = options.format()?;
    let mut config = match &options.style_path {
        Some(path) => StyleConfig::load_from_file(path)?,
        None => StyleConfig::default(),
    };
    if let Some(text) = &options.text {
        config.text = text.clone();
    }

    let mut state = BuilderState::new();
    if let Some(font) = &options.font_path {
        if let Err(e) = state.load_font_file(font).await {
            warn!("{}; using the system font", e);
        }
    }

    let assembly = state.rebuild(&config)?;
    for warning in &assembly.warnings {
        warn!("{}", warning);
    }

    let bytes = state.export(format).await?;
    tokio::fs::write(&options.output, &bytes).await?;
    info!(
        "Wrote {} ({} bytes) to {}",
        format,
        bytes.len(),
        options.output.display()
    );
    Ok(options.output.clone())
}
