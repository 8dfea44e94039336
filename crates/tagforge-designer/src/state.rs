//! Builder state owned by the UI layer.
//!
//! Holds the current font, the last font that produced a good build and the
//! last successful [`Assembly`]. Font loads are sequenced with tickets so a
//! slow load that finishes after a newer one cannot replace it.
//!
//! I/O happens on the tokio runtime: font files are read with `tokio::fs`
//! and archives are compressed on a blocking worker.

use crate::assembly::{Assembly, NametagBuilder};
use crate::export::{export_bytes, ExportFormat};
use crate::font::{FontFace, FontMetrics};
use crate::polygon::{ClipperEngine, PolygonEngine};
use crate::sampler::PathCommand;
use std::path::Path;
use std::sync::Arc;
use tagforge_core::{Error, ExportError, FontError, Result};
use tagforge_settings::StyleConfig;
use tracing::{debug, info, warn};

/// Handle for one font load, ordered by issue time
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FontTicket(u64);

/// Read and parse a font file without touching any state
pub async fn read_font_file(path: &Path) -> std::result::Result<FontFace, FontError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| FontError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let label = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    FontFace::from_bytes(bytes, label)
}

/// Mutable state behind an interactive editor
pub struct BuilderState<E: PolygonEngine = ClipperEngine> {
    builder: NametagBuilder<E>,
    font: Option<Arc<FontFace>>,
    last_good_font: Option<Arc<FontFace>>,
    issued: u64,
    installed: u64,
    assembly: Option<Arc<Assembly>>,
}

impl Default for BuilderState<ClipperEngine> {
    fn default() -> Self {
        Self::with_builder(NametagBuilder::new())
    }
}

impl BuilderState<ClipperEngine> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: PolygonEngine> BuilderState<E> {
    pub fn with_builder(builder: NametagBuilder<E>) -> Self {
        Self {
            builder,
            font: None,
            last_good_font: None,
            issued: 0,
            installed: 0,
            assembly: None,
        }
    }

    /// Start a font load; only the newest ticket may install its font
    pub fn begin_font_load(&mut self) -> FontTicket {
        self.issued += 1;
        FontTicket(self.issued)
    }

    /// Finish a load started with [`begin_font_load`](Self::begin_font_load)
    ///
    /// Returns `Ok(false)` when a newer load has been started since; the
    /// result is dropped in that case, even if it is an error.
    pub fn finish_font_load(
        &mut self,
        ticket: FontTicket,
        result: std::result::Result<FontFace, FontError>,
    ) -> std::result::Result<bool, FontError> {
        if ticket.0 < self.issued || ticket.0 <= self.installed {
            warn!(
                "Discarding stale font load #{} (newest is #{})",
                ticket.0, self.issued
            );
            return Ok(false);
        }

        let face = result?;
        info!("Using font {}", face.label());
        self.font = Some(Arc::new(face));
        self.installed = ticket.0;
        Ok(true)
    }

    /// Load a font file and install it if no newer load started meanwhile
    pub async fn load_font_file(&mut self, path: &Path) -> std::result::Result<bool, FontError> {
        let ticket = self.begin_font_load();
        let result = read_font_file(path).await;
        self.finish_font_load(ticket, result)
    }

    pub fn font(&self) -> Option<&FontFace> {
        self.font.as_deref()
    }

    /// The last successfully built assembly
    pub fn assembly(&self) -> Option<Arc<Assembly>> {
        self.assembly.clone()
    }

    fn active_font(&mut self) -> Result<Arc<FontFace>> {
        if let Some(font) = self.font.clone().or_else(|| self.last_good_font.clone()) {
            return Ok(font);
        }
        let face = Arc::new(FontFace::system_default()?);
        info!("No font loaded, falling back to {}", face.label());
        self.font = Some(face.clone());
        Ok(face)
    }

    /// Rebuild the assembly for `config`
    ///
    /// On failure the previous assembly stays installed. A font that cannot
    /// lay out the text is retried once with the last font that worked.
    pub fn rebuild(&mut self, config: &StyleConfig) -> Result<Arc<Assembly>> {
        let font = self.active_font()?;

        let result = match self.builder.build(&font, config) {
            Err(e) if e.is_font_error() => match self.last_good_font.clone() {
                Some(fallback) if !Arc::ptr_eq(&fallback, &font) => {
                    warn!(
                        "Font {} failed ({}), retrying with {}",
                        font.label(),
                        e,
                        fallback.label()
                    );
                    self.builder.build(&fallback, config).map(|mut a| {
                        a.warnings.push(format!(
                            "Font {} could not render the text; used {}",
                            font.label(),
                            fallback.label()
                        ));
                        (a, fallback)
                    })
                }
                _ => Err(e),
            },
            other => other.map(|a| (a, font)),
        };

        let (assembly, used) = self.install(result)?;
        self.last_good_font = Some(used);
        Ok(assembly)
    }

    /// Rebuild from outlines laid out elsewhere, with the same failure rules
    pub fn rebuild_from_commands(
        &mut self,
        commands: &[PathCommand],
        metrics: Option<&FontMetrics>,
        config: &StyleConfig,
    ) -> Result<Arc<Assembly>> {
        let result = self.builder.build_from_commands(commands, metrics, config);
        self.install(result.map(|a| (a, ()))).map(|(a, _)| a)
    }

    fn install<T>(&mut self, result: Result<(Assembly, T)>) -> Result<(Arc<Assembly>, T)> {
        match result {
            Ok((assembly, extra)) => {
                let assembly = Arc::new(assembly);
                self.assembly = Some(assembly.clone());
                debug!("Installed new assembly ({} parts)", assembly.parts.len());
                Ok((assembly, extra))
            }
            Err(e) => {
                warn!("Rebuild failed, keeping previous model: {}", e);
                Err(e)
            }
        }
    }

    /// Serialize a snapshot of the current assembly on a blocking worker
    pub async fn export(&self, format: ExportFormat) -> Result<Vec<u8>> {
        let snapshot = self.assembly.clone().ok_or(ExportError::NoGeometry)?;
        let bytes = tokio::task::spawn_blocking(move || export_bytes(&snapshot, format))
            .await
            .map_err(|e| {
                Error::from(ExportError::Cancelled {
                    reason: e.to_string(),
                })
            })??;
        Ok(bytes)
    }

    /// Package the current assembly as 3MF
    pub async fn export_3mf(&self) -> Result<Vec<u8>> {
        self.export(ExportFormat::ThreeMf).await
    }
}
