//! Font loading and text layout.
//!
//! Wraps `rusttype` to turn a string into path commands laid out at an em
//! size of [`LAYOUT_EM_SIZE`] layout units, baseline at y = 0, Y pointing
//! down. A system face can be located through `fontdb` when no font file is
//! supplied.

use crate::geometry::Point;
use crate::sampler::{CommandRecorder, PathCommand};
use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use rusttype::{Font, GlyphId, Scale};
use std::path::Path;
use std::sync::OnceLock;
use tagforge_core::{FontError, LAYOUT_EM_SIZE};
use tagforge_settings::TextAlign;
use tracing::{debug, warn};

/// Accepted leading signatures: TrueType, CFF, Apple TrueType, collections
const FONT_SIGNATURES: [[u8; 4]; 4] = [
    [0x00, 0x01, 0x00, 0x00],
    *b"OTTO",
    *b"true",
    *b"ttcf",
];

/// Reject buffers that do not start with a TrueType/OpenType signature
pub fn check_font_signature(bytes: &[u8]) -> Result<(), FontError> {
    let head = bytes.get(..4).unwrap_or(bytes);
    if FONT_SIGNATURES.iter().any(|sig| sig[..] == *head) {
        return Ok(());
    }
    Err(FontError::InvalidMagic {
        signature: head
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join(" "),
    })
}

/// Vertical metrics in layout units (Y down, so `descender` is positive below the baseline)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    pub units_per_em: f64,
    pub ascender: f64,
    pub descender: f64,
    pub line_gap: f64,
    pub cap_height: Option<f64>,
    pub x_height: Option<f64>,
}

impl FontMetrics {
    /// Distance between consecutive baselines before the spacing multiplier
    pub fn line_height(&self) -> f64 {
        self.ascender + self.descender + self.line_gap
    }

    /// Height used to fit a target text height: x-height, cap-height, then ascender
    pub fn reference_height(&self) -> Option<f64> {
        self.x_height
            .or(self.cap_height)
            .or(Some(self.ascender))
            .filter(|h| h.is_finite() && *h > 0.0)
    }
}

/// Layout parameters, already converted to layout units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    pub letter_spacing: f64,
    pub line_spacing: f64,
    pub align: TextAlign,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            letter_spacing: 0.0,
            line_spacing: 1.2,
            align: TextAlign::Center,
        }
    }
}

/// Path commands for a laid-out string
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextLayout {
    pub commands: Vec<PathCommand>,
    /// Advance width of the widest line
    pub width: f64,
    pub line_count: usize,
}

/// A parsed font face
pub struct FontFace {
    font: Font<'static>,
    label: String,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("label", &self.label)
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

struct PlacedGlyph {
    id: GlyphId,
    x: f32,
}

impl FontFace {
    /// Parse font bytes after checking the signature
    pub fn from_bytes(bytes: Vec<u8>, label: impl Into<String>) -> Result<Self, FontError> {
        Self::from_bytes_and_index(bytes, 0, label)
    }

    fn from_bytes_and_index(
        bytes: Vec<u8>,
        index: u32,
        label: impl Into<String>,
    ) -> Result<Self, FontError> {
        check_font_signature(&bytes)?;
        let font = Font::try_from_vec_and_index(bytes, index).ok_or_else(|| {
            FontError::Unparseable {
                reason: "font tables could not be read".to_string(),
            }
        })?;
        let face = Self {
            font,
            label: label.into(),
        };
        debug!("Loaded font {:?}", face);
        Ok(face)
    }

    /// Read and parse a font file
    pub fn from_file(path: &Path) -> Result<Self, FontError> {
        let bytes = std::fs::read(path).map_err(|e| FontError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_bytes(bytes, path.display().to_string())
    }

    /// The default sans-serif face of the system
    pub fn system_default() -> Result<Self, FontError> {
        let families = [Family::SansSerif];
        let query = Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };

        let db = font_db();
        let face = db
            .query(&query)
            .and_then(|id| db.face(id))
            .or_else(|| db.faces().next())
            .ok_or(FontError::NoFace)?;

        let label = face
            .families
            .first()
            .map(|(name, _)| format!("system:{}", name))
            .unwrap_or_else(|| "system".to_string());

        let bytes = match &face.source {
            fontdb::Source::File(path) | fontdb::Source::SharedFile(path, _) => {
                std::fs::read(path).map_err(|e| FontError::Io {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?
            }
            fontdb::Source::Binary(bytes) => bytes.as_ref().as_ref().to_vec(),
        };

        Self::from_bytes_and_index(bytes, face.index, label)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn units_per_em(&self) -> f64 {
        self.font.units_per_em() as f64
    }

    /// Layout units per font design unit
    fn unit_factor(&self) -> f64 {
        let upem = self.units_per_em();
        if upem > 0.0 {
            LAYOUT_EM_SIZE / upem
        } else {
            1.0
        }
    }

    /// rusttype scales by line height (ascent - descent), not by em
    fn layout_scale(&self) -> Scale {
        let v = self.font.v_metrics_unscaled();
        let height = (v.ascent - v.descent) as f64 * self.unit_factor();
        let px = if height.is_finite() && height > 0.0 {
            height
        } else {
            LAYOUT_EM_SIZE
        };
        Scale::uniform(px as f32)
    }

    fn glyph_top(&self, c: char, scale: Scale) -> Option<f64> {
        let glyph = self.font.glyph(c);
        if glyph.id().0 == 0 {
            return None;
        }
        let bb = glyph.scaled(scale).exact_bounding_box()?;
        let top = -bb.min.y as f64;
        (top.is_finite() && top > 0.0).then_some(top)
    }

    pub fn metrics(&self) -> FontMetrics {
        let factor = self.unit_factor();
        let v = self.font.v_metrics_unscaled();
        let scale = self.layout_scale();
        FontMetrics {
            units_per_em: self.units_per_em(),
            ascender: v.ascent as f64 * factor,
            descender: -(v.descent as f64) * factor,
            line_gap: v.line_gap as f64 * factor,
            cap_height: self.glyph_top('H', scale),
            x_height: self.glyph_top('x', scale),
        }
    }

    fn place_line(&self, line: &str, scale: Scale, letter_spacing: f32) -> (Vec<PlacedGlyph>, f32) {
        let mut placed = Vec::new();
        let mut x = 0.0f32;
        let mut prev: Option<GlyphId> = None;

        for c in line.chars() {
            let glyph = self.font.glyph(c);
            let id = glyph.id();
            if id.0 == 0 && !c.is_whitespace() {
                warn!("Font {} has no glyph for {:?}, skipping it", self.label, c);
                continue;
            }

            if let Some(prev_id) = prev {
                let kern = self.font.pair_kerning(scale, prev_id, id);
                if kern.is_finite() {
                    x += kern;
                }
            }

            let advance = glyph.scaled(scale).h_metrics().advance_width;
            placed.push(PlacedGlyph { id, x });
            x += if advance.is_finite() { advance } else { 0.0 } + letter_spacing;
            prev = Some(id);
        }

        (placed, x)
    }

    /// Lay out possibly multi-line text into path commands
    pub fn layout(&self, text: &str, options: &LayoutOptions) -> Result<TextLayout, FontError> {
        let scale = self.layout_scale();
        let metrics = self.metrics();
        let pitch = metrics.line_height() * options.line_spacing;
        let letter_spacing = options.letter_spacing as f32;

        let lines: Vec<(Vec<PlacedGlyph>, f32)> = text
            .lines()
            .map(|line| self.place_line(line, scale, letter_spacing))
            .collect();
        let width = lines.iter().map(|(_, w)| *w).fold(0.0f32, f32::max);

        let mut commands = Vec::new();
        for (row, (glyphs, line_width)) in lines.iter().enumerate() {
            let shift = match options.align {
                TextAlign::Left => 0.0,
                TextAlign::Center => (width - line_width) / 2.0,
                TextAlign::Right => width - line_width,
            };
            let baseline = row as f64 * pitch;

            for placed in glyphs {
                let origin = Point::new((placed.x + shift) as f64, baseline);
                let mut recorder = CommandRecorder::with_offset(origin);
                self.font
                    .glyph(placed.id)
                    .scaled(scale)
                    .build_outline(&mut recorder);
                commands.extend(recorder.commands);
            }
        }

        if commands.is_empty() && !text.trim().is_empty() {
            return Err(FontError::NoUsableGlyphs {
                text: text.to_string(),
            });
        }

        debug!(
            "Laid out {} lines, {} path commands, width {:.2}",
            lines.len(),
            commands.len(),
            width
        );

        Ok(TextLayout {
            commands,
            width: width as f64,
            line_count: lines.len(),
        })
    }
}

fn font_db() -> &'static Database {
    static DB: OnceLock<Database> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        db
    })
}
