//! Style configuration for a single tag build
//!
//! A [`StyleConfig`] captures everything the geometry pipeline needs to turn
//! text into a printable model. It is created per build and never mutated
//! while a build runs.
//!
//! Configuration is organized into:
//! - Plate style and text (content, spacing, alignment, stroke)
//! - Physical dimensions (letter/base heights, margin, unit scale)
//! - Mounting hole settings
//! - Target size and part colors
//!
//! Files are stored as TOML or JSON, chosen by extension.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tagforge_core::{ConfigError, Result, Rgb, UnitScale, DEFAULT_MM_PER_UNIT};
use tracing::debug;

/// How letters relate to the plate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlateStyle {
    /// Letters stand on an outline plate shaped like the padded text
    #[default]
    Raised,
    /// Letters are holes through a rounded-rectangle plate
    Cutout,
}

impl fmt::Display for PlateStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raised => write!(f, "raised"),
            Self::Cutout => write!(f, "cutout"),
        }
    }
}

/// Edge of the plate carrying the mounting hole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HoleSide {
    #[default]
    Left,
    Right,
    Top,
}

impl fmt::Display for HoleSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
            Self::Top => write!(f, "top"),
        }
    }
}

/// Where the mounting hole sits relative to the plate body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HolePlacement {
    /// In a ring ("ear") attached to the plate edge
    #[default]
    Outside,
    /// Cut straight into the plate body
    Inside,
}

impl fmt::Display for HolePlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Outside => write!(f, "outside"),
            Self::Inside => write!(f, "inside"),
        }
    }
}

/// Horizontal alignment of lines relative to the widest line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Mounting hole settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MountingHoleConfig {
    pub enabled: bool,
    pub side: HoleSide,
    pub placement: HolePlacement,
    /// Hole diameter in mm, kept exact through target-size scaling
    pub diameter_mm: f64,
    /// Width of the ring around an outside hole, or wall to the edge for an inside hole
    pub ring_thickness_mm: f64,
    /// How far an outside ring reaches into the plate
    pub attach_overlap_mm: f64,
    /// Vertical offset of the hole center from the plate's middle
    pub y_shift_mm: f64,
}

impl Default for MountingHoleConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            side: HoleSide::Left,
            placement: HolePlacement::Outside,
            diameter_mm: 6.0,
            ring_thickness_mm: 2.0,
            attach_overlap_mm: 2.0,
            y_shift_mm: 0.0,
        }
    }
}

/// Requested overall size of the finished model
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetSize {
    /// Total width of the assembly in mm
    Width(f64),
    /// Reference letter height in mm
    Height(f64),
}

/// Complete style configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub style: PlateStyle,
    pub text: String,
    pub letter_height_mm: f64,
    pub base_height_mm: f64,
    pub outline_margin_mm: f64,
    pub mm_per_unit: f64,
    pub letter_spacing_mm: f64,
    pub line_spacing: f64,
    pub text_align: TextAlign,
    /// Outward stroke applied to letter outlines before building the plate
    pub stroke_width_mm: f64,
    /// Corner radius of the cutout plate
    pub corner_radius_mm: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_total_width_mm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_total_height_mm: Option<f64>,
    pub base_color: Rgb,
    pub text_color: Rgb,
    /// Points sampled per curve segment
    pub curve_steps: u32,
    /// Distance letters are pushed away from an inside hole in cutout style
    pub keep_away_mm: f64,
    pub mounting_hole: MountingHoleConfig,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            style: PlateStyle::Raised,
            text: "Ranchana".to_string(),
            letter_height_mm: 3.0,
            base_height_mm: 2.0,
            outline_margin_mm: 4.0,
            mm_per_unit: DEFAULT_MM_PER_UNIT,
            letter_spacing_mm: 0.0,
            line_spacing: 1.2,
            text_align: TextAlign::Center,
            stroke_width_mm: 0.0,
            corner_radius_mm: 3.0,
            target_total_width_mm: None,
            target_total_height_mm: None,
            base_color: Rgb::new(0xDD, 0xDD, 0xDD),
            text_color: Rgb::new(0x33, 0x33, 0x33),
            curve_steps: 16,
            keep_away_mm: 5.0,
            mounting_hole: MountingHoleConfig::default(),
        }
    }
}

fn require_positive(key: &str, value: f64) -> std::result::Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(key, format!("must be a finite value > 0, got {}", value)))
    }
}

fn require_non_negative(key: &str, value: f64) -> std::result::Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(key, format!("must be a finite value >= 0, got {}", value)))
    }
}

fn require_finite(key: &str, value: f64) -> std::result::Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(key, format!("must be finite, got {}", value)))
    }
}

impl StyleConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Scale between layout units and millimeters
    pub fn unit_scale(&self) -> std::result::Result<UnitScale, ConfigError> {
        UnitScale::new(self.mm_per_unit)
    }

    /// The size target to fit, width first; unusable targets are ignored
    pub fn target_size(&self) -> Option<TargetSize> {
        let usable = |v: &f64| v.is_finite() && *v > 0.0;
        if let Some(w) = self.target_total_width_mm.filter(usable) {
            return Some(TargetSize::Width(w));
        }
        self.target_total_height_mm
            .filter(usable)
            .map(TargetSize::Height)
    }

    /// Validate configuration
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.text.trim().is_empty() {
            return Err(ConfigError::invalid("text", "must not be empty"));
        }

        require_positive("letter_height_mm", self.letter_height_mm)?;
        require_positive("base_height_mm", self.base_height_mm)?;
        require_non_negative("outline_margin_mm", self.outline_margin_mm)?;
        require_positive("mm_per_unit", self.mm_per_unit)?;
        require_finite("letter_spacing_mm", self.letter_spacing_mm)?;
        require_positive("line_spacing", self.line_spacing)?;
        require_non_negative("stroke_width_mm", self.stroke_width_mm)?;
        require_non_negative("corner_radius_mm", self.corner_radius_mm)?;
        require_non_negative("keep_away_mm", self.keep_away_mm)?;

        if self.curve_steps == 0 {
            return Err(ConfigError::invalid("curve_steps", "must be at least 1"));
        }

        if let Some(w) = self.target_total_width_mm {
            require_positive("target_total_width_mm", w)?;
        }
        if let Some(h) = self.target_total_height_mm {
            require_positive("target_total_height_mm", h)?;
        }

        let hole = &self.mounting_hole;
        require_positive("mounting_hole.diameter_mm", hole.diameter_mm)?;
        require_positive("mounting_hole.ring_thickness_mm", hole.ring_thickness_mm)?;
        require_non_negative("mounting_hole.attach_overlap_mm", hole.attach_overlap_mm)?;
        require_finite("mounting_hole.y_shift_mm", hole.y_shift_mm)?;

        Ok(())
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = match extension(path) {
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| ConfigError::Parse(format!("invalid JSON style: {}", e)))?,
            Some("toml") => toml::from_str(&content)
                .map_err(|e| ConfigError::Parse(format!("invalid TOML style: {}", e)))?,
            other => {
                return Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string()).into())
            }
        };

        config.validate()?;
        debug!("Loaded style from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;

        let content = match extension(path) {
            Some("json") => serde_json::to_string_pretty(self)
                .map_err(|e| ConfigError::Parse(format!("failed to serialize style: {}", e)))?,
            Some("toml") => toml::to_string_pretty(self)
                .map_err(|e| ConfigError::Parse(format!("failed to serialize style: {}", e)))?,
            other => {
                return Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string()).into())
            }
        };

        std::fs::write(path, content)?;
        debug!("Saved style to {}", path.display());
        Ok(())
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

/// Default location of the saved style file
pub fn default_config_path() -> PathBuf {
    let mut path = dirs::config_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    path.push("tagforge");
    path.push("style.toml");
    path
}
