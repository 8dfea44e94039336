//! Parsing of loosely typed form fields into a [`StyleConfig`]
//!
//! Every field is optional. A missing, unparsable or out-of-range value is
//! replaced by its default so that a half-filled form still produces a
//! usable configuration.

use crate::style::{HolePlacement, HoleSide, PlateStyle, StyleConfig, TextAlign};
use std::collections::HashMap;
use std::str::FromStr;
use tagforge_core::Rgb;
use tracing::warn;

/// Raw form values keyed by field id
pub type FormFields = HashMap<String, String>;

struct FieldReader<'a> {
    fields: &'a FormFields,
}

impl<'a> FieldReader<'a> {
    fn raw(&self, key: &str) -> Option<&'a str> {
        self.fields
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    fn number(&self, key: &str, default: f64, accept: impl Fn(f64) -> bool) -> f64 {
        let Some(raw) = self.raw(key) else {
            return default;
        };
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() && accept(v) => v,
            _ => {
                warn!("Form field '{}' = '{}' is not usable, using {}", key, raw, default);
                default
            }
        }
    }

    fn positive(&self, key: &str, default: f64) -> f64 {
        self.number(key, default, |v| v > 0.0)
    }

    fn non_negative(&self, key: &str, default: f64) -> f64 {
        self.number(key, default, |v| v >= 0.0)
    }

    fn any(&self, key: &str, default: f64) -> f64 {
        self.number(key, default, |_| true)
    }

    fn optional_positive(&self, key: &str) -> Option<f64> {
        let raw = self.raw(key)?;
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() && v > 0.0 => Some(v),
            _ => {
                warn!("Form field '{}' = '{}' is not usable, ignoring it", key, raw);
                None
            }
        }
    }

    fn boolean(&self, key: &str, default: bool) -> bool {
        match self.raw(key).map(|v| v.to_ascii_lowercase()) {
            None => default,
            Some(v) if v == "true" || v == "1" || v == "on" || v == "yes" => true,
            Some(v) if v == "false" || v == "0" || v == "off" || v == "no" => false,
            Some(v) => {
                warn!("Form field '{}' = '{}' is not a boolean, using {}", key, v, default);
                default
            }
        }
    }

    fn choice<T: Copy + std::fmt::Debug>(
        &self,
        key: &str,
        default: T,
        parse: impl Fn(&str) -> Option<T>,
    ) -> T {
        let Some(raw) = self.raw(key) else {
            return default;
        };
        parse(&raw.to_ascii_lowercase()).unwrap_or_else(|| {
            warn!("Form field '{}' = '{}' is not recognized, using {:?}", key, raw, default);
            default
        })
    }

    fn color(&self, key: &str, default: Rgb) -> Rgb {
        let Some(raw) = self.raw(key) else {
            return default;
        };
        Rgb::from_str(raw).unwrap_or_else(|e| {
            warn!("Form field '{}': {}, using {}", key, e, default);
            default
        })
    }
}

impl StyleConfig {
    /// Build a configuration from form fields, falling back per field
    ///
    /// Recognized keys: `style`, `text`, `letterHeight`, `baseHeight`,
    /// `outline`, `mmPerUnit`, `letterSpacing`, `lineSpacing`, `textAlign`,
    /// `textStroke`, `cornerRadius`, `totalWidth`, `totalHeight`,
    /// `baseColor`, `textColor`, `curveSteps`, `keepAway`, `earEnabled`,
    /// `earSide`, `earPlacement`, `holeDiameter`, `earRingThickness`,
    /// `earAttachOverlap`, `earYShift`.
    pub fn from_form_fields(fields: &FormFields) -> Self {
        let d = StyleConfig::default();
        let dh = d.mounting_hole.clone();
        let r = FieldReader { fields };

        let mut config = StyleConfig {
            style: r.choice("style", d.style, |v| match v {
                "raised" => Some(PlateStyle::Raised),
                "cutout" => Some(PlateStyle::Cutout),
                _ => None,
            }),
            text: r.raw("text").map(str::to_string).unwrap_or(d.text),
            letter_height_mm: r.positive("letterHeight", d.letter_height_mm),
            base_height_mm: r.positive("baseHeight", d.base_height_mm),
            outline_margin_mm: r.non_negative("outline", d.outline_margin_mm),
            mm_per_unit: r.positive("mmPerUnit", d.mm_per_unit),
            letter_spacing_mm: r.any("letterSpacing", d.letter_spacing_mm),
            line_spacing: r.positive("lineSpacing", d.line_spacing),
            text_align: r.choice("textAlign", d.text_align, |v| match v {
                "left" => Some(TextAlign::Left),
                "center" | "centre" => Some(TextAlign::Center),
                "right" => Some(TextAlign::Right),
                _ => None,
            }),
            stroke_width_mm: r.non_negative("textStroke", d.stroke_width_mm),
            corner_radius_mm: r.non_negative("cornerRadius", d.corner_radius_mm),
            target_total_width_mm: r.optional_positive("totalWidth"),
            target_total_height_mm: r.optional_positive("totalHeight"),
            base_color: r.color("baseColor", d.base_color),
            text_color: r.color("textColor", d.text_color),
            curve_steps: r.positive("curveSteps", d.curve_steps as f64).round().max(1.0) as u32,
            keep_away_mm: r.non_negative("keepAway", d.keep_away_mm),
            mounting_hole: Default::default(),
        };

        config.mounting_hole.enabled = r.boolean("earEnabled", dh.enabled);
        config.mounting_hole.side = r.choice("earSide", dh.side, |v| match v {
            "left" => Some(HoleSide::Left),
            "right" => Some(HoleSide::Right),
            "top" => Some(HoleSide::Top),
            _ => None,
        });
        config.mounting_hole.placement = r.choice("earPlacement", dh.placement, |v| match v {
            "outside" | "side" | "ear" => Some(HolePlacement::Outside),
            "inside" => Some(HolePlacement::Inside),
            _ => None,
        });
        config.mounting_hole.diameter_mm = r.positive("holeDiameter", dh.diameter_mm);
        config.mounting_hole.ring_thickness_mm =
            r.positive("earRingThickness", dh.ring_thickness_mm);
        config.mounting_hole.attach_overlap_mm =
            r.non_negative("earAttachOverlap", dh.attach_overlap_mm);
        config.mounting_hole.y_shift_mm = r.any("earYShift", dh.y_shift_mm);

        config
    }
}
