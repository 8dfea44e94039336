//! TagForge Settings Crate
//!
//! Handles the style configuration of a tag: strongly typed values,
//! validation, file persistence and parsing of loose form fields.

pub mod form;
pub mod style;

pub use form::FormFields;
pub use style::{
    default_config_path, HolePlacement, HoleSide, MountingHoleConfig, PlateStyle, StyleConfig,
    TargetSize, TextAlign,
};
