//! # TagForge Designer
//!
//! Turns a line (or several lines) of text into a printable nametag: letters
//! standing on an outline plate, or letters cut through a rounded plate,
//! optionally with a mounting hole. Output is a multi-color 3MF package or a
//! single-color STL.
//!
//! ## Pipeline
//!
//! ```text
//! FontFace::layout        text -> path commands (layout units, Y down)
//!   └── sample_path       path commands -> closed contours
//!       └── letter_tree   contours -> merged, hole-aware letters
//!           └── build_plate       raised outline or cutout frame + hole
//!               └── normalize     layout units -> mm, target size fit
//!                   └── extrude   shapes -> closed meshes, centered
//!                       └── export        3MF / STL
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tagforge_designer::{FontFace, NametagBuilder, write_3mf};
//! use tagforge_settings::StyleConfig;
//!
//! let font = FontFace::from_file(path)?;
//! let assembly = NametagBuilder::new().build(&font, &StyleConfig::default())?;
//! let bytes = write_3mf(&assembly)?;
//! ```

pub mod assembly;
pub mod export;
pub mod extrude;
pub mod font;
pub mod geometry;
pub mod mesh;
pub mod normalize;
pub mod plate;
pub mod polygon;
pub mod reconstruct;
pub mod sampler;
pub mod state;

pub use assembly::{Assembly, MountingHoleInfo, NametagBuilder, Part, PartRole};
pub use export::{
    export_bytes, export_to_file, model_xml, write_3mf, write_stl_ascii, write_stl_binary,
    ExportFormat,
};
pub use extrude::extrude_shapes;
pub use font::{check_font_signature, FontFace, FontMetrics, LayoutOptions, TextLayout};
pub use geometry::{Bounds, Contour, Point, Shape};
pub use mesh::{Mesh, MeshBuilder};
pub use plate::{build_plate, letter_tree, HoleSpec, PlacedHole, PlateLayout, PlateSpec};
pub use polygon::{ClipperEngine, PolyNode, PolygonEngine, PolygonSet, PolygonTree};
pub use reconstruct::{reconstruct_by_area, shapes_from_tree};
pub use sampler::{sample_path, CommandRecorder, PathCommand, DEFAULT_CURVE_STEPS};
pub use state::{read_font_file, BuilderState, FontTicket};
