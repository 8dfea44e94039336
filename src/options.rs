//! Command-line options for the headless driver.

use clap::Parser;
use std::path::PathBuf;
use tagforge_designer::ExportFormat;

/// Generate a printable nametag from text
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "tagforge")]
#[command(
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")"),
    about,
    long_about = None
)]
pub struct DriverOptions {
    /// Text to render; overrides the style file
    #[arg(long, env = "TAGFORGE_TEXT")]
    pub text: Option<String>,

    /// TTF/OTF font file; defaults to the system sans-serif face
    #[arg(long = "font", value_name = "FILE", env = "TAGFORGE_FONT")]
    pub font_path: Option<PathBuf>,

    /// Style file (.toml or .json)
    #[arg(long = "style", value_name = "FILE", env = "TAGFORGE_STYLE")]
    pub style_path: Option<PathBuf>,

    /// Output file; the extension (.3mf or .stl) picks the format
    #[arg(short, long = "out", value_name = "FILE", default_value = "nametag.3mf")]
    pub output: PathBuf,

    /// Write ASCII instead of binary STL
    #[arg(long)]
    pub ascii: bool,
}

impl DriverOptions {
    /// Export format implied by the output file name
    pub fn format(&self) -> anyhow::Result<ExportFormat> {
        match ExportFormat::from_path(&self.output) {
            Some(ExportFormat::StlBinary) if self.ascii => Ok(ExportFormat::StlAscii),
            Some(format) => Ok(format),
            None => anyhow::bail!(
                "Cannot tell the format of '{}'; use a .3mf or .stl file name",
                self.output.display()
            ),
        }
    }
}
