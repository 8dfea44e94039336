//! 3MF package writer.
//!
//! Writes a minimal core-spec 3MF: one mesh object per solid part, a shared
//! base-material list (one entry per distinct color) and a build item per
//! object. Part translations are baked into the vertex positions.
//!
//! The model XML depends only on the assembly, so exporting the same
//! assembly twice gives byte-identical model documents. Archive entries
//! carry a fixed timestamp as well.

use crate::assembly::{Assembly, Part};
use std::collections::HashMap;
use std::fmt::{self, Write as _};
use std::io::{Cursor, Write};
use tagforge_core::{ExportError, Rgb};
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const MODEL_PATH: &str = "3D/3dmodel.model";
pub const ROOT_RELS_PATH: &str = "_rels/.rels";
pub const MODEL_RELS_PATH: &str = "3D/_rels/3dmodel.model.rels";
pub const CONTENT_TYPES_PATH: &str = "[Content_Types].xml";

/// MIME type of a 3MF model part
pub const MODEL_CONTENT_TYPE: &str = "application/vnd.ms-package.3dmanufacturing-3dmodel+xml";
const RELS_CONTENT_TYPE: &str = "application/vnd.openxmlformats-package.relationships+xml";

const CORE_NAMESPACE: &str = "http://schemas.microsoft.com/3dmanufacturing/core/2015/02";
const MODEL_REL_TYPE: &str = "http://schemas.microsoft.com/3dmanufacturing/2013/01/3dmodel";
const PACKAGE_REL_NAMESPACE: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const CONTENT_TYPES_NAMESPACE: &str =
    "http://schemas.openxmlformats.org/package/2006/content-types";

/// Object ids start here; id 1 is the material list
const MATERIALS_ID: u32 = 1;
const FIRST_OBJECT_ID: u32 = 2;

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Distinct colors in first-seen order, keyed by 6-digit hex
///
/// Each material is named after the first part that uses its color.
struct MaterialTable<'a> {
    entries: Vec<(Rgb, &'a str)>,
    index: HashMap<String, usize>,
}

impl<'a> MaterialTable<'a> {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn index_of(&mut self, part: &'a Part) -> usize {
        let next = self.entries.len();
        let slot = *self.index.entry(part.color.to_hex()).or_insert(next);
        if slot == next {
            self.entries.push((part.color, &part.name));
        }
        slot
    }
}

fn write_object(xml: &mut String, id: u32, part: &Part, pindex: usize) -> fmt::Result {
    writeln!(
        xml,
        "    <object id=\"{}\" name=\"{}\" type=\"model\" pid=\"{}\" pindex=\"{}\">",
        id,
        escape_xml(&part.name),
        MATERIALS_ID,
        pindex
    )?;
    xml.push_str("      <mesh>\n        <vertices>\n");
    for p in part.world_positions() {
        writeln!(
            xml,
            "          <vertex x=\"{:.3}\" y=\"{:.3}\" z=\"{:.3}\" />",
            p.x, p.y, p.z
        )?;
    }
    xml.push_str("        </vertices>\n        <triangles>\n");
    for [a, b, c] in &part.mesh.triangles {
        writeln!(
            xml,
            "          <triangle v1=\"{}\" v2=\"{}\" v3=\"{}\" />",
            a, b, c
        )?;
    }
    xml.push_str("        </triangles>\n      </mesh>\n    </object>\n");
    Ok(())
}

fn write_model(xml: &mut String, parts: &[&Part]) -> fmt::Result {
    let mut materials = MaterialTable::new();
    let pindices: Vec<usize> = parts.iter().map(|p| materials.index_of(p)).collect();

    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    writeln!(
        xml,
        "<model unit=\"millimeter\" xml:lang=\"en-US\" xmlns=\"{}\">",
        CORE_NAMESPACE
    )?;
    xml.push_str("  <resources>\n");
    writeln!(xml, "    <basematerials id=\"{}\">", MATERIALS_ID)?;
    for (color, name) in &materials.entries {
        writeln!(
            xml,
            "      <base name=\"{}\" displaycolor=\"#{}\" />",
            escape_xml(name),
            color.to_hex()
        )?;
    }
    xml.push_str("    </basematerials>\n");
    for (i, (part, pindex)) in parts.iter().zip(&pindices).enumerate() {
        write_object(xml, FIRST_OBJECT_ID + i as u32, part, *pindex)?;
    }
    xml.push_str("  </resources>\n  <build>\n");
    for i in 0..parts.len() {
        writeln!(xml, "    <item objectid=\"{}\" />", FIRST_OBJECT_ID + i as u32)?;
    }
    xml.push_str("  </build>\n</model>\n");

    debug!(
        "3MF model: {} objects, {} materials",
        parts.len(),
        materials.entries.len()
    );
    Ok(())
}

/// Build the `3D/3dmodel.model` document
///
/// Parts without vertices are skipped; if nothing is left the export fails
/// with [`ExportError::NoGeometry`].
pub fn model_xml(assembly: &Assembly) -> Result<String, ExportError> {
    let parts: Vec<&Part> = assembly
        .parts
        .iter()
        .filter(|p| p.mesh.vertex_count() > 0 && p.mesh.triangle_count() > 0)
        .collect();
    if parts.is_empty() {
        return Err(ExportError::NoGeometry);
    }

    let mut xml = String::new();
    write_model(&mut xml, &parts).map_err(archive_error)?;
    Ok(xml)
}

fn root_rels() -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <Relationships xmlns=\"{}\">\n  \
         <Relationship Target=\"/{}\" Id=\"rel0\" Type=\"{}\" />\n\
         </Relationships>\n",
        PACKAGE_REL_NAMESPACE, MODEL_PATH, MODEL_REL_TYPE
    )
}

fn model_rels() -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <Relationships xmlns=\"{}\">\n\
         </Relationships>\n",
        PACKAGE_REL_NAMESPACE
    )
}

fn content_types() -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <Types xmlns=\"{}\">\n  \
         <Default Extension=\"rels\" ContentType=\"{}\" />\n  \
         <Default Extension=\"model\" ContentType=\"{}\" />\n\
         </Types>\n",
        CONTENT_TYPES_NAMESPACE, RELS_CONTENT_TYPE, MODEL_CONTENT_TYPE
    )
}

fn archive_error(e: impl std::fmt::Display) -> ExportError {
    ExportError::Archive {
        reason: e.to_string(),
    }
}

/// Package the assembly as a 3MF archive
pub fn write_3mf(assembly: &Assembly) -> Result<Vec<u8>, ExportError> {
    let model = model_xml(assembly)?;

    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(9))
        .last_modified_time(zip::DateTime::default());

    let entries = [
        (CONTENT_TYPES_PATH, content_types()),
        (ROOT_RELS_PATH, root_rels()),
        (MODEL_PATH, model),
        (MODEL_RELS_PATH, model_rels()),
    ];

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in &entries {
        zip.start_file(*name, options).map_err(archive_error)?;
        zip.write_all(body.as_bytes()).map_err(archive_error)?;
    }
    let bytes = zip.finish().map_err(archive_error)?.into_inner();

    info!("Packaged 3MF archive ({} bytes)", bytes.len());
    Ok(bytes)
}
