//! ASCII STL export.
//!
//! ```text
//! solid design
//!   facet normal nx ny nz
//!     outer loop
//!       vertex x y z
//!       vertex x y z
//!       vertex x y z
//!     endloop
//!   endfacet
//!   ...
//! endsolid design
//! ```
//!
//! Degenerate triangles are written as-is with a `0 0 0` normal; the exporter
//! does not filter them.

use std::io::Write;

use glam::DVec3;
use shared::{Scene, MAX_OBJECTS};

use crate::build::build_object_mesh;
use crate::error::{DesignError, DesignResult};
use crate::mesh::face_normal;

/// Solid name used in the header and footer
pub const SOLID_NAME: &str = "design";

/// Summary of a finished export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExportStats {
    pub objects: usize,
    pub skipped: usize,
    pub triangles: usize,
}

/// A solid name must be one non-empty token of printable ASCII
pub fn is_valid_solid_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_graphic())
}

/// Export the scene as an ASCII STL string.
pub fn export_stl(scene: &Scene) -> DesignResult<String> {
    export_stl_named(scene, SOLID_NAME)
}

/// Export with a custom solid name (falls back to `design` if it is not a valid token)
pub fn export_stl_named(scene: &Scene, solid_name: &str) -> DesignResult<String> {
    let mut out = Vec::new();
    write_stl(scene, solid_name, &mut out)?;
    // Only ASCII is ever written
    String::from_utf8(out).map_err(|e| DesignError::Io(std::io::Error::other(e)))
}

/// Stream the scene as ASCII STL into `writer`.
///
/// Objects that fail to build are skipped; the rest of the export continues.
pub fn write_stl<W: Write>(scene: &Scene, solid_name: &str, mut writer: W) -> DesignResult<ExportStats> {
    if scene.is_empty() {
        return Err(DesignError::EmptyExport);
    }
    if scene.len() > MAX_OBJECTS {
        return Err(DesignError::SceneFull { max: MAX_OBJECTS });
    }
    let solid_name = if is_valid_solid_name(solid_name) {
        solid_name
    } else {
        tracing::warn!("Invalid solid name {:?}, using {:?}", solid_name, SOLID_NAME);
        SOLID_NAME
    };

    let mut stats = ExportStats::default();
    writeln!(writer, "solid {solid_name}")?;

    for object in &scene.objects {
        let mesh = match build_object_mesh(object) {
            Ok(mesh) => mesh,
            Err(msg) => {
                tracing::warn!("Export skipped {:?}: {}", object.name, msg);
                stats.skipped += 1;
                continue;
            }
        };

        for tri in mesh.triangle_positions() {
            let n = face_normal(tri);
            writeln!(writer, "  facet normal {}", fmt_vec(n))?;
            writeln!(writer, "    outer loop")?;
            for v in tri {
                writeln!(writer, "      vertex {}", fmt_vec(v))?;
            }
            writeln!(writer, "    endloop")?;
            writeln!(writer, "  endfacet")?;
        }
        stats.objects += 1;
        stats.triangles += mesh.triangle_count();
    }

    writeln!(writer, "endsolid {solid_name}")?;

    tracing::info!(
        "STL export: {} objects, {} triangles, {} skipped",
        stats.objects,
        stats.triangles,
        stats.skipped
    );
    Ok(stats)
}

/// Suggested download name: `design-<unix millis>.stl`
pub fn export_file_name() -> String {
    let millis = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("{SOLID_NAME}-{millis}.stl")
}

/// Shortest round-trip decimal; `-0` is written as `0`.
fn fmt_num(v: f64) -> String {
    format!("{}", v + 0.0)
}

fn fmt_vec(v: DVec3) -> String {
    format!("{} {} {}", fmt_num(v.x), fmt_num(v.y), fmt_num(v.z))
}
