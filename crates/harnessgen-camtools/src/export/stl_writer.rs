//! STL export of peripherals

use crate::error::{ExportError, ExportResult};
use crate::geometry::Solid3D;
use harnessgen_core::normalize;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tracing::info;

/// Write the mesh of a solid as binary STL
///
/// Vertex coordinates are normalized on the way out. An empty, non-finite
/// or open mesh is refused before any file is created.
pub fn write_mesh(solid: &Solid3D, path: &Path) -> ExportResult<()> {
    let mesh = &solid.mesh;
    if mesh.is_empty() {
        return Err(ExportError::MalformedGeometry(format!(
            "{} mesh has no triangles",
            solid.peripheral
        )));
    }
    if !mesh.is_finite() {
        return Err(ExportError::MalformedGeometry(format!(
            "{} mesh has non-finite vertices",
            solid.peripheral
        )));
    }
    if !mesh.is_closed() {
        let edges = mesh.edge_report();
        return Err(ExportError::MalformedGeometry(format!(
            "{} mesh is not closed ({} unmatched edges)",
            solid.peripheral, edges.boundary_edge_count
        )));
    }

    let point = |p: &nalgebra::Point3<f64>| {
        stl_io::Vertex::new([
            normalize(p.x) as f32,
            normalize(p.y) as f32,
            normalize(p.z) as f32,
        ])
    };
    let triangles: Vec<stl_io::Triangle> = mesh
        .triangles
        .iter()
        .map(|t| stl_io::Triangle {
            normal: stl_io::Normal::new([t.normal.x as f32, t.normal.y as f32, t.normal.z as f32]),
            vertices: [point(&t.vertices[0]), point(&t.vertices[1]), point(&t.vertices[2])],
        })
        .collect();

    let mut buffer = Cursor::new(Vec::new());
    stl_io::write_stl(&mut buffer, triangles.iter())
        .map_err(|e| ExportError::io(path, e))?;
    fs::write(path, buffer.into_inner()).map_err(|e| ExportError::io(path, e))?;

    info!(
        "Wrote {} ({} triangles) to {}",
        solid.peripheral,
        triangles.len(),
        path.display()
    );
    Ok(())
}
