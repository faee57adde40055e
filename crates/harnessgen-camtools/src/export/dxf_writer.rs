//! DXF export of cut profiles
//!
//! Every polyline becomes one closed LWPOLYLINE. Coordinates are written
//! exactly as they are stored in the profile; they were normalized when the
//! profile was generated.

use super::check_profile;
use crate::error::{ExportError, ExportResult};
use crate::geometry::{Profile2D, ProfileRole};
use dxf::entities::{Entity, EntityType, LwPolyline};
use dxf::enums::AcadVersion;
use dxf::tables::Layer;
use dxf::{Drawing, LwPolylineVertex};
use std::fs;
use std::path::Path;
use tracing::info;

/// Flag bit marking an LWPOLYLINE as closed
const CLOSED_FLAG: i32 = 1;

/// Options for vector export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorOptions {
    /// Put each role on its own layer; otherwise everything goes on layer 0
    pub layer_per_role: bool,
}

impl Default for VectorOptions {
    fn default() -> Self {
        Self {
            layer_per_role: true,
        }
    }
}

/// Write a profile as a DXF document using the default options
pub fn write_vector(profile: &Profile2D, path: &Path) -> ExportResult<()> {
    write_vector_with(profile, path, &VectorOptions::default())
}

/// Write a profile as a DXF document
///
/// The profile is checked before anything touches the filesystem; a
/// malformed profile never leaves a partial file behind.
pub fn write_vector_with(
    profile: &Profile2D,
    path: &Path,
    options: &VectorOptions,
) -> ExportResult<()> {
    check_profile(profile)?;

    let drawing = build_drawing(profile, options);
    let mut buffer = Vec::new();
    drawing
        .save(&mut buffer)
        .map_err(|e| ExportError::Dxf(e.to_string()))?;
    fs::write(path, &buffer).map_err(|e| ExportError::io(path, e))?;

    info!(
        "Wrote {} polylines to {}",
        profile.polylines.len(),
        path.display()
    );
    Ok(())
}

fn build_drawing(profile: &Profile2D, options: &VectorOptions) -> Drawing {
    let mut drawing = Drawing::new();
    drawing.header.version = AcadVersion::R2000;

    if options.layer_per_role {
        for role in ProfileRole::ALL {
            if profile.count(role) > 0 {
                drawing.add_layer(Layer {
                    name: role.layer_name().to_string(),
                    ..Default::default()
                });
            }
        }
    }

    for polyline in &profile.polylines {
        let mut lw = LwPolyline::default();
        lw.flags |= CLOSED_FLAG;
        lw.vertices = polyline
            .vertices()
            .iter()
            .map(|p| LwPolylineVertex {
                x: p.x,
                y: p.y,
                ..Default::default()
            })
            .collect();

        let mut entity = Entity::new(EntityType::LwPolyline(lw));
        if options.layer_per_role {
            entity.common.layer = polyline.role.layer_name().to_string();
        }
        drawing.add_entity(entity);
    }

    drawing
}
