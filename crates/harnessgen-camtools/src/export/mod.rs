//! Export to interchange formats
//!
//! - [`dxf_writer`]: cut profiles as DXF
//! - [`stl_writer`]: peripherals as binary STL

pub mod dxf_writer;
pub mod stl_writer;

pub use dxf_writer::{write_vector, write_vector_with, VectorOptions};
pub use stl_writer::write_mesh;

use crate::error::{ExportError, ExportResult};
use crate::geometry::{Profile2D, Solid3D};
use harnessgen_core::precision::is_normalized;
use std::path::{Path, PathBuf};

/// File name of a cut profile, `<piece>_<variant>.dxf`
pub fn profile_file_name(profile: &Profile2D) -> String {
    format!("{}_{}.dxf", profile.kind.file_stem(), profile.tile_type)
}

/// File name of a peripheral, `<peripheral>.stl`
pub fn solid_file_name(solid: &Solid3D) -> String {
    format!("{}.stl", solid.peripheral.file_stem())
}

/// Write a profile into `dir` under its standard name
pub fn write_profile_set(
    profile: &Profile2D,
    dir: &Path,
    options: &VectorOptions,
) -> ExportResult<PathBuf> {
    let path = dir.join(profile_file_name(profile));
    write_vector_with(profile, &path, options)?;
    Ok(path)
}

/// Write every profile into `dir` under its standard name
///
/// All profiles are checked before the first file is written.
pub fn write_profiles(
    profiles: &[Profile2D],
    dir: &Path,
    options: &VectorOptions,
) -> ExportResult<Vec<PathBuf>> {
    for profile in profiles {
        check_profile(profile)?;
    }
    profiles
        .iter()
        .map(|profile| write_profile_set(profile, dir, options))
        .collect()
}

/// Write every solid into `dir` under its standard name
pub fn write_all(solids: &[Solid3D], dir: &Path) -> ExportResult<Vec<PathBuf>> {
    solids
        .iter()
        .map(|solid| {
            let path = dir.join(solid_file_name(solid));
            write_mesh(solid, &path)?;
            Ok(path)
        })
        .collect()
}

/// Reject profiles that cannot be written as closed, simple polylines at
/// canonical precision
pub(crate) fn check_profile(profile: &Profile2D) -> ExportResult<()> {
    if profile.polylines.is_empty() {
        return Err(ExportError::MalformedGeometry(
            "profile has no polylines".to_string(),
        ));
    }
    for (index, polyline) in profile.polylines.iter().enumerate() {
        let problem = if !polyline.is_closed() {
            Some("is not closed")
        } else if !polyline.is_finite() {
            Some("has non-finite coordinates")
        } else if polyline.distinct_vertex_count() < 3 {
            Some("has fewer than three distinct points")
        } else if !polyline.points.iter().all(|p| is_normalized(p.x) && is_normalized(p.y)) {
            Some("has coordinates that are not normalized")
        } else if !polyline.is_simple() {
            Some("intersects itself")
        } else {
            None
        };
        if let Some(problem) = problem {
            return Err(ExportError::MalformedGeometry(format!(
                "{} polyline {} {}",
                polyline.role, index, problem
            )));
        }
    }
    Ok(())
}
