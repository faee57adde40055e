//! # HarnessGen CAM Tools
//!
//! Everything between a parameter set and a file on disk.
//!
//! ## Modules
//!
//! - **validation**: manufacturing feasibility rules and corrective suggestions
//! - **geometry**: cut profiles and printed peripherals
//! - **export**: DXF and STL writers
//! - **tile**: derived tile dimensions shared by the above
//!
//! ## Example
//!
//! ```no_run
//! use harnessgen_camtools::{generate_2d, validate, write_vector};
//! use harnessgen_core::ParameterSet;
//! use std::path::Path;
//!
//! let params = ParameterSet::defaults();
//! assert!(!validate(&params).has_errors());
//! let profile = generate_2d(&params).unwrap();
//! write_vector(&profile, Path::new("tile_hexagon.dxf")).unwrap();
//! ```

pub mod error;
pub mod export;
pub mod geometry;
pub mod tile;
pub mod validation;

pub use error::{
    CamToolError, CamToolResult, ExportError, ExportResult, GeometryError, GeometryResult,
};
pub use export::{
    write_all, write_mesh, write_profile_set, write_profiles, write_vector, VectorOptions,
};
pub use geometry::{
    generate_2d, generate_3d, generate_profiles, Mesh3D, Peripheral, Point2, Polyline, Profile2D,
    ProfileKind, ProfileRole, Solid3D,
};
pub use tile::TileMetrics;
pub use validation::{validate, Finding, RuleId, Severity, ValidationReport};
