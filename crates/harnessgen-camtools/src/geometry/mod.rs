//! Tile and peripheral geometry
//!
//! - [`profile`]: 2D cut profiles
//! - [`mesh`]: triangle meshes
//! - [`solid`]: combination trees and their evaluation
//! - [`generator`]: derives both from a parameter set

pub mod generator;
pub mod mesh;
pub mod profile;
pub mod solid;

pub use generator::{
    carrier_tree, connector_tree, generate_2d, generate_3d, generate_profiles, liner_tree,
    magnet_centres, strap_clip_tree,
};
pub use mesh::{EdgeReport, Mesh3D, MeshReport, Triangle3D};
pub use profile::{Point2, Polyline, Profile2D, ProfileKind, ProfileRole};
pub use solid::{BooleanOp, CsgNode, Peripheral, Placement, Primitive, Solid3D};
