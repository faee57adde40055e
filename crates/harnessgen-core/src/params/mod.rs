//! Parameters
//!
//! - [`registry`]: the fixed table of parameter definitions
//! - [`set`]: immutable, normalized parameter snapshots
//! - [`store`]: the single-writer store the snapshots are taken from

pub mod registry;
pub mod set;
pub mod store;

pub use registry::{
    definition, definitions, Category, Param, ParameterDefinition, TileType, PARAM_COUNT,
};
pub use set::ParameterSet;
pub use store::ParameterStore;
