//! # HarnessGen Core
//!
//! Core types and utilities shared by every HarnessGen crate.
//!
//! - **Precision**: the numeric normalizer every stored, displayed, validated
//!   and exported value passes through
//! - **Units**: unit symbols, display formatting and lenient input parsing
//! - **Parameters**: the fixed parameter registry, immutable [`ParameterSet`]
//!   snapshots and the single-writer [`ParameterStore`]
//! - **Errors**: the parameter error taxonomy

pub mod error;
pub mod params;
pub mod precision;
pub mod units;

pub use error::{ParameterError, ParameterResult};

pub use params::{
    Category, Param, ParameterDefinition, ParameterSet, ParameterStore, TileType, PARAM_COUNT,
};

pub use precision::{
    at_least, at_most, equal_within_tolerance, greater_than, less_than, normalize,
    normalize_finite, round_all, round_value, DEFAULT_DECIMALS, TOLERANCE,
};

pub use units::{format_display, parse_input, Unit};
