//! # HarnessGen
//!
//! Parametric geometry generator for modular haptic-feedback harnesses:
//! - Regular hexagonal or square tiles, foam pieces and magnet rings cut from
//!   sheet material (DXF)
//! - 3D-printed magnet carriers, connectors, liner spacers and strap clips (STL)
//! - Manufacturing feasibility checks with corrective suggestions
//!
//! ## Architecture
//!
//! HarnessGen is organized as a workspace with multiple crates:
//!
//! 1. **harnessgen-core** - Parameter registry, numeric normalization, parameter store
//! 2. **harnessgen-camtools** - Constraint validation, geometry generation, DXF/STL export
//! 3. **harnessgen-settings** - Snapshot documents, presets, autosave, application settings
//! 4. **harnessgen** - Generation pipeline and the command-line binary

pub mod pipeline;

pub use pipeline::{GenerationOutput, GenerationPipeline};

pub use harnessgen_core::{
    normalize, Category, Param, ParameterDefinition, ParameterError, ParameterSet,
    ParameterStore, TileType, Unit,
};

pub use harnessgen_camtools::{
    generate_2d, generate_3d, generate_profiles, validate, CamToolError, ExportError, Finding,
    GeometryError, Peripheral, Profile2D, ProfileKind, ProfileRole, RuleId, Severity, Solid3D,
    ValidationReport, VectorOptions,
};

pub use harnessgen_settings::{preset, AppSettings, Autosave, SettingsError, PRESETS};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
