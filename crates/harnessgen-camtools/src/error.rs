//! Error types for the CAM tools crate.
//!
//! Geometry errors come from the generator, export errors from the DXF and
//! STL writers. Constraint violations are not errors: they are reported as
//! findings by [`crate::validation`].

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while using the CAM tools.
#[derive(Error, Debug)]
pub enum CamToolError {
    /// Geometry could not be generated.
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    /// Geometry could not be exported.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// A parameter was rejected.
    #[error("Parameter error: {0}")]
    Parameter(#[from] harnessgen_core::ParameterError),
}

/// Errors raised by the geometry generator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A parameter value makes the requested shape impossible to build.
    #[error("Geometry infeasible for '{parameter}': {reason}")]
    Infeasible { parameter: String, reason: String },

    /// A boolean combination did not yield a single closed solid.
    #[error("Boolean operation failed for {peripheral}: {reason}")]
    BooleanOperationFailed { peripheral: String, reason: String },
}

impl GeometryError {
    pub(crate) fn infeasible(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Infeasible {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn boolean_failed(peripheral: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::BooleanOperationFailed {
            peripheral: peripheral.into(),
            reason: reason.into(),
        }
    }
}

impl From<harnessgen_core::ParameterError> for GeometryError {
    fn from(err: harnessgen_core::ParameterError) -> Self {
        use harnessgen_core::ParameterError;
        match err {
            ParameterError::OutOfDomain { name, reason, .. } => Self::infeasible(name, reason),
            ParameterError::UnknownParameter(name) => Self::infeasible(name, "unknown parameter"),
        }
    }
}

/// Errors raised while writing interchange files.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The destination could not be written.
    #[error("I/O error writing {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The geometry handed to the writer is not exportable.
    #[error("Malformed geometry: {0}")]
    MalformedGeometry(String),

    /// The DXF library refused the drawing.
    #[error("DXF error: {0}")]
    Dxf(String),
}

impl ExportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for CAM tool operations.
pub type CamToolResult<T> = Result<T, CamToolError>;

/// Result type alias for geometry generation.
pub type GeometryResult<T> = Result<T, GeometryError>;

/// Result type alias for export operations.
pub type ExportResult<T> = Result<T, ExportError>;
