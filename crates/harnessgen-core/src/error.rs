//! Error handling for HarnessGen
//!
//! Parameter errors are raised at the store boundary: a value that is rejected
//! here is never stored. Feasibility problems between parameters are not
//! errors; they are reported as validation findings by the camtools crate.
//!
//! The error type uses `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Parameter error type
///
/// Represents a rejected parameter name or value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// The name is not part of the parameter registry
    #[error("Unknown parameter: {0}")]
    UnknownParameter(String),

    /// The value lies outside the parameter's hard-coded physical domain
    #[error("Parameter '{name}' out of domain: {value} ({reason})")]
    OutOfDomain {
        /// The parameter name.
        name: String,
        /// The rejected value after normalization.
        value: f64,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ParameterError {
    /// Name of the parameter the error refers to
    pub fn parameter(&self) -> &str {
        match self {
            Self::UnknownParameter(name) => name,
            Self::OutOfDomain { name, .. } => name,
        }
    }
}

/// Result type alias for parameter operations
pub type ParameterResult<T> = std::result::Result<T, ParameterError>;
