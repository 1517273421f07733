//! Error types for the algorithms crate.

use qsim_arith::ArithError;
use qsim_hal::HalError;
use qsim_ir::IrError;
use qsim_state::StateError;
use thiserror::Error;

/// Errors raised while building or post-processing algorithm runs.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AlgoError {
    /// Malformed input.
    #[error("Invalid {parameter}: {message}")]
    Validation {
        /// Name of the offending parameter.
        parameter: String,
        /// What is wrong with it.
        message: String,
    },

    /// Sizes of two inputs disagree.
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Expected size.
        expected: usize,
        /// Actual size.
        got: usize,
    },

    /// Matrix has no inverse.
    #[error("Matrix is singular: pivot {pivot:e} in column {column}")]
    SingularMatrix {
        /// Column where elimination failed.
        column: usize,
        /// Largest available pivot magnitude.
        pivot: f64,
    },

    /// Circuit construction error.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] IrError),

    /// Arithmetic construction error.
    #[error("Arithmetic error: {0}")]
    Arith(#[from] ArithError),

    /// Simulation error.
    #[error("State error: {0}")]
    State(#[from] StateError),

    /// Histogram error.
    #[error("Histogram error: {0}")]
    Hal(#[from] HalError),
}

impl AlgoError {
    pub(crate) fn validation(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        AlgoError::Validation {
            parameter: parameter.into(),
            message: message.into(),
        }
    }
}

/// Result type for algorithm operations.
pub type AlgoResult<T> = Result<T, AlgoError>;
