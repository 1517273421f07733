//! Error types for reversible arithmetic.

use qsim_ir::QubitId;
use thiserror::Error;

/// Errors that can occur while building arithmetic circuits.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ArithError {
    /// Bit width mismatch between registers.
    #[error("Bit width mismatch: expected {expected}, got {got}")]
    BitWidthMismatch { expected: usize, got: usize },

    /// Register width outside the supported range.
    #[error("Invalid bit width: {0}")]
    InvalidBitWidth(usize),

    /// Classical value does not fit in the register.
    #[error("Value {value} does not fit in {width} bits")]
    Overflow { value: u64, width: usize },

    /// A qubit is used in two roles at once.
    #[error("Qubit {0} is used more than once")]
    DuplicateQubit(QubitId),

    /// Malformed input.
    #[error("Invalid {parameter}: {message}")]
    Validation { parameter: String, message: String },

    /// Circuit error during gate application.
    #[error("Circuit error: {0}")]
    Circuit(#[from] qsim_ir::IrError),
}

impl ArithError {
    pub(crate) fn validation(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        ArithError::Validation {
            parameter: parameter.into(),
            message: message.into(),
        }
    }
}

/// Result type for arithmetic circuit construction.
pub type ArithResult<T> = Result<T, ArithError>;
