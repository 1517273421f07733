//! Error types for the state-vector crate.

use qsim_ir::IrError;
use thiserror::Error;

/// Errors produced by state construction, gate application and measurement.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StateError {
    /// A gate or measurement referenced a qubit outside the register.
    #[error("Qubit {qubit} is out of range for a {num_qubits}-qubit state")]
    InvalidQubitIndex {
        /// The offending qubit.
        qubit: u32,
        /// Width of the state.
        num_qubits: usize,
    },

    /// Basis index outside `[0, 2^n)`.
    #[error("Basis index {index} is out of range for dimension {dimension}")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Dimension of the state (2^n).
        dimension: usize,
    },

    /// Collapse onto an outcome with (numerically) zero probability.
    #[error("Cannot collapse qubit {qubit} onto |{outcome}⟩: probability {probability:e}")]
    DegenerateMeasurement {
        /// Measured qubit.
        qubit: u32,
        /// Requested outcome.
        outcome: u8,
        /// Probability of that outcome.
        probability: f64,
    },

    /// Widths of two objects disagree.
    #[error("Dimension mismatch: expected {expected} qubits, got {got}")]
    DimensionMismatch {
        /// Expected width.
        expected: usize,
        /// Actual width.
        got: usize,
    },

    /// Requested register is larger than a dense vector can hold.
    #[error("{requested} qubits requested, at most {max} supported")]
    TooManyQubits {
        /// Requested width.
        requested: usize,
        /// Maximum width.
        max: usize,
    },

    /// Malformed input.
    #[error("Invalid {parameter}: {message}")]
    Validation {
        /// Name of the offending parameter.
        parameter: String,
        /// What is wrong with it.
        message: String,
    },
}

impl StateError {
    pub(crate) fn validation(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        StateError::Validation {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Map a gate validation failure onto the state taxonomy.
    pub(crate) fn from_ir(err: IrError, num_qubits: usize) -> Self {
        match err {
            IrError::QubitOutOfRange { qubit, .. } => StateError::InvalidQubitIndex {
                qubit: qubit.0,
                num_qubits,
            },
            other => StateError::validation("gate", other.to_string()),
        }
    }
}

/// Result type for state-vector operations.
pub type StateResult<T> = Result<T, StateError>;
