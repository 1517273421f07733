//! Error types for the HAL crate.

use thiserror::Error;

/// Errors that can occur in backend operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// Malformed input or configuration.
    #[error("Invalid {parameter}: {message}")]
    Validation {
        /// Name of the offending parameter.
        parameter: String,
        /// What is wrong with it.
        message: String,
    },

    /// The backend cannot execute an operation of this kind.
    #[error("Unsupported operation in {context}: {message}")]
    Operation {
        /// Where the operation was encountered.
        context: String,
        /// Details.
        message: String,
    },

    /// State width disagrees with what the operation expects.
    #[error("Dimension mismatch: expected {expected} qubits, got {got}")]
    DimensionMismatch {
        /// Expected width.
        expected: usize,
        /// Actual width.
        got: usize,
    },

    /// Measurement collapse onto an outcome of zero probability.
    #[error("Cannot collapse qubit {qubit} onto |{outcome}⟩: probability {probability:e}")]
    DegenerateMeasurement {
        /// Measured qubit.
        qubit: u32,
        /// Requested outcome.
        outcome: u8,
        /// Probability of that outcome.
        probability: f64,
    },

    /// Feature exists in the interface but not in this backend.
    #[error("{feature} is not implemented: {message}")]
    NotImplemented {
        /// Name of the feature.
        feature: String,
        /// Details.
        message: String,
    },

    /// More qubits requested than the backend offers.
    #[error("Backend '{backend}' supports {available} qubits, {required} required")]
    CapacityExceeded {
        /// Backend name.
        backend: String,
        /// Qubits requested.
        required: u32,
        /// Qubits available.
        available: u32,
    },

    /// Execution stopped by a cancellation signal.
    #[error("Operation cancelled")]
    Cancelled,

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl HalError {
    /// Shorthand for [`HalError::Validation`].
    pub fn validation(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        HalError::Validation {
            parameter: parameter.into(),
            message: message.into(),
        }
    }
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;
