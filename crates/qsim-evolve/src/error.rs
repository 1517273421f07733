//! Error types for the evolve crate.

use thiserror::Error;

/// Errors produced by Hamiltonian construction and time evolution.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EvolveError {
    /// Hamiltonian width differs from the state it is applied to.
    #[error("Hamiltonian acts on {expected} qubits but the state has {got}")]
    DimensionMismatch {
        /// Width of the Hamiltonian.
        expected: usize,
        /// Width of the state.
        got: usize,
    },

    /// steps must be ≥ 1.
    #[error("steps must be at least 1, got {0}")]
    InvalidSteps(usize),

    /// n_samples must be ≥ 1 for QDrift.
    #[error("n_samples must be at least 1, got {0}")]
    InvalidSamples(usize),

    /// Malformed Hamiltonian or evolution parameter.
    #[error("Invalid {parameter}: {message}")]
    Validation {
        /// Name of the offending parameter.
        parameter: String,
        /// What is wrong with it.
        message: String,
    },

    /// Circuit builder returned an error.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] qsim_ir::IrError),

    /// State-vector engine returned an error.
    #[error("State error: {0}")]
    State(#[from] qsim_state::StateError),

    /// Hamiltonian JSON could not be parsed.
    #[error("Hamiltonian JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EvolveError {
    pub(crate) fn validation(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        EvolveError::Validation {
            parameter: parameter.into(),
            message: message.into(),
        }
    }
}

/// Result type for time-evolution operations.
pub type EvolveResult<T> = Result<T, EvolveError>;
