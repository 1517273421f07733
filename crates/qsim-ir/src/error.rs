//! Error types for the IR crate.

use crate::qubit::QubitId;
use thiserror::Error;

/// Errors that can occur while building gates and circuits.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Gate operand outside the circuit width.
    #[error("Qubit {qubit} out of range for {num_qubits}-qubit circuit{}", format_gate_context(.gate_name))]
    QubitOutOfRange {
        /// The offending qubit.
        qubit: QubitId,
        /// Width of the circuit.
        num_qubits: u32,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// The same qubit appears twice in one gate.
    #[error("Duplicate qubit {qubit} in operation{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// A multi-controlled gate was given no operands.
    #[error("Gate '{0}' requires at least one qubit")]
    EmptyOperands(String),

    /// Two circuits of different width were combined.
    #[error("Circuit width mismatch: expected {expected} qubits, got {got}")]
    WidthMismatch {
        /// Width of the receiving circuit.
        expected: u32,
        /// Width of the other circuit.
        got: u32,
    },

    /// Gate angle is NaN or infinite.
    #[error("Gate '{gate_name}' has non-finite angle {value}")]
    NonFiniteAngle {
        /// Name of the gate.
        gate_name: String,
        /// The offending value.
        value: f64,
    },
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
