//! Quantum gate types.
//!
//! [`Gate`] is a closed set of variants, each carrying its operands and
//! (where relevant) a real angle. Simulators dispatch on it with an
//! exhaustive `match`.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::qubit::QubitId;

/// A gate together with the qubits it acts on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "gate", rename_all = "snake_case")]
pub enum Gate {
    // Single-qubit Pauli gates
    /// Pauli-X gate.
    X { qubit: QubitId },
    /// Pauli-Y gate.
    Y { qubit: QubitId },
    /// Pauli-Z gate.
    Z { qubit: QubitId },

    // Single-qubit Clifford+T gates
    /// Hadamard gate.
    H { qubit: QubitId },
    /// S gate (sqrt(Z)).
    S { qubit: QubitId },
    /// S-dagger gate.
    Sdg { qubit: QubitId },
    /// T gate (fourth root of Z).
    T { qubit: QubitId },
    /// T-dagger gate.
    Tdg { qubit: QubitId },

    // Single-qubit rotation gates
    /// Phase gate diag(1, e^{iθ}).
    Phase { qubit: QubitId, theta: f64 },
    /// Rotation around X axis, exp(-iθX/2).
    Rx { qubit: QubitId, theta: f64 },
    /// Rotation around Y axis, exp(-iθY/2).
    Ry { qubit: QubitId, theta: f64 },
    /// Rotation around Z axis, exp(-iθZ/2).
    Rz { qubit: QubitId, theta: f64 },
    /// U3(θ, φ, λ) = RZ(φ) · RY(θ) · RZ(λ).
    U3 {
        qubit: QubitId,
        theta: f64,
        phi: f64,
        lambda: f64,
    },

    // Two-qubit gates
    /// Controlled-X (CNOT) gate.
    Cx { control: QubitId, target: QubitId },
    /// Controlled-Z gate.
    Cz { control: QubitId, target: QubitId },
    /// Controlled phase gate.
    #[serde(rename = "cphase")]
    CPhase {
        control: QubitId,
        target: QubitId,
        theta: f64,
    },
    /// SWAP gate.
    Swap { a: QubitId, b: QubitId },

    // Three-qubit gates
    /// Toffoli gate (CCX).
    Ccx {
        control1: QubitId,
        control2: QubitId,
        target: QubitId,
    },

    // Arbitrary arity
    /// Multi-controlled Z: phase -1 on the all-ones subspace of `qubits`.
    Mcz { qubits: Vec<QubitId> },
}

impl Gate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Gate::X { .. } => "x",
            Gate::Y { .. } => "y",
            Gate::Z { .. } => "z",
            Gate::H { .. } => "h",
            Gate::S { .. } => "s",
            Gate::Sdg { .. } => "sdg",
            Gate::T { .. } => "t",
            Gate::Tdg { .. } => "tdg",
            Gate::Phase { .. } => "p",
            Gate::Rx { .. } => "rx",
            Gate::Ry { .. } => "ry",
            Gate::Rz { .. } => "rz",
            Gate::U3 { .. } => "u3",
            Gate::Cx { .. } => "cx",
            Gate::Cz { .. } => "cz",
            Gate::CPhase { .. } => "cp",
            Gate::Swap { .. } => "swap",
            Gate::Ccx { .. } => "ccx",
            Gate::Mcz { .. } => "mcz",
        }
    }

    /// The operands of this gate, controls first.
    pub fn qubits(&self) -> Vec<QubitId> {
        match self {
            Gate::X { qubit }
            | Gate::Y { qubit }
            | Gate::Z { qubit }
            | Gate::H { qubit }
            | Gate::S { qubit }
            | Gate::Sdg { qubit }
            | Gate::T { qubit }
            | Gate::Tdg { qubit }
            | Gate::Phase { qubit, .. }
            | Gate::Rx { qubit, .. }
            | Gate::Ry { qubit, .. }
            | Gate::Rz { qubit, .. }
            | Gate::U3 { qubit, .. } => vec![*qubit],

            Gate::Cx { control, target }
            | Gate::Cz { control, target }
            | Gate::CPhase {
                control, target, ..
            } => vec![*control, *target],

            Gate::Swap { a, b } => vec![*a, *b],

            Gate::Ccx {
                control1,
                control2,
                target,
            } => vec![*control1, *control2, *target],

            Gate::Mcz { qubits } => qubits.clone(),
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            Gate::Mcz { qubits } => qubits.len() as u32,
            Gate::Cx { .. } | Gate::Cz { .. } | Gate::CPhase { .. } | Gate::Swap { .. } => 2,
            Gate::Ccx { .. } => 3,
            _ => 1,
        }
    }

    /// Real-valued angles carried by this gate.
    pub fn angles(&self) -> Vec<f64> {
        match self {
            Gate::Phase { theta, .. }
            | Gate::Rx { theta, .. }
            | Gate::Ry { theta, .. }
            | Gate::Rz { theta, .. }
            | Gate::CPhase { theta, .. } => vec![*theta],
            Gate::U3 {
                theta, phi, lambda, ..
            } => vec![*theta, *phi, *lambda],
            _ => vec![],
        }
    }

    /// The inverse gate.
    ///
    /// Self-inverse gates return a copy; S/T swap with their daggers and
    /// rotation angles are negated. The U3 inverse reverses the RZ·RY·RZ
    /// decomposition: U3(θ, φ, λ)⁻¹ = U3(−θ, −λ, −φ).
    #[must_use]
    pub fn inverse(&self) -> Gate {
        match self {
            Gate::S { qubit } => Gate::Sdg { qubit: *qubit },
            Gate::Sdg { qubit } => Gate::S { qubit: *qubit },
            Gate::T { qubit } => Gate::Tdg { qubit: *qubit },
            Gate::Tdg { qubit } => Gate::T { qubit: *qubit },
            Gate::Phase { qubit, theta } => Gate::Phase {
                qubit: *qubit,
                theta: -theta,
            },
            Gate::Rx { qubit, theta } => Gate::Rx {
                qubit: *qubit,
                theta: -theta,
            },
            Gate::Ry { qubit, theta } => Gate::Ry {
                qubit: *qubit,
                theta: -theta,
            },
            Gate::Rz { qubit, theta } => Gate::Rz {
                qubit: *qubit,
                theta: -theta,
            },
            Gate::U3 {
                qubit,
                theta,
                phi,
                lambda,
            } => Gate::U3 {
                qubit: *qubit,
                theta: -theta,
                phi: -lambda,
                lambda: -phi,
            },
            Gate::CPhase {
                control,
                target,
                theta,
            } => Gate::CPhase {
                control: *control,
                target: *target,
                theta: -theta,
            },
            Gate::X { .. }
            | Gate::Y { .. }
            | Gate::Z { .. }
            | Gate::H { .. }
            | Gate::Cx { .. }
            | Gate::Cz { .. }
            | Gate::Swap { .. }
            | Gate::Ccx { .. }
            | Gate::Mcz { .. } => self.clone(),
        }
    }

    /// Check operands against a register of `num_qubits` qubits.
    ///
    /// Fails if any operand is out of range, if an operand repeats, if a
    /// multi-controlled gate has no operands, or if an angle is not finite.
    pub fn validate(&self, num_qubits: u32) -> IrResult<()> {
        let qubits = self.qubits();
        if qubits.is_empty() {
            return Err(IrError::EmptyOperands(self.name().to_string()));
        }
        for (i, q) in qubits.iter().enumerate() {
            if q.0 >= num_qubits {
                return Err(IrError::QubitOutOfRange {
                    qubit: *q,
                    num_qubits,
                    gate_name: Some(self.name().to_string()),
                });
            }
            if qubits[..i].contains(q) {
                return Err(IrError::DuplicateQubit {
                    qubit: *q,
                    gate_name: Some(self.name().to_string()),
                });
            }
        }
        if let Some(value) = self.angles().into_iter().find(|a| !a.is_finite()) {
            return Err(IrError::NonFiniteAngle {
                gate_name: self.name().to_string(),
                value,
            });
        }
        Ok(())
    }

    /// Highest qubit index referenced, or `None` for an empty `Mcz`.
    pub fn max_qubit(&self) -> Option<QubitId> {
        self.qubits().into_iter().max()
    }
}
