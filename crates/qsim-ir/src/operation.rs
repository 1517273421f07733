//! Operations that can be submitted to a backend.
//!
//! An [`Operation`] is a superset of [`Gate`]: besides unitary gates and
//! measurements it names operations belonging to other hardware families
//! (neutral-atom shuttling, annealing schedules). Gate-based engines reject
//! those with an error rather than ignoring them.

use serde::{Deserialize, Serialize};

use crate::circuit::Circuit;
use crate::gate::Gate;
use crate::qubit::QubitId;

/// A backend-level operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// A unitary gate.
    Gate {
        /// The gate to apply.
        gate: Gate,
    },
    /// Projective Z-basis measurement of one qubit, collapsing the state.
    Measure {
        /// Qubit to measure.
        qubit: QubitId,
    },
    /// Operations applied in order.
    Sequence {
        /// Child operations.
        ops: Vec<Operation>,
    },
    /// Shuttle qubit between zones (neutral-atom architectures).
    Shuttle {
        /// Qubit being moved.
        qubit: QubitId,
        /// Source zone index.
        from_zone: u32,
        /// Destination zone index.
        to_zone: u32,
    },
    /// Annealing schedule of the given duration.
    Anneal {
        /// Schedule duration in nanoseconds.
        duration_ns: u64,
    },
}

impl Operation {
    /// Wrap a gate.
    pub fn gate(gate: Gate) -> Self {
        Operation::Gate { gate }
    }

    /// Measure one qubit.
    pub fn measure(qubit: QubitId) -> Self {
        Operation::Measure { qubit }
    }

    /// Sequence of operations.
    pub fn sequence(ops: impl IntoIterator<Item = Operation>) -> Self {
        Operation::Sequence {
            ops: ops.into_iter().collect(),
        }
    }

    /// Every gate of `circuit` as one sequence.
    pub fn from_circuit(circuit: &Circuit) -> Self {
        Self::sequence(circuit.gates().iter().cloned().map(Self::gate))
    }

    /// Short name used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Gate { gate } => gate.name(),
            Operation::Measure { .. } => "measure",
            Operation::Sequence { .. } => "sequence",
            Operation::Shuttle { .. } => "shuttle",
            Operation::Anneal { .. } => "anneal",
        }
    }

    /// True if this operation (recursively) only contains gates and
    /// measurements.
    pub fn is_gate_based(&self) -> bool {
        match self {
            Operation::Gate { .. } | Operation::Measure { .. } => true,
            Operation::Sequence { ops } => ops.iter().all(Operation::is_gate_based),
            Operation::Shuttle { .. } | Operation::Anneal { .. } => false,
        }
    }

    /// The first operation in depth-first order that is not gate-based.
    pub fn first_foreign(&self) -> Option<&Operation> {
        match self {
            Operation::Gate { .. } | Operation::Measure { .. } => None,
            Operation::Sequence { ops } => ops.iter().find_map(Operation::first_foreign),
            Operation::Shuttle { .. } | Operation::Anneal { .. } => Some(self),
        }
    }
}

impl From<Gate> for Operation {
    fn from(gate: Gate) -> Self {
        Operation::gate(gate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_based_recursion() {
        let inner = Operation::sequence([
            Operation::gate(Gate::H { qubit: QubitId(0) }),
            Operation::measure(QubitId(0)),
        ]);
        assert!(inner.is_gate_based());
        assert!(inner.first_foreign().is_none());

        let shuttle = Operation::Shuttle {
            qubit: QubitId(0),
            from_zone: 0,
            to_zone: 1,
        };
        let outer = Operation::sequence([inner, Operation::sequence([shuttle.clone()])]);
        assert!(!outer.is_gate_based());
        assert_eq!(outer.first_foreign(), Some(&shuttle));
    }

    #[test]
    fn test_from_circuit() {
        let circuit = Circuit::bell().unwrap();
        let op = Operation::from_circuit(&circuit);
        match op {
            Operation::Sequence { ops } => {
                assert_eq!(ops.len(), 2);
                assert_eq!(ops[0].name(), "h");
                assert_eq!(ops[1].name(), "cx");
            }
            other => panic!("expected sequence, got {other:?}"),
        }
    }

    #[test]
    fn test_serde_anneal() {
        let op: Operation = serde_json::from_str(r#"{"op":"anneal","duration_ns":2000}"#).unwrap();
        assert_eq!(op, Operation::Anneal { duration_ns: 2000 });
        assert_eq!(op.name(), "anneal");
    }
}
