//! High-level circuit builder API.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::Gate;
use crate::qubit::QubitId;

/// A quantum circuit: a qubit count and an ordered sequence of gates.
///
/// Every gate is validated against the circuit width when it is added, so a
/// `Circuit` never references a qubit it does not own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    #[serde(default = "default_name")]
    name: String,
    /// Number of qubits.
    num_qubits: u32,
    /// Gates in application order.
    #[serde(default)]
    gates: Vec<Gate>,
}

fn default_name() -> String {
    "circuit".into()
}

impl Circuit {
    /// Create an empty circuit over `num_qubits` qubits.
    pub fn new(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            gates: vec![],
        }
    }

    /// Build a circuit from a list of gates, validating each one.
    pub fn from_gates(
        name: impl Into<String>,
        num_qubits: u32,
        gates: impl IntoIterator<Item = Gate>,
    ) -> IrResult<Self> {
        let mut circuit = Self::new(name, num_qubits);
        for gate in gates {
            circuit.push(gate)?;
        }
        Ok(circuit)
    }

    /// Allocate `size` fresh qubits at the top of the register.
    pub fn add_qubits(&mut self, size: u32) -> Vec<QubitId> {
        let start = self.num_qubits;
        self.num_qubits += size;
        (start..self.num_qubits).map(QubitId).collect()
    }

    /// Append a gate after validating it against the circuit width.
    pub fn push(&mut self, gate: Gate) -> IrResult<&mut Self> {
        gate.validate(self.num_qubits)?;
        self.gates.push(gate);
        Ok(self)
    }

    /// Append every gate of `other`. Widths must match.
    pub fn append(&mut self, other: &Circuit) -> IrResult<&mut Self> {
        if other.num_qubits > self.num_qubits {
            return Err(IrError::WidthMismatch {
                expected: self.num_qubits,
                got: other.num_qubits,
            });
        }
        for gate in &other.gates {
            self.push(gate.clone())?;
        }
        Ok(self)
    }

    /// The inverse circuit: gates reversed and individually inverted.
    #[must_use]
    pub fn inverse(&self) -> Circuit {
        Circuit {
            name: format!("{}_dg", self.name),
            num_qubits: self.num_qubits,
            gates: self.gates.iter().rev().map(Gate::inverse).collect(),
        }
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Gate::H { qubit })
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Gate::X { qubit })
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Gate::Y { qubit })
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Gate::Z { qubit })
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Gate::S { qubit })
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Gate::Sdg { qubit })
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Gate::T { qubit })
    }

    /// Apply T-dagger gate.
    pub fn tdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Gate::Tdg { qubit })
    }

    /// Apply phase gate.
    pub fn p(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Gate::Phase { qubit, theta })
    }

    /// Apply Rx rotation gate.
    pub fn rx(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Gate::Rx { qubit, theta })
    }

    /// Apply Ry rotation gate.
    pub fn ry(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Gate::Ry { qubit, theta })
    }

    /// Apply Rz rotation gate.
    pub fn rz(&mut self, theta: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Gate::Rz { qubit, theta })
    }

    /// Apply U3 gate.
    pub fn u3(&mut self, theta: f64, phi: f64, lambda: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push(Gate::U3 {
            qubit,
            theta,
            phi,
            lambda,
        })
    }

    // =========================================================================
    // Multi-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(Gate::Cx { control, target })
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(Gate::Cz { control, target })
    }

    /// Apply controlled-phase gate.
    pub fn cp(&mut self, theta: f64, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.push(Gate::CPhase {
            control,
            target,
            theta,
        })
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, a: QubitId, b: QubitId) -> IrResult<&mut Self> {
        self.push(Gate::Swap { a, b })
    }

    /// Apply Toffoli (CCX) gate.
    pub fn ccx(
        &mut self,
        control1: QubitId,
        control2: QubitId,
        target: QubitId,
    ) -> IrResult<&mut Self> {
        self.push(Gate::Ccx {
            control1,
            control2,
            target,
        })
    }

    /// Apply a multi-controlled Z over `qubits`.
    pub fn mcz(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.push(Gate::Mcz {
            qubits: qubits.into_iter().collect(),
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Gates in application order.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Number of gates.
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// True if the circuit contains no gates.
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Circuit depth: the longest chain of gates sharing a qubit.
    pub fn depth(&self) -> usize {
        let mut layer = vec![0usize; self.num_qubits as usize];
        let mut depth = 0;
        for gate in &self.gates {
            let qubits = gate.qubits();
            let next = qubits.iter().map(|q| layer[q.index()]).max().unwrap_or(0) + 1;
            for q in &qubits {
                layer[q.index()] = next;
            }
            depth = depth.max(next);
        }
        depth
    }

    /// Re-check every gate against the circuit width.
    ///
    /// Circuits built through the API are always valid; this is for
    /// circuits deserialized from untrusted input.
    pub fn validate(&self) -> IrResult<()> {
        self.gates
            .iter()
            .try_for_each(|gate| gate.validate(self.num_qubits))
    }

    // =========================================================================
    // Pre-built circuits
    // =========================================================================

    /// Create a Bell state circuit.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::new("bell", 2);
        circuit.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?;
        Ok(circuit)
    }

    /// Create a GHZ state circuit.
    pub fn ghz(n: u32) -> IrResult<Self> {
        let mut circuit = Self::new("ghz", n);
        if n == 0 {
            return Ok(circuit);
        }

        circuit.h(QubitId(0))?;
        for i in 0..n - 1 {
            circuit.cx(QubitId(i), QubitId(i + 1))?;
        }
        Ok(circuit)
    }
}

impl<'a> IntoIterator for &'a Circuit {
    type Item = &'a Gate;
    type IntoIter = std::slice::Iter<'a, Gate>;

    fn into_iter(self) -> Self::IntoIter {
        self.gates.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_new_circuit() {
        let circuit = Circuit::new("test", 3);
        assert_eq!(circuit.name(), "test");
        assert_eq!(circuit.num_qubits(), 3);
        assert!(circuit.is_empty());
        assert_eq!(circuit.depth(), 0);
    }

    #[test]
    fn test_bell_state() {
        let circuit = Circuit::bell().unwrap();
        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.len(), 2);
        assert_eq!(circuit.depth(), 2);
    }

    #[test]
    fn test_ghz_state() {
        let circuit = Circuit::ghz(5).unwrap();
        assert_eq!(circuit.num_qubits(), 5);
        assert_eq!(circuit.len(), 5);
        assert_eq!(circuit.depth(), 5);
    }

    #[test]
    fn test_fluent_api() {
        let mut circuit = Circuit::new("test", 3);
        circuit
            .h(QubitId(0))
            .unwrap()
            .h(QubitId(1))
            .unwrap()
            .ccx(QubitId(0), QubitId(1), QubitId(2))
            .unwrap();

        // Both H gates share layer 1.
        assert_eq!(circuit.depth(), 2);
    }

    #[test]
    fn test_push_rejects_out_of_range() {
        let mut circuit = Circuit::new("test", 2);
        let err = circuit.cx(QubitId(0), QubitId(2)).unwrap_err();
        assert!(matches!(err, IrError::QubitOutOfRange { .. }));
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_add_qubits() {
        let mut circuit = Circuit::new("test", 2);
        let reg = circuit.add_qubits(3);
        assert_eq!(reg, vec![QubitId(2), QubitId(3), QubitId(4)]);
        assert_eq!(circuit.num_qubits(), 5);
    }

    #[test]
    fn test_inverse_reverses_and_inverts() {
        let mut circuit = Circuit::new("test", 2);
        circuit
            .h(QubitId(0))
            .unwrap()
            .t(QubitId(1))
            .unwrap()
            .cp(PI / 3.0, QubitId(0), QubitId(1))
            .unwrap();

        let inv = circuit.inverse();
        assert_eq!(
            inv.gates(),
            &[
                Gate::CPhase {
                    control: QubitId(0),
                    target: QubitId(1),
                    theta: -PI / 3.0
                },
                Gate::Tdg { qubit: QubitId(1) },
                Gate::H { qubit: QubitId(0) },
            ]
        );
    }

    #[test]
    fn test_append_width_mismatch() {
        let mut small = Circuit::new("small", 1);
        let big = Circuit::ghz(3).unwrap();
        assert!(matches!(
            small.append(&big),
            Err(IrError::WidthMismatch { expected: 1, got: 3 })
        ));
    }

    #[test]
    fn test_json_roundtrip_validates() {
        let json = r#"{"name":"bad","num_qubits":1,"gates":[{"gate":"cx","control":0,"target":1}]}"#;
        let circuit: Circuit = serde_json::from_str(json).unwrap();
        assert!(circuit.validate().is_err());
    }
}
