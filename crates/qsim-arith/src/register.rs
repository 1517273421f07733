//! Qubit register management for arithmetic.

use qsim_ir::{Circuit, QubitId};
use serde::{Deserialize, Serialize};

use crate::error::{ArithError, ArithResult};

/// Widest register the classical helpers can describe with a `u64`.
pub const MAX_REGISTER_WIDTH: usize = 63;

/// A register of qubits representing an unsigned integer.
///
/// Qubits are ordered from LSB (index 0) to MSB (index N-1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QubitRegister {
    /// Qubits, bit 0 first.
    qubits: Vec<QubitId>,
    /// Label for this register (for logs).
    label: Option<String>,
}

impl QubitRegister {
    /// Allocate `size` new qubits at the top of `circuit` as a register.
    pub fn new(circuit: &mut Circuit, size: usize) -> Self {
        Self {
            qubits: circuit.add_qubits(size as u32),
            label: None,
        }
    }

    /// Wrap existing qubits, least significant first.
    pub fn from_qubits(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            qubits: qubits.into_iter().collect(),
            label: None,
        }
    }

    /// Create a register with a label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Get the label if set.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Register width.
    pub fn len(&self) -> usize {
        self.qubits.len()
    }

    /// Whether the register holds no qubits.
    pub fn is_empty(&self) -> bool {
        self.qubits.is_empty()
    }

    /// Qubits, least significant first.
    pub fn qubits(&self) -> &[QubitId] {
        &self.qubits
    }

    /// Qubit carrying bit `index`, if any.
    pub fn qubit(&self, index: usize) -> Option<QubitId> {
        self.qubits.get(index).copied()
    }

    /// Iterate over qubits.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = QubitId> + ExactSizeIterator + '_ {
        self.qubits.iter().copied()
    }

    /// True if `qubit` belongs to this register.
    pub fn contains(&self, qubit: QubitId) -> bool {
        self.qubits.contains(&qubit)
    }

    /// 2^width, the modulus of register arithmetic.
    pub fn modulus(&self) -> u64 {
        1u64 << self.len()
    }

    /// The integer this register holds inside computational basis index
    /// `basis_index` of the full state.
    pub fn value_in(&self, basis_index: usize) -> u64 {
        self.qubits
            .iter()
            .enumerate()
            .filter(|(_, q)| basis_index & q.mask() != 0)
            .fold(0, |acc, (bit, _)| acc | (1 << bit))
    }

    /// Fail unless the width is in `1..=MAX_REGISTER_WIDTH`.
    pub(crate) fn check_width(&self) -> ArithResult<()> {
        if self.is_empty() || self.len() > MAX_REGISTER_WIDTH {
            return Err(ArithError::InvalidBitWidth(self.len()));
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a QubitRegister {
    type Item = &'a QubitId;
    type IntoIter = std::slice::Iter<'a, QubitId>;

    fn into_iter(self) -> Self::IntoIter {
        self.qubits.iter()
    }
}

/// Set `register` to the classical `value` by flipping its 1 bits.
///
/// Assumes the register starts in |0⟩.
pub fn prepare_value(circuit: &mut Circuit, register: &QubitRegister, value: u64) -> ArithResult<()> {
    register.check_width()?;
    if value >= register.modulus() {
        return Err(ArithError::Overflow {
            value,
            width: register.len(),
        });
    }
    for (bit, qubit) in register.iter().enumerate() {
        if (value >> bit) & 1 == 1 {
            circuit.x(qubit)?;
        }
    }
    Ok(())
}

/// Fail if any qubit appears twice across `groups`.
pub(crate) fn check_distinct<'a>(groups: impl IntoIterator<Item = &'a [QubitId]>) -> ArithResult<()> {
    let mut seen: Vec<QubitId> = Vec::new();
    for q in groups.into_iter().flatten() {
        if seen.contains(q) {
            return Err(ArithError::DuplicateQubit(*q));
        }
        seen.push(*q);
    }
    Ok(())
}
