//! Hamiltonian data structures.
//!
//! A Hamiltonian is a sum of weighted Pauli strings:
//!
//!   H = Σ_k  c_k · P_k
//!
//! where each P_k is a tensor product of single-qubit Pauli operators
//! (X, Y, Z) and c_k ∈ ℝ. Terms are kept in the order given; Trotter
//! slices apply them in that order.
//!
//! # Example
//!
//! ```rust
//! use qsim_evolve::hamiltonian::{Hamiltonian, PauliOp, PauliString, PauliTerm};
//!
//! // H = -1.0·Z₀Z₁  +  0.5·X₀
//! let h = Hamiltonian::new(2, vec![
//!     PauliTerm::new(-1.0, PauliString::from_ops(vec![(0, PauliOp::Z), (1, PauliOp::Z)])),
//!     PauliTerm::new( 0.5, PauliString::from_ops(vec![(0, PauliOp::X)])),
//! ]).unwrap();
//! assert_eq!(h.n_terms(), 2);
//! assert_eq!(h.lambda(), 1.5);
//! ```

use serde::{Deserialize, Serialize};

use qsim_ir::{Gate, QubitId};
use qsim_state::StateVector;

use crate::error::{EvolveError, EvolveResult};

/// Single-qubit Pauli operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PauliOp {
    /// Identity. Accepted on input and dropped.
    I,
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
}

impl PauliOp {
    /// The corresponding gate on `qubit`, or `None` for the identity.
    pub fn gate(self, qubit: u32) -> Option<Gate> {
        let qubit = QubitId(qubit);
        match self {
            PauliOp::I => None,
            PauliOp::X => Some(Gate::X { qubit }),
            PauliOp::Y => Some(Gate::Y { qubit }),
            PauliOp::Z => Some(Gate::Z { qubit }),
        }
    }
}

/// A tensor product of Pauli operators on named qubits.
///
/// Stored as a `Vec<(qubit_index, PauliOp)>` in caller order with Identity
/// factors omitted. Qubits not listed are implicitly I.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PauliString {
    ops: Vec<(u32, PauliOp)>,
}

impl PauliString {
    /// Construct a PauliString from an iterator of (qubit, op) pairs.
    ///
    /// Identity operators are dropped; the remaining order is kept.
    pub fn from_ops(ops: impl IntoIterator<Item = (u32, PauliOp)>) -> Self {
        Self {
            ops: ops
                .into_iter()
                .filter(|(_, op)| *op != PauliOp::I)
                .collect(),
        }
    }

    /// The non-identity (qubit, op) pairs.
    pub fn ops(&self) -> &[(u32, PauliOp)] {
        &self.ops
    }

    /// True if there are no non-identity operators (pure global phase).
    pub fn is_identity(&self) -> bool {
        self.ops.is_empty()
    }

    /// The highest qubit index referenced, or `None` for an identity string.
    pub fn max_qubit(&self) -> Option<u32> {
        self.ops.iter().map(|(q, _)| *q).max()
    }

    /// The string as a gate sequence (P applied as an operator).
    pub fn gates(&self) -> impl Iterator<Item = Gate> + '_ {
        self.ops.iter().filter_map(|&(q, op)| op.gate(q))
    }
}

/// A single weighted Pauli term: `coeff · pauli`.
#[derive(Debug, Clone, PartialEq)]
pub struct PauliTerm {
    /// Real coefficient.
    pub coeff: f64,
    /// The Pauli string.
    pub pauli: PauliString,
}

impl PauliTerm {
    /// Create a new term.
    pub fn new(coeff: f64, pauli: PauliString) -> Self {
        Self { coeff, pauli }
    }

    /// Shorthand: single-qubit Z term.
    pub fn z(qubit: u32, coeff: f64) -> Self {
        Self::new(coeff, PauliString::from_ops([(qubit, PauliOp::Z)]))
    }

    /// Shorthand: ZZ coupling term.
    pub fn zz(q0: u32, q1: u32, coeff: f64) -> Self {
        Self::new(
            coeff,
            PauliString::from_ops([(q0, PauliOp::Z), (q1, PauliOp::Z)]),
        )
    }

    /// Shorthand: single-qubit X term.
    pub fn x(qubit: u32, coeff: f64) -> Self {
        Self::new(coeff, PauliString::from_ops([(qubit, PauliOp::X)]))
    }

    /// Shorthand: single-qubit Y term.
    pub fn y(qubit: u32, coeff: f64) -> Self {
        Self::new(coeff, PauliString::from_ops([(qubit, PauliOp::Y)]))
    }

    /// ⟨ψ|P|ψ⟩ for this term's Pauli string, without the coefficient.
    pub fn pauli_expectation(&self, state: &StateVector) -> EvolveResult<f64> {
        let gates: Vec<Gate> = self.pauli.gates().collect();
        let applied = state.apply_all(&gates)?;
        Ok(state.inner(&applied)?.re)
    }
}

/// A sum-of-Pauli-strings Hamiltonian over a fixed number of qubits.
///
/// H = Σ_k  c_k · P_k
///
/// Construction validates every term, so a `Hamiltonian` never references
/// a qubit outside `0..num_qubits` and no term repeats a qubit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HamiltonianSpec", into = "HamiltonianSpec")]
pub struct Hamiltonian {
    num_qubits: u32,
    terms: Vec<PauliTerm>,
}

impl Hamiltonian {
    /// Create from a list of terms, validating each against `num_qubits`.
    pub fn new(num_qubits: u32, terms: Vec<PauliTerm>) -> EvolveResult<Self> {
        if num_qubits == 0 {
            return Err(EvolveError::validation(
                "num_qubits",
                "a Hamiltonian needs at least one qubit",
            ));
        }
        for (k, term) in terms.iter().enumerate() {
            validate_term(k, term, num_qubits)?;
        }
        Ok(Self { num_qubits, terms })
    }

    /// The zero Hamiltonian on `num_qubits` qubits.
    pub fn empty(num_qubits: u32) -> EvolveResult<Self> {
        Self::new(num_qubits, vec![])
    }

    /// Parse the JSON form (`{"num_qubits": .., "terms": [..]}`).
    pub fn from_json(json: &str) -> EvolveResult<Self> {
        let spec: HamiltonianSpec = serde_json::from_str(json)?;
        Self::try_from(spec)
    }

    /// All terms in application order.
    pub fn terms(&self) -> &[PauliTerm] {
        &self.terms
    }

    /// Number of terms.
    pub fn n_terms(&self) -> usize {
        self.terms.len()
    }

    /// Number of qubits the Hamiltonian acts on.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// True if there are no terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Spectral norm upper bound: Σ |c_k| (used by QDrift).
    pub fn lambda(&self) -> f64 {
        self.terms.iter().map(|t| t.coeff.abs()).sum()
    }

    /// Energy ⟨ψ|H|ψ⟩.
    pub fn expectation(&self, state: &StateVector) -> EvolveResult<f64> {
        self.check_width(state)?;
        self.terms.iter().try_fold(0.0, |acc, term| {
            Ok(acc + term.coeff * term.pauli_expectation(state)?)
        })
    }

    pub(crate) fn check_width(&self, state: &StateVector) -> EvolveResult<()> {
        if self.num_qubits as usize != state.num_qubits() {
            return Err(EvolveError::DimensionMismatch {
                expected: self.num_qubits as usize,
                got: state.num_qubits(),
            });
        }
        Ok(())
    }
}

fn validate_term(k: usize, term: &PauliTerm, num_qubits: u32) -> EvolveResult<()> {
    let parameter = format!("terms[{k}]");
    if !term.coeff.is_finite() {
        return Err(EvolveError::validation(
            parameter,
            format!("coefficient {} is not finite", term.coeff),
        ));
    }
    let ops = term.pauli.ops();
    for (i, &(q, _)) in ops.iter().enumerate() {
        if q >= num_qubits {
            return Err(EvolveError::validation(
                parameter,
                format!("qubit {q} out of range for {num_qubits} qubits"),
            ));
        }
        if ops[..i].iter().any(|&(p, _)| p == q) {
            return Err(EvolveError::validation(
                parameter,
                format!("qubit {q} appears twice"),
            ));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Serialized form
// ---------------------------------------------------------------------------

/// One term in serialized form: parallel `qubits` and `paulis` arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermSpec {
    /// Real coefficient.
    pub coefficient: f64,
    /// Qubit indices.
    pub qubits: Vec<u32>,
    /// Pauli letter per qubit.
    pub paulis: Vec<PauliOp>,
}

/// Serialized Hamiltonian.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HamiltonianSpec {
    /// Number of qubits.
    pub num_qubits: u32,
    /// Terms in application order.
    #[serde(default)]
    pub terms: Vec<TermSpec>,
}

impl TryFrom<HamiltonianSpec> for Hamiltonian {
    type Error = EvolveError;

    fn try_from(spec: HamiltonianSpec) -> EvolveResult<Self> {
        let terms = spec
            .terms
            .into_iter()
            .enumerate()
            .map(|(k, t)| {
                if t.qubits.len() != t.paulis.len() {
                    return Err(EvolveError::validation(
                        format!("terms[{k}]"),
                        format!(
                            "{} qubits but {} paulis",
                            t.qubits.len(),
                            t.paulis.len()
                        ),
                    ));
                }
                let ops = t.qubits.into_iter().zip(t.paulis);
                Ok(PauliTerm::new(t.coefficient, PauliString::from_ops(ops)))
            })
            .collect::<EvolveResult<Vec<_>>>()?;
        Hamiltonian::new(spec.num_qubits, terms)
    }
}

impl From<Hamiltonian> for HamiltonianSpec {
    fn from(h: Hamiltonian) -> Self {
        Self {
            num_qubits: h.num_qubits,
            terms: h
                .terms
                .into_iter()
                .map(|t| TermSpec {
                    coefficient: t.coeff,
                    qubits: t.pauli.ops().iter().map(|(q, _)| *q).collect(),
                    paulis: t.pauli.ops().iter().map(|(_, p)| *p).collect(),
                })
                .collect(),
        }
    }
}
