//! Gate synthesis for a single Pauli rotation `exp(-i·c·t·P)`.
//!
//! Each factor of P is rotated into the Z basis (H for X, Sdg then H for Y),
//! a CX ladder collects the joint parity on the last operand, `Rz(2ct)` acts
//! there, and the ladder and basis rotations are then undone in reverse.
//! A k-qubit term costs 2(k-1) CX, at most 4k basis gates and one Rz.

use qsim_ir::{Circuit, QubitId};

use crate::error::EvolveResult;
use crate::hamiltonian::{PauliOp, PauliTerm};

/// Append the circuit for `exp(-i · coeff · t · P)` to `circuit`.
///
/// Operands are bounds-checked by the circuit builder. If the Pauli string
/// is the identity the function is a no-op (global phase).
pub fn append_exp_pauli(circuit: &mut Circuit, term: &PauliTerm, t: f64) -> EvolveResult<()> {
    let ops = term.pauli.ops();
    let Some(&(last, _)) = ops.last() else {
        return Ok(());
    };

    // Rz(θ) = exp(-iθZ/2)
    let theta = 2.0 * term.coeff * t;
    let qubits: Vec<u32> = ops.iter().map(|(q, _)| *q).collect();

    basis_change(circuit, ops, false)?;
    cnot_ladder(circuit, &qubits)?;
    circuit.rz(theta, QubitId(last))?;
    cnot_ladder_reverse(circuit, &qubits)?;
    basis_change(circuit, ops, true)?;

    Ok(())
}

/// Rotate every X or Y factor into the Z basis, or back when `undo` is set.
fn basis_change(circuit: &mut Circuit, ops: &[(u32, PauliOp)], undo: bool) -> EvolveResult<()> {
    for &(q, op) in ops {
        let qid = QubitId(q);
        match (op, undo) {
            (PauliOp::X, _) => {
                circuit.h(qid)?;
            }
            (PauliOp::Y, false) => {
                circuit.sdg(qid)?.h(qid)?;
            }
            (PauliOp::Y, true) => {
                circuit.h(qid)?.s(qid)?;
            }
            (PauliOp::Z | PauliOp::I, _) => {}
        }
    }
    Ok(())
}

/// CX(q[0],q[1]), CX(q[1],q[2]), …, CX(q[k-2], q[k-1]).
///
/// Leaves the parity of all qubits on the last one.
fn cnot_ladder(circuit: &mut Circuit, qubits: &[u32]) -> EvolveResult<()> {
    for window in qubits.windows(2) {
        circuit.cx(QubitId(window[0]), QubitId(window[1]))?;
    }
    Ok(())
}

/// The ladder run backwards, which undoes [`cnot_ladder`].
fn cnot_ladder_reverse(circuit: &mut Circuit, qubits: &[u32]) -> EvolveResult<()> {
    for window in qubits.windows(2).rev() {
        circuit.cx(QubitId(window[0]), QubitId(window[1]))?;
    }
    Ok(())
}
