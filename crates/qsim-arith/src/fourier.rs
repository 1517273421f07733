//! Fourier-basis phase encoding of a register.
//!
//! After [`phase_encode`] a register holding `x` has qubit `j` in
//! (|0⟩ + e^{2πi·x/2^{j+1}}|1⟩)/√2. Adding a constant is then a set of
//! single-qubit phase rotations, and [`phase_decode`] returns to the
//! computational basis. No swaps are used, so qubit `j` keeps weight 2^j
//! throughout.

use std::f64::consts::PI;

use qsim_ir::{Circuit, Gate};

use crate::error::ArithResult;
use crate::register::QubitRegister;

/// Angle 2π / 2^k.
pub(crate) fn turn_fraction(k: usize) -> f64 {
    2.0 * PI / (1u64 << k) as f64
}

/// Gates taking `register` from |x⟩ to its phase encoding.
pub fn encode_gates(register: &QubitRegister) -> Vec<Gate> {
    let qubits = register.qubits();
    let mut gates = Vec::with_capacity(qubits.len() * (qubits.len() + 1) / 2);
    for j in (0..qubits.len()).rev() {
        gates.push(Gate::H { qubit: qubits[j] });
        for m in 0..j {
            gates.push(Gate::CPhase {
                control: qubits[m],
                target: qubits[j],
                theta: turn_fraction(j + 1 - m),
            });
        }
    }
    gates
}

/// Append the phase encoding of `register`.
pub fn phase_encode(circuit: &mut Circuit, register: &QubitRegister) -> ArithResult<()> {
    register.check_width()?;
    for gate in encode_gates(register) {
        circuit.push(gate)?;
    }
    Ok(())
}

/// Append the inverse of [`phase_encode`].
pub fn phase_decode(circuit: &mut Circuit, register: &QubitRegister) -> ArithResult<()> {
    register.check_width()?;
    for gate in encode_gates(register).iter().rev() {
        circuit.push(gate.inverse())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_count() {
        let mut circuit = Circuit::new("t", 0);
        let reg = QubitRegister::new(&mut circuit, 4);
        // 4 H + 3 + 2 + 1 controlled phases.
        assert_eq!(encode_gates(&reg).len(), 10);
    }

    #[test]
    fn test_decode_mirrors_encode() {
        let mut circuit = Circuit::new("t", 0);
        let reg = QubitRegister::new(&mut circuit, 3);
        phase_encode(&mut circuit, &reg).unwrap();
        let encoded = circuit.len();
        phase_decode(&mut circuit, &reg).unwrap();

        let gates = circuit.gates();
        for i in 0..encoded {
            assert_eq!(gates[encoded + i], gates[encoded - 1 - i].inverse());
        }
    }
}
