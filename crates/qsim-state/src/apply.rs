//! Gate application.
//!
//! Each public entry point validates the gate, clones the input state and
//! runs the kernel on the copy. Kernels walk the full index range and use bit
//! masks to pick out the amplitudes a gate touches.

use num_complex::Complex64;
use std::f64::consts::PI;
use tracing::debug;

use qsim_ir::{Circuit, Gate};

use crate::error::{StateError, StateResult};
use crate::statevector::StateVector;

impl StateVector {
    /// Apply one gate, returning the new state.
    pub fn apply(&self, gate: &Gate) -> StateResult<StateVector> {
        self.check_gate(gate)?;
        let mut next = self.clone();
        next.apply_gate(gate);
        Ok(next)
    }

    /// Apply gates in order, returning the final state.
    ///
    /// All gates share one working copy. If any gate is invalid the error is
    /// returned and `self` is untouched.
    pub fn apply_all<'a>(
        &self,
        gates: impl IntoIterator<Item = &'a Gate>,
    ) -> StateResult<StateVector> {
        let mut next = self.clone();
        for gate in gates {
            next.check_gate(gate)?;
            next.apply_gate(gate);
        }
        Ok(next)
    }

    /// Apply every gate of `circuit`. The circuit width must equal the state
    /// width.
    pub fn run(&self, circuit: &Circuit) -> StateResult<StateVector> {
        let width = circuit.num_qubits() as usize;
        if width != self.num_qubits() {
            return Err(StateError::DimensionMismatch {
                expected: self.num_qubits(),
                got: width,
            });
        }
        debug!(
            circuit = circuit.name(),
            num_qubits = width,
            num_gates = circuit.len(),
            "Running circuit on state vector"
        );
        self.apply_all(circuit.gates())
    }

    fn check_gate(&self, gate: &Gate) -> StateResult<()> {
        let n = self.num_qubits();
        gate.validate(n as u32)
            .map_err(|e| StateError::from_ir(e, n))
    }

    /// Dispatch to the kernel for `gate`. Operands must already be validated.
    fn apply_gate(&mut self, gate: &Gate) {
        match gate {
            // Single-qubit gates
            Gate::X { qubit } => self.apply_x(qubit.index()),
            Gate::Y { qubit } => self.apply_y(qubit.index()),
            Gate::Z { qubit } => self.apply_phase(qubit.index(), PI),
            Gate::H { qubit } => self.apply_h(qubit.index()),
            Gate::S { qubit } => self.apply_phase(qubit.index(), PI / 2.0),
            Gate::Sdg { qubit } => self.apply_phase(qubit.index(), -PI / 2.0),
            Gate::T { qubit } => self.apply_phase(qubit.index(), PI / 4.0),
            Gate::Tdg { qubit } => self.apply_phase(qubit.index(), -PI / 4.0),
            Gate::Phase { qubit, theta } => self.apply_phase(qubit.index(), *theta),
            Gate::Rx { qubit, theta } => self.apply_rx(qubit.index(), *theta),
            Gate::Ry { qubit, theta } => self.apply_ry(qubit.index(), *theta),
            Gate::Rz { qubit, theta } => self.apply_rz(qubit.index(), *theta),
            Gate::U3 {
                qubit,
                theta,
                phi,
                lambda,
            } => {
                // RZ(λ) acts first.
                let q = qubit.index();
                self.apply_rz(q, *lambda);
                self.apply_ry(q, *theta);
                self.apply_rz(q, *phi);
            }

            // Two-qubit gates
            Gate::Cx { control, target } => self.apply_cx(control.mask(), target.index()),
            Gate::Cz { control, target } => {
                self.apply_controlled_phase(control.mask() | target.mask(), PI);
            }
            Gate::CPhase {
                control,
                target,
                theta,
            } => self.apply_controlled_phase(control.mask() | target.mask(), *theta),
            Gate::Swap { a, b } => self.apply_swap(a.index(), b.index()),

            // Three-qubit gates
            Gate::Ccx {
                control1,
                control2,
                target,
            } => self.apply_cx(control1.mask() | control2.mask(), target.index()),

            Gate::Mcz { qubits } => {
                let mask = qubits.iter().fold(0, |m, q| m | q.mask());
                self.apply_controlled_phase(mask, PI);
            }
        }
    }

    // =========================================================================
    // Single-qubit gate implementations
    // =========================================================================

    fn apply_x(&mut self, qubit: usize) {
        self.apply_cx(0, qubit);
    }

    fn apply_y(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let i_val = Complex64::new(0.0, 1.0);
        let amps = self.amplitudes_mut();
        for i in 0..amps.len() {
            if i & mask == 0 {
                let j = i | mask;
                let tmp = amps[i];
                amps[i] = -i_val * amps[j];
                amps[j] = i_val * tmp;
            }
        }
    }

    fn apply_h(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let sqrt2_inv = 1.0 / 2.0_f64.sqrt();
        let amps = self.amplitudes_mut();
        for i in 0..amps.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = amps[i];
                let b = amps[j];
                amps[i] = sqrt2_inv * (a + b);
                amps[j] = sqrt2_inv * (a - b);
            }
        }
    }

    fn apply_phase(&mut self, qubit: usize, theta: f64) {
        self.apply_controlled_phase(1 << qubit, theta);
    }

    fn apply_rx(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        let neg_i_s = Complex64::new(0.0, -s);
        let amps = self.amplitudes_mut();
        for i in 0..amps.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = amps[i];
                let b = amps[j];
                amps[i] = c * a + neg_i_s * b;
                amps[j] = neg_i_s * a + c * b;
            }
        }
    }

    fn apply_ry(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        let amps = self.amplitudes_mut();
        for i in 0..amps.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = amps[i];
                let b = amps[j];
                amps[i] = c * a - s * b;
                amps[j] = s * a + c * b;
            }
        }
    }

    fn apply_rz(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase_0 = Complex64::from_polar(1.0, -theta / 2.0);
        let phase_1 = Complex64::from_polar(1.0, theta / 2.0);
        for (i, amp) in self.amplitudes_mut().iter_mut().enumerate() {
            if i & mask == 0 {
                *amp *= phase_0;
            } else {
                *amp *= phase_1;
            }
        }
    }

    // =========================================================================
    // Controlled gate implementations
    // =========================================================================

    /// Flip `target` on every index whose `ctrl_mask` bits are all set.
    /// An empty mask is a plain X.
    fn apply_cx(&mut self, ctrl_mask: usize, target: usize) {
        let tgt_mask = 1 << target;
        let amps = self.amplitudes_mut();
        for i in 0..amps.len() {
            if (i & ctrl_mask == ctrl_mask) && (i & tgt_mask == 0) {
                let j = i | tgt_mask;
                amps.swap(i, j);
            }
        }
    }

    /// Multiply by e^{iθ} every index whose `mask` bits are all set.
    ///
    /// Covers Phase/S/T/Z (one bit), CZ/CPhase (two bits) and MCZ.
    fn apply_controlled_phase(&mut self, mask: usize, theta: f64) {
        let phase = Complex64::from_polar(1.0, theta);
        for (i, amp) in self.amplitudes_mut().iter_mut().enumerate() {
            if i & mask == mask {
                *amp *= phase;
            }
        }
    }

    fn apply_swap(&mut self, q1: usize, q2: usize) {
        let mask1 = 1 << q1;
        let mask2 = 1 << q2;
        let amps = self.amplitudes_mut();
        for i in 0..amps.len() {
            let b1 = (i & mask1) != 0;
            let b2 = (i & mask2) != 0;
            if b1 && !b2 {
                let j = (i & !mask1) | mask2;
                amps.swap(i, j);
            }
        }
    }
}
