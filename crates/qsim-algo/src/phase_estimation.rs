//! Quantum phase estimation.
//!
//! Qubits `0..t` form the counting register and the remaining qubits hold
//! the eigenstate. Counting qubit `j` controls U^(2^(t-1-j)); the inverse
//! Fourier encoding of [`qsim_arith::phase_decode`] then leaves the
//! counting register holding y ≈ φ·2^t, little-endian.

use std::f64::consts::TAU;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use qsim_arith::{QubitRegister, phase_decode};
use qsim_ir::{Circuit, QubitId};
use qsim_state::{MAX_QUBITS, StateVector, measure};

use crate::error::{AlgoError, AlgoResult};

/// Appends controlled-U^power from `control` onto the target register.
pub type ControlledPower =
    Box<dyn Fn(&mut Circuit, QubitId, &QubitRegister, u64) -> AlgoResult<()> + Send + Sync>;

/// Prepares the eigenstate on the target register.
pub type Preparation = Box<dyn Fn(&mut Circuit, &QubitRegister) -> AlgoResult<()> + Send + Sync>;

/// One phase-estimation readout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseEstimate {
    /// Counting-register value y.
    pub outcome: u64,
    /// Estimated phase y / 2^t, in turns.
    pub phase: f64,
    /// Probability of reading `outcome`.
    pub probability: f64,
}

/// Phase estimation for a unitary given as a controlled-power closure.
pub struct PhaseEstimation {
    precision: usize,
    target_width: usize,
    controlled_power: ControlledPower,
    preparation: Option<Preparation>,
}

impl fmt::Debug for PhaseEstimation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhaseEstimation")
            .field("precision", &self.precision)
            .field("target_width", &self.target_width)
            .field("prepared", &self.preparation.is_some())
            .finish_non_exhaustive()
    }
}

impl PhaseEstimation {
    /// Estimate with `precision` counting qubits over a `target_width`
    /// eigenstate register.
    pub fn new<F>(precision: usize, target_width: usize, controlled_power: F) -> AlgoResult<Self>
    where
        F: Fn(&mut Circuit, QubitId, &QubitRegister, u64) -> AlgoResult<()>
            + Send
            + Sync
            + 'static,
    {
        if precision == 0 {
            return Err(AlgoError::validation("precision", "must be at least 1"));
        }
        if target_width == 0 {
            return Err(AlgoError::validation("target_width", "must be at least 1"));
        }
        if precision + target_width > MAX_QUBITS {
            return Err(AlgoError::validation(
                "precision",
                format!(
                    "{precision} counting + {target_width} target qubits exceeds {MAX_QUBITS}"
                ),
            ));
        }
        Ok(Self {
            precision,
            target_width,
            controlled_power: Box::new(controlled_power),
            preparation: None,
        })
    }

    /// Run `preparation` on the target register before the counting stage.
    #[must_use]
    pub fn with_preparation<F>(mut self, preparation: F) -> Self
    where
        F: Fn(&mut Circuit, &QubitRegister) -> AlgoResult<()> + Send + Sync + 'static,
    {
        self.preparation = Some(Box::new(preparation));
        self
    }

    /// Phase estimation of Phase(θ) on its |1⟩ eigenstate, φ = θ / 2π.
    pub fn for_phase_gate(theta: f64, precision: usize) -> AlgoResult<Self> {
        if !theta.is_finite() {
            return Err(AlgoError::validation("theta", format!("{theta} is not finite")));
        }
        let estimation = Self::new(precision, 1, move |circuit, control, target, power| {
            let qubit = first_qubit(target)?;
            circuit.cp((theta * power as f64).rem_euclid(TAU), control, qubit)?;
            Ok(())
        })?;
        Ok(estimation.with_preparation(|circuit, target| {
            circuit.x(first_qubit(target)?)?;
            Ok(())
        }))
    }

    /// Number of counting qubits.
    pub fn precision(&self) -> usize {
        self.precision
    }

    /// Qubits `0..precision`.
    pub fn counting_register(&self) -> QubitRegister {
        QubitRegister::from_qubits((0..self.precision as u32).map(QubitId)).with_label("counting")
    }

    /// Qubits above the counting register.
    pub fn target_register(&self) -> QubitRegister {
        let start = self.precision as u32;
        QubitRegister::from_qubits((start..start + self.target_width as u32).map(QubitId))
            .with_label("target")
    }

    /// The full estimation circuit.
    pub fn circuit(&self) -> AlgoResult<Circuit> {
        let counting = self.counting_register();
        let target = self.target_register();
        let mut circuit = Circuit::new("qpe", (self.precision + self.target_width) as u32);

        if let Some(prepare) = &self.preparation {
            prepare(&mut circuit, &target)?;
        }
        for qubit in counting.iter() {
            circuit.h(qubit)?;
        }
        for (j, control) in counting.iter().enumerate() {
            let power = 1u64 << (self.precision - 1 - j);
            (self.controlled_power)(&mut circuit, control, &target, power)?;
        }
        phase_decode(&mut circuit, &counting)?;

        debug!(
            precision = self.precision,
            target_width = self.target_width,
            gates = circuit.len(),
            "Built phase estimation circuit"
        );
        Ok(circuit)
    }

    /// Probability of each counting-register value.
    pub fn outcome_probabilities(&self) -> AlgoResult<Vec<f64>> {
        Ok(self.marginal(&self.final_state()?))
    }

    /// Sample the counting register once.
    pub fn estimate<R: Rng + ?Sized>(&self, rng: &mut R) -> AlgoResult<PhaseEstimate> {
        let state = self.final_state()?;
        let marginal = self.marginal(&state);
        let index = measure::measure_computational_basis(rng, &state);
        let outcome = index & self.counting_mask();
        Ok(self.readout(outcome, marginal[outcome]))
    }

    /// The most probable readout. Ties go to the smaller value.
    pub fn most_likely(&self) -> AlgoResult<PhaseEstimate> {
        let marginal = self.outcome_probabilities()?;
        let (outcome, probability) = marginal
            .iter()
            .copied()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (y, p)| {
                if p > best.1 { (y, p) } else { best }
            });
        Ok(self.readout(outcome, probability))
    }

    fn final_state(&self) -> AlgoResult<StateVector> {
        let circuit = self.circuit()?;
        let state = StateVector::try_new(circuit.num_qubits() as usize)?;
        Ok(state.run(&circuit)?)
    }

    fn counting_mask(&self) -> usize {
        (1usize << self.precision) - 1
    }

    fn marginal(&self, state: &StateVector) -> Vec<f64> {
        let mask = self.counting_mask();
        let mut marginal = vec![0.0; mask + 1];
        for (index, p) in state.probabilities().into_iter().enumerate() {
            marginal[index & mask] += p;
        }
        marginal
    }

    fn readout(&self, outcome: usize, probability: f64) -> PhaseEstimate {
        PhaseEstimate {
            outcome: outcome as u64,
            phase: outcome as f64 / (1u64 << self.precision) as f64,
            probability,
        }
    }
}

fn first_qubit(register: &QubitRegister) -> AlgoResult<QubitId> {
    register
        .qubit(0)
        .ok_or_else(|| AlgoError::validation("target", "register is empty"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_circuit_layout() {
        let qpe = PhaseEstimation::for_phase_gate(PI / 2.0, 3).unwrap();
        let circuit = qpe.circuit().unwrap();
        assert_eq!(circuit.num_qubits(), 4);
        assert_eq!(qpe.counting_register().qubits(), &[QubitId(0), QubitId(1), QubitId(2)]);
        assert_eq!(qpe.target_register().qubits(), &[QubitId(3)]);
        // X prep, 3 H, 3 controlled powers, 3 H + 3 controlled phases.
        assert_eq!(circuit.len(), 1 + 3 + 3 + 6);
    }

    #[test]
    fn test_exact_dyadic_phase() {
        // Phase(π/2) has φ = 1/4; with 3 bits y = 2.
        let qpe = PhaseEstimation::for_phase_gate(PI / 2.0, 3).unwrap();
        let best = qpe.most_likely().unwrap();
        assert_eq!(best.outcome, 2);
        assert!((best.phase - 0.25).abs() < 1e-12);
        assert!((best.probability - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_dyadic_phase_peaks_near_value() {
        let qpe = PhaseEstimation::for_phase_gate(TAU * 0.3, 6).unwrap();
        let best = qpe.most_likely().unwrap();
        assert_eq!(best.outcome, 19);
        assert!((best.phase - 0.3).abs() < 1.0 / 64.0);
        assert!(best.probability > 4.0 / (PI * PI));

        let total: f64 = qpe.outcome_probabilities().unwrap().iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            PhaseEstimation::for_phase_gate(1.0, 0),
            Err(AlgoError::Validation { .. })
        ));
        assert!(PhaseEstimation::for_phase_gate(f64::NAN, 4).is_err());
        assert!(PhaseEstimation::for_phase_gate(1.0, MAX_QUBITS).is_err());
    }
}
