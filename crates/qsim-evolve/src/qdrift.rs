//! Randomised product formulas (QDrift).
//!
//! Instead of cycling through every term, QDrift draws N terms at random,
//! term k with weight |c_k| / λ where λ = Σ|c_k|, and applies each one as
//! `exp(-i·sign(c_k)·τ·P_k)` with the fixed step τ = λt/N. The channel error
//! scales as O(λ²t²/N), independent of the number of terms.
//!
//! See Campbell, PRL 123, 070503 (2019).

use rand::Rng;
use tracing::debug;

use qsim_ir::Circuit;
use qsim_state::StateVector;

use crate::error::{EvolveError, EvolveResult};
use crate::hamiltonian::{Hamiltonian, PauliTerm};
use crate::synthesis::append_exp_pauli;

/// Random-sampling evolution of one Hamiltonian for a fixed time.
pub struct QDriftEvolution<'a> {
    hamiltonian: &'a Hamiltonian,
    /// Total evolution time t.
    t: f64,
    /// Number of random samples N.
    n_samples: usize,
}

impl<'a> QDriftEvolution<'a> {
    /// Evolve under `hamiltonian` for time `t` using `n_samples` draws.
    ///
    /// Arguments are checked when a circuit is built.
    pub fn new(hamiltonian: &'a Hamiltonian, t: f64, n_samples: usize) -> Self {
        Self {
            hamiltonian,
            t,
            n_samples,
        }
    }

    /// Synthesise a QDrift circuit, drawing terms from `rng`.
    ///
    /// The same seed always yields the same circuit.
    pub fn circuit_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> EvolveResult<Circuit> {
        self.validate()?;

        let n_qubits = self.hamiltonian.num_qubits();
        let mut circuit = Circuit::new("qdrift", n_qubits);
        let lambda = self.hamiltonian.lambda();
        if lambda == 0.0 {
            // No terms or all coefficients zero: identity.
            return Ok(circuit);
        }

        let tau = lambda * self.t / self.n_samples as f64;
        debug!(
            n_terms = self.hamiltonian.n_terms(),
            n_samples = self.n_samples,
            lambda,
            tau,
            n_qubits,
            "synthesising QDrift circuit"
        );

        let weights: Vec<f64> = self
            .hamiltonian
            .terms()
            .iter()
            .map(|t| t.coeff.abs() / lambda)
            .collect();

        for _ in 0..self.n_samples {
            let k = sample_index(&weights, rng);
            let original = &self.hamiltonian.terms()[k];
            let sampled = PauliTerm::new(original.coeff.signum(), original.pauli.clone());
            append_exp_pauli(&mut circuit, &sampled, tau)?;
        }

        Ok(circuit)
    }

    /// Evolve `state` with one randomly drawn QDrift circuit.
    pub fn simulate_with_rng<R: Rng + ?Sized>(
        &self,
        state: &StateVector,
        rng: &mut R,
    ) -> EvolveResult<StateVector> {
        self.hamiltonian.check_width(state)?;
        let circuit = self.circuit_with_rng(rng)?;
        Ok(state.run(&circuit)?)
    }

    fn validate(&self) -> EvolveResult<()> {
        if self.n_samples == 0 {
            return Err(EvolveError::InvalidSamples(0));
        }
        if !self.t.is_finite() {
            return Err(EvolveError::validation(
                "time",
                format!("{} is not finite", self.t),
            ));
        }
        Ok(())
    }
}

/// Draw an index from normalised `weights` by inverting the running sum.
fn sample_index<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> usize {
    let u: f64 = rng.r#gen();
    let mut cumsum = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumsum += w;
        if u < cumsum {
            return i;
        }
    }
    // Rounding can leave the running sum just below 1.
    weights.len() - 1
}
