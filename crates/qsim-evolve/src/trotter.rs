//! Product-formula time evolution and the [`simulate`] entry point.
//!
//! [`simulate`] evolves a [`StateVector`] under a [`Hamiltonian`] for
//! `config.time`, split into `config.steps` slices of length dt. Within a
//! slice every term is exponentiated with [`append_exp_pauli`]:
//!
//! - [`TrotterOrder::First`] applies the terms once each, in array order.
//!   The error per unit time shrinks as dt.
//! - [`TrotterOrder::Second`] applies them forward for dt/2 and then in
//!   reverse for dt/2 (the symmetric Strang splitting), with error shrinking
//!   as dt².
//!
//! [`TrotterEvolution::circuit`] exposes the synthesised gates without
//! running them.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use qsim_ir::Circuit;
use qsim_state::StateVector;

use crate::error::{EvolveError, EvolveResult};
use crate::hamiltonian::Hamiltonian;
use crate::synthesis::append_exp_pauli;

/// Norm drift tolerated after evolution before a warning is logged.
const NORM_DRIFT_WARN: f64 = 1e-6;

/// Product-formula order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrotterOrder {
    /// Lie-Trotter: every term once per slice.
    #[default]
    First,
    /// Strang splitting: forward half-step then reverse half-step.
    Second,
}

impl TrotterOrder {
    /// Look up an order by its number (1 or 2).
    pub fn from_number(order: u8) -> Option<Self> {
        match order {
            1 => Some(TrotterOrder::First),
            2 => Some(TrotterOrder::Second),
            _ => None,
        }
    }
}

/// Parameters of a Trotterized evolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Total evolution time t.
    pub time: f64,
    /// Number of Trotter slices (higher → more accurate).
    #[serde(default = "default_steps")]
    pub steps: usize,
    /// Product-formula order.
    #[serde(default)]
    pub order: TrotterOrder,
}

fn default_steps() -> usize {
    1
}

impl EvolutionConfig {
    /// First-order evolution for `time` over `steps` slices.
    pub fn new(time: f64, steps: usize) -> Self {
        Self {
            time,
            steps,
            order: TrotterOrder::First,
        }
    }

    /// Switch the product-formula order.
    #[must_use]
    pub fn with_order(mut self, order: TrotterOrder) -> Self {
        self.order = order;
        self
    }

    fn validate(&self) -> EvolveResult<()> {
        if self.steps == 0 {
            return Err(EvolveError::InvalidSteps(0));
        }
        if !self.time.is_finite() {
            return Err(EvolveError::validation(
                "time",
                format!("{} is not finite", self.time),
            ));
        }
        Ok(())
    }
}

/// Trotter product-formula synthesiser.
pub struct TrotterEvolution<'a> {
    hamiltonian: &'a Hamiltonian,
    config: EvolutionConfig,
}

impl<'a> TrotterEvolution<'a> {
    /// Construct a synthesiser for `hamiltonian` under `config`.
    pub fn new(hamiltonian: &'a Hamiltonian, config: EvolutionConfig) -> Self {
        Self {
            hamiltonian,
            config,
        }
    }

    /// The synthesised gate sequence.
    ///
    /// An empty Hamiltonian yields an empty circuit of the Hamiltonian's
    /// width.
    pub fn circuit(&self) -> EvolveResult<Circuit> {
        self.config.validate()?;
        match self.config.order {
            TrotterOrder::First => self.first_order(),
            TrotterOrder::Second => self.second_order(),
        }
    }

    fn first_order(&self) -> EvolveResult<Circuit> {
        let n_qubits = self.hamiltonian.num_qubits();
        let step_t = self.config.time / self.config.steps as f64;

        let mut circuit = Circuit::new("trotter1", n_qubits);
        debug!(
            n_terms = self.hamiltonian.n_terms(),
            steps = self.config.steps,
            n_qubits,
            "synthesising first-order Trotter circuit"
        );

        for _ in 0..self.config.steps {
            for term in self.hamiltonian.terms() {
                append_exp_pauli(&mut circuit, term, step_t)?;
            }
        }
        Ok(circuit)
    }

    fn second_order(&self) -> EvolveResult<Circuit> {
        let n_qubits = self.hamiltonian.num_qubits();
        let half_t = self.config.time / (2.0 * self.config.steps as f64);

        let mut circuit = Circuit::new("trotter2", n_qubits);
        debug!(
            n_terms = self.hamiltonian.n_terms(),
            steps = self.config.steps,
            n_qubits,
            "synthesising second-order Trotter circuit"
        );

        for _ in 0..self.config.steps {
            // Forward sweep: exp(-i c_k P_k τ/2)  for k = 0..n
            for term in self.hamiltonian.terms() {
                append_exp_pauli(&mut circuit, term, half_t)?;
            }
            // Reverse sweep: exp(-i c_k P_k τ/2)  for k = n-1..0
            for term in self.hamiltonian.terms().iter().rev() {
                append_exp_pauli(&mut circuit, term, half_t)?;
            }
        }
        Ok(circuit)
    }
}

/// Evolve `state` under `hamiltonian` for `config.time`.
///
/// Returns a new state; `state` is not modified. A Hamiltonian with no terms
/// returns an unchanged copy.
pub fn simulate(
    hamiltonian: &Hamiltonian,
    state: &StateVector,
    config: &EvolutionConfig,
) -> EvolveResult<StateVector> {
    hamiltonian.check_width(state)?;
    config.validate()?;
    if hamiltonian.is_empty() {
        return Ok(state.clone());
    }

    let circuit = TrotterEvolution::new(hamiltonian, *config).circuit()?;
    let evolved = state.run(&circuit)?;

    let norm = evolved.norm();
    debug!(
        time = config.time,
        steps = config.steps,
        order = ?config.order,
        num_gates = circuit.len(),
        norm,
        "Evolved state"
    );
    if (norm - 1.0).abs() > NORM_DRIFT_WARN {
        warn!(norm, "Norm drifted during evolution");
    }
    Ok(evolved)
}
