//! Measurement and collapse.
//!
//! Sampling never touches a global generator: every function that draws a
//! random number takes the caller's `Rng`, so results are reproducible from
//! a seed.

use num_complex::Complex64;
use rand::Rng;
use std::collections::BTreeMap;
use tracing::debug;

use qsim_ir::QubitId;

use crate::error::{StateError, StateResult};
use crate::statevector::StateVector;

/// Collapse probabilities below this are treated as zero.
pub const DEGENERATE_PROBABILITY: f64 = 1e-12;

/// Probability mass on basis states where `qubit` is 1.
pub fn probability_of_one(state: &StateVector, qubit: QubitId) -> StateResult<f64> {
    check_qubit(state, qubit)?;
    let mask = qubit.mask();
    let p1: f64 = state
        .amplitudes()
        .iter()
        .enumerate()
        .filter(|(i, _)| i & mask != 0)
        .map(|(_, a)| a.norm_sqr())
        .sum();
    Ok(p1.clamp(0.0, 1.0))
}

/// `(p0, p1)` for a Z-basis measurement of `qubit`. The pair sums to 1.
pub fn outcome_probabilities(state: &StateVector, qubit: QubitId) -> StateResult<(f64, f64)> {
    let p1 = probability_of_one(state, qubit)?;
    Ok((1.0 - p1, p1))
}

/// Sample one qubit without collapsing the state.
///
/// Draws `u` uniformly from `[0, 1)`; the outcome is 1 iff `u < p1`.
pub fn measure_single_qubit<R: Rng + ?Sized>(
    rng: &mut R,
    qubit: QubitId,
    state: &StateVector,
) -> StateResult<u8> {
    let p1 = probability_of_one(state, qubit)?;
    let u: f64 = rng.r#gen();
    Ok(u8::from(u < p1))
}

/// Project `qubit` onto `outcome` and renormalise.
pub fn collapse_after_measurement(
    qubit: QubitId,
    outcome: u8,
    state: &StateVector,
) -> StateResult<StateVector> {
    if outcome > 1 {
        return Err(StateError::Validation {
            parameter: "outcome".into(),
            message: format!("expected 0 or 1, got {outcome}"),
        });
    }
    let p1 = probability_of_one(state, qubit)?;
    let probability = if outcome == 1 { p1 } else { 1.0 - p1 };
    if probability < DEGENERATE_PROBABILITY {
        return Err(StateError::DegenerateMeasurement {
            qubit: qubit.0,
            outcome,
            probability,
        });
    }

    let mask = qubit.mask();
    let keep_set = outcome == 1;
    let scale = 1.0 / probability.sqrt();
    let mut next = state.clone();
    for (i, amp) in next.amplitudes_mut().iter_mut().enumerate() {
        if (i & mask != 0) == keep_set {
            *amp *= scale;
        } else {
            *amp = Complex64::new(0.0, 0.0);
        }
    }
    Ok(next)
}

/// Sample `qubit` and return the outcome with the collapsed state.
pub fn measure_and_collapse<R: Rng + ?Sized>(
    rng: &mut R,
    qubit: QubitId,
    state: &StateVector,
) -> StateResult<(u8, StateVector)> {
    let outcome = measure_single_qubit(rng, qubit, state)?;
    let collapsed = collapse_after_measurement(qubit, outcome, state)?;
    Ok((outcome, collapsed))
}

/// Sample a full-register basis index. The state is not collapsed.
pub fn measure_computational_basis<R: Rng + ?Sized>(rng: &mut R, state: &StateVector) -> usize {
    CumulativeTable::new(state).sample(rng)
}

/// Draw `shots` full-register samples from one cumulative table.
pub fn sample_counts<R: Rng + ?Sized>(
    rng: &mut R,
    state: &StateVector,
    shots: u64,
) -> BTreeMap<usize, u64> {
    let table = CumulativeTable::new(state);
    let mut counts = BTreeMap::new();
    for _ in 0..shots {
        *counts.entry(table.sample(rng)).or_insert(0) += 1;
    }
    debug!(
        num_qubits = state.num_qubits(),
        shots,
        distinct = counts.len(),
        "Sampled computational basis"
    );
    counts
}

/// Running sum of basis probabilities.
struct CumulativeTable {
    cumulative: Vec<f64>,
    /// Last index with nonzero probability, returned when rounding leaves
    /// the draw above the final running sum.
    fallback: usize,
}

impl CumulativeTable {
    fn new(state: &StateVector) -> Self {
        let mut total = 0.0;
        let mut fallback = 0;
        let cumulative = state
            .amplitudes()
            .iter()
            .enumerate()
            .map(|(i, a)| {
                let p = a.norm_sqr();
                if p > 0.0 {
                    fallback = i;
                }
                total += p;
                total
            })
            .collect();
        Self {
            cumulative,
            fallback,
        }
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let u: f64 = rng.r#gen();
        let idx = self.cumulative.partition_point(|&c| c <= u);
        if idx < self.cumulative.len() {
            idx
        } else {
            self.fallback
        }
    }
}

fn check_qubit(state: &StateVector, qubit: QubitId) -> StateResult<()> {
    if qubit.index() >= state.num_qubits() {
        return Err(StateError::InvalidQubitIndex {
            qubit: qubit.0,
            num_qubits: state.num_qubits(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsim_ir::Gate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_sample_deterministic() {
        // |1⟩ state should always sample to 1
        let sv = StateVector::basis_state(1, 1).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            assert_eq!(measure_computational_basis(&mut rng, &sv), 1);
            assert_eq!(measure_single_qubit(&mut rng, QubitId(0), &sv).unwrap(), 1);
        }
    }

    #[test]
    fn test_fallback_is_last_nonzero() {
        let table = CumulativeTable {
            cumulative: vec![0.5, 0.999_999, 0.999_999],
            fallback: 1,
        };
        // Any draw above the final running sum lands on the fallback.
        struct Fixed;
        impl rand::RngCore for Fixed {
            fn next_u32(&mut self) -> u32 {
                u32::MAX
            }
            fn next_u64(&mut self) -> u64 {
                u64::MAX
            }
            fn fill_bytes(&mut self, dest: &mut [u8]) {
                dest.fill(0xff);
            }
            fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
                dest.fill(0xff);
                Ok(())
            }
        }
        assert_eq!(table.sample(&mut Fixed), 1);
    }

    #[test]
    fn test_collapse_plus_state() {
        let plus = StateVector::new(1)
            .apply(&Gate::H { qubit: QubitId(0) })
            .unwrap();
        let one = collapse_after_measurement(QubitId(0), 1, &plus).unwrap();
        assert!((one.amplitudes()[1].re - 1.0).abs() < 1e-12);
        assert!(one.amplitudes()[0].norm() < 1e-12);
        assert!((one.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_collapse_errors() {
        let zero = StateVector::new(1);
        assert!(matches!(
            collapse_after_measurement(QubitId(0), 1, &zero),
            Err(StateError::DegenerateMeasurement { qubit: 0, outcome: 1, .. })
        ));
        assert!(matches!(
            collapse_after_measurement(QubitId(0), 2, &zero),
            Err(StateError::Validation { .. })
        ));
        assert!(matches!(
            probability_of_one(&zero, QubitId(1)),
            Err(StateError::InvalidQubitIndex { qubit: 1, num_qubits: 1 })
        ));
    }

    #[test]
    fn test_sample_counts_bell() {
        let bell = StateVector::new(2)
            .run(&qsim_ir::Circuit::bell().unwrap())
            .unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let counts = sample_counts(&mut rng, &bell, 2000);
        assert_eq!(counts.values().sum::<u64>(), 2000);
        assert!(counts.keys().all(|&k| k == 0 || k == 3));
        let zeros = counts.get(&0).copied().unwrap_or(0);
        assert!((800..1200).contains(&zeros), "got {zeros}");
    }

    #[test]
    fn test_same_seed_same_samples() {
        let plus = StateVector::new(3)
            .apply_all(&[
                Gate::H { qubit: QubitId(0) },
                Gate::H { qubit: QubitId(1) },
                Gate::H { qubit: QubitId(2) },
            ])
            .unwrap();
        let a = sample_counts(&mut StdRng::seed_from_u64(9), &plus, 100);
        let b = sample_counts(&mut StdRng::seed_from_u64(9), &plus, 100);
        assert_eq!(a, b);
    }
}
