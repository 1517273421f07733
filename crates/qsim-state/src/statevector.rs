//! Dense amplitude vector.

use num_complex::Complex64;

use crate::error::{StateError, StateResult};

/// Largest register a dense vector is allowed to hold (2^30 amplitudes,
/// 16 GiB).
pub const MAX_QUBITS: usize = 30;

/// Tolerance on Σ|a|² used when accepting caller-supplied amplitudes.
pub const NORM_TOLERANCE: f64 = 1e-6;

/// The state of an n-qubit register as 2^n complex amplitudes.
///
/// Index `i` holds the amplitude of the basis state whose bit `q` is the
/// value of qubit `q`. Every public transform borrows the state and returns
/// a new one; nothing mutates a `StateVector` in place from outside the
/// crate.
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl StateVector {
    /// Create a new state vector initialized to |0...0⟩.
    ///
    /// # Panics
    ///
    /// Panics if `num_qubits` is zero or larger than [`MAX_QUBITS`]. Use
    /// [`StateVector::try_new`] for untrusted widths.
    pub fn new(num_qubits: usize) -> Self {
        match Self::try_new(num_qubits) {
            Ok(state) => state,
            Err(e) => panic!("StateVector::new({num_qubits}): {e}"),
        }
    }

    /// Create a new state vector initialized to |0...0⟩.
    pub fn try_new(num_qubits: usize) -> StateResult<Self> {
        Self::basis_state(num_qubits, 0)
    }

    /// The computational basis state |index⟩ on `num_qubits` qubits.
    pub fn basis_state(num_qubits: usize, index: usize) -> StateResult<Self> {
        check_width(num_qubits)?;
        let size = 1usize << num_qubits;
        if index >= size {
            return Err(StateError::IndexOutOfRange {
                index,
                dimension: size,
            });
        }
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[index] = Complex64::new(1.0, 0.0);
        Ok(Self {
            amplitudes,
            num_qubits,
        })
    }

    /// Wrap caller-supplied amplitudes.
    ///
    /// The length must be a power of two (at least 2) and the vector must be
    /// normalised to within [`NORM_TOLERANCE`].
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> StateResult<Self> {
        let len = amplitudes.len();
        if len < 2 || !len.is_power_of_two() {
            return Err(StateError::validation(
                "amplitudes",
                format!("length {len} is not a power of two >= 2"),
            ));
        }
        let num_qubits = len.trailing_zeros() as usize;
        check_width(num_qubits)?;

        if amplitudes.iter().any(|a| !a.re.is_finite() || !a.im.is_finite()) {
            return Err(StateError::validation("amplitudes", "non-finite amplitude"));
        }
        let norm_sqr: f64 = amplitudes.iter().map(Complex64::norm_sqr).sum();
        if (norm_sqr.sqrt() - 1.0).abs() > NORM_TOLERANCE {
            return Err(StateError::validation(
                "amplitudes",
                format!("norm {} is not 1", norm_sqr.sqrt()),
            ));
        }
        Ok(Self {
            amplitudes,
            num_qubits,
        })
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of amplitudes, 2^n.
    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    /// Amplitude of basis state `index`.
    pub fn amplitude(&self, index: usize) -> StateResult<Complex64> {
        self.amplitudes
            .get(index)
            .copied()
            .ok_or(StateError::IndexOutOfRange {
                index,
                dimension: self.dimension(),
            })
    }

    /// All amplitudes in basis-index order.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Consume the state and return its amplitudes.
    pub fn into_amplitudes(self) -> Vec<Complex64> {
        self.amplitudes
    }

    /// Euclidean norm √Σ|a|².
    pub fn norm(&self) -> f64 {
        self.amplitudes
            .iter()
            .map(Complex64::norm_sqr)
            .sum::<f64>()
            .sqrt()
    }

    /// Born-rule probability of every basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Inner product ⟨self|other⟩.
    pub fn inner(&self, other: &StateVector) -> StateResult<Complex64> {
        self.check_same_width(other)?;
        Ok(self
            .amplitudes
            .iter()
            .zip(&other.amplitudes)
            .map(|(a, b)| a.conj() * b)
            .sum())
    }

    /// Fidelity |⟨self|other⟩|².
    pub fn fidelity(&self, other: &StateVector) -> StateResult<f64> {
        Ok(self.inner(other)?.norm_sqr())
    }

    /// True if the two states are equal up to a global phase, i.e. their
    /// fidelity is within `tolerance` of 1.
    pub fn approx_eq_up_to_phase(&self, other: &StateVector, tolerance: f64) -> bool {
        self.fidelity(other)
            .is_ok_and(|f| (f - 1.0).abs() <= tolerance)
    }

    /// Render a basis index as a bitstring whose character `i` is qubit `i`.
    pub fn outcome_to_bitstring(&self, outcome: usize) -> String {
        format!("{:0width$b}", outcome, width = self.num_qubits)
            .chars()
            .rev()
            .collect()
    }

    pub(crate) fn amplitudes_mut(&mut self) -> &mut [Complex64] {
        &mut self.amplitudes
    }

    pub(crate) fn check_same_width(&self, other: &StateVector) -> StateResult<()> {
        if self.num_qubits != other.num_qubits {
            return Err(StateError::DimensionMismatch {
                expected: self.num_qubits,
                got: other.num_qubits,
            });
        }
        Ok(())
    }
}

fn check_width(num_qubits: usize) -> StateResult<()> {
    if num_qubits == 0 {
        return Err(StateError::validation(
            "num_qubits",
            "a state needs at least one qubit",
        ));
    }
    if num_qubits > MAX_QUBITS {
        return Err(StateError::TooManyQubits {
            requested: num_qubits,
            max: MAX_QUBITS,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    #[test]
    fn test_initial_state() {
        let sv = StateVector::new(2);
        assert_eq!(sv.dimension(), 4);
        assert!(approx_eq(sv.amplitude(0).unwrap(), Complex64::new(1.0, 0.0)));
        for i in 1..4 {
            assert!(approx_eq(sv.amplitude(i).unwrap(), Complex64::new(0.0, 0.0)));
        }
        assert_eq!(sv.norm(), 1.0);
    }

    #[test]
    fn test_width_limits() {
        assert!(matches!(
            StateVector::try_new(0),
            Err(StateError::Validation { .. })
        ));
        assert!(matches!(
            StateVector::try_new(MAX_QUBITS + 1),
            Err(StateError::TooManyQubits { requested: 31, max: 30 })
        ));
    }

    #[test]
    fn test_amplitude_out_of_range() {
        let sv = StateVector::new(2);
        assert!(matches!(
            sv.amplitude(4),
            Err(StateError::IndexOutOfRange { index: 4, dimension: 4 })
        ));
    }

    #[test]
    fn test_from_amplitudes_validation() {
        let h = 1.0 / 2.0_f64.sqrt();
        let ok = StateVector::from_amplitudes(vec![Complex64::new(h, 0.0), Complex64::new(0.0, h)]);
        assert_eq!(ok.unwrap().num_qubits(), 1);

        let bad_len = StateVector::from_amplitudes(vec![Complex64::new(1.0, 0.0); 3]);
        assert!(bad_len.is_err());

        let bad_norm = StateVector::from_amplitudes(vec![Complex64::new(1.0, 0.0); 2]);
        assert!(bad_norm.is_err());
    }

    #[test]
    fn test_fidelity_and_phase() {
        let h = 1.0 / 2.0_f64.sqrt();
        let plus = StateVector::from_amplitudes(vec![Complex64::new(h, 0.0); 2]).unwrap();
        let minus_i_plus =
            StateVector::from_amplitudes(vec![Complex64::new(0.0, -h); 2]).unwrap();
        let zero = StateVector::new(1);

        assert!((plus.fidelity(&zero).unwrap() - 0.5).abs() < 1e-12);
        assert!(plus.approx_eq_up_to_phase(&minus_i_plus, 1e-12));
        assert!(!plus.approx_eq_up_to_phase(&zero, 1e-6));
        assert!(matches!(
            plus.inner(&StateVector::new(2)),
            Err(StateError::DimensionMismatch { expected: 1, got: 2 })
        ));
    }

    #[test]
    fn test_outcome_to_bitstring() {
        let sv = StateVector::new(3);
        // Index 1 is qubit 0 set, which is the leftmost character.
        assert_eq!(sv.outcome_to_bitstring(1), "100");
        assert_eq!(sv.outcome_to_bitstring(6), "011");
    }
}
