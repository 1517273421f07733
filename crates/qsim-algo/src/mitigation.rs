//! Readout-error mitigation by calibration-matrix inversion.
//!
//! A [`ReadoutCalibration`] holds the 2^n × 2^n matrix `M` with
//! `M[prepared][measured]` the probability of reading `measured` after
//! preparing `prepared`. Observed frequencies `q` relate to the true
//! distribution `p` by `q = Mᵀ p`, so correction applies `(M⁻¹)ᵀ`.
//!
//! Bitstrings follow [`Histogram`]: character `i` is qubit `i`.

use std::collections::BTreeMap;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::debug;

use qsim_hal::Histogram;
use qsim_state::MAX_QUBITS;

use crate::error::{AlgoError, AlgoResult};

/// z-score of a two-sided 95 % interval.
pub const DEFAULT_Z: f64 = 1.96;

/// Rows must sum to 1 within this tolerance.
const ROW_TOLERANCE: f64 = 1e-6;

/// Pivots smaller than this make the matrix singular.
const PIVOT_TOLERANCE: f64 = 1e-12;

/// Calibration matrix and its inverse.
#[derive(Debug, Clone)]
pub struct ReadoutCalibration {
    num_bits: usize,
    matrix: Array2<f64>,
    inverse: Array2<f64>,
    z: f64,
}

impl ReadoutCalibration {
    /// Build from an explicit row-stochastic matrix.
    pub fn from_matrix(matrix: Array2<f64>) -> AlgoResult<Self> {
        let (rows, cols) = matrix.dim();
        if rows != cols {
            return Err(AlgoError::DimensionMismatch {
                expected: rows,
                got: cols,
            });
        }
        if rows < 2 || !rows.is_power_of_two() {
            return Err(AlgoError::validation(
                "matrix",
                format!("dimension {rows} is not a power of two >= 2"),
            ));
        }
        let num_bits = rows.trailing_zeros() as usize;
        if num_bits > MAX_QUBITS {
            return Err(AlgoError::validation(
                "matrix",
                format!("{num_bits} bits exceeds {MAX_QUBITS}"),
            ));
        }
        if let Some(bad) = matrix.iter().find(|v| !(0.0..=1.0).contains(*v)) {
            return Err(AlgoError::validation(
                "matrix",
                format!("entry {bad} is not a probability"),
            ));
        }
        for (i, row) in matrix.rows().into_iter().enumerate() {
            let sum = row.sum();
            if (sum - 1.0).abs() > ROW_TOLERANCE {
                return Err(AlgoError::validation(
                    format!("matrix row {i}"),
                    format!("sums to {sum}, expected 1"),
                ));
            }
        }

        let inverse = invert(&matrix)?;
        debug!(num_bits, "Built readout calibration");
        Ok(Self {
            num_bits,
            matrix,
            inverse,
            z: DEFAULT_Z,
        })
    }

    /// Independent symmetric bit-flip error `p` on each of `num_bits` bits.
    pub fn from_error_rate(num_bits: usize, p: f64) -> AlgoResult<Self> {
        if !(0.0..0.5).contains(&p) {
            return Err(AlgoError::validation(
                "error_rate",
                format!("{p} is outside [0, 0.5)"),
            ));
        }
        check_bits(num_bits)?;
        let dim = 1usize << num_bits;
        let matrix = Array2::from_shape_fn((dim, dim), |(prepared, measured)| {
            let flips = (prepared ^ measured).count_ones() as i32;
            p.powi(flips) * (1.0 - p).powi(num_bits as i32 - flips)
        });
        Self::from_matrix(matrix)
    }

    /// Build from one histogram per prepared basis state.
    ///
    /// `counts[k]` holds the shots observed after preparing basis index `k`.
    pub fn from_calibration_counts(num_bits: usize, counts: &[Histogram]) -> AlgoResult<Self> {
        check_bits(num_bits)?;
        let dim = 1usize << num_bits;
        if counts.len() != dim {
            return Err(AlgoError::DimensionMismatch {
                expected: dim,
                got: counts.len(),
            });
        }
        let mut matrix = Array2::<f64>::zeros((dim, dim));
        for (prepared, histogram) in counts.iter().enumerate() {
            let row = frequencies(histogram, num_bits)?;
            matrix.row_mut(prepared).assign(&row);
        }
        Self::from_matrix(matrix)
    }

    /// Use `z` instead of [`DEFAULT_Z`] for confidence intervals.
    pub fn with_z(mut self, z: f64) -> AlgoResult<Self> {
        if !(z.is_finite() && z > 0.0) {
            return Err(AlgoError::validation("z", format!("{z} must be positive")));
        }
        self.z = z;
        Ok(self)
    }

    /// Number of bits covered.
    pub fn num_bits(&self) -> usize {
        self.num_bits
    }

    /// The calibration matrix (row = prepared, column = measured).
    pub fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    /// Inverse of [`Self::matrix`].
    pub fn inverse(&self) -> &Array2<f64> {
        &self.inverse
    }

    /// Undo readout error on `measured`.
    ///
    /// Negative quasi-probabilities are clipped to zero and the rest
    /// renormalised. Every bitstring that was observed or receives
    /// corrected mass is reported.
    pub fn correct(&self, measured: &Histogram) -> AlgoResult<MitigatedCounts> {
        let shots = measured.total_shots();
        if shots == 0 {
            return Err(AlgoError::validation("histogram", "no shots recorded"));
        }
        let observed = frequencies(measured, self.num_bits)?;
        let raw = self.inverse.t().dot(&observed);

        let clipped = raw.mapv(|v| v.max(0.0));
        let mass = clipped.sum();
        if mass <= 0.0 {
            return Err(AlgoError::validation(
                "histogram",
                "correction left no positive probability",
            ));
        }
        let corrected = clipped / mass;

        let n = shots as f64;
        let mut entries = BTreeMap::new();
        for (index, &probability) in corrected.iter().enumerate() {
            let bitstring = index_to_bitstring(index, self.num_bits);
            if probability <= 0.0 && measured.get(&bitstring) == 0 {
                continue;
            }
            let (lower, upper) = wilson(probability, n, self.z);
            entries.insert(
                bitstring,
                MitigatedCount {
                    count: probability * n,
                    probability,
                    lower: lower * n,
                    upper: upper * n,
                },
            );
        }

        debug!(
            num_bits = self.num_bits,
            shots,
            negative_mass = raw.iter().filter(|v| **v < 0.0).sum::<f64>(),
            "Applied readout correction"
        );
        Ok(MitigatedCounts { shots, entries })
    }
}

/// Corrected count for one bitstring with its confidence interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MitigatedCount {
    /// Corrected shot count.
    pub count: f64,
    /// Corrected probability.
    pub probability: f64,
    /// Lower bound of the interval, in shots.
    pub lower: f64,
    /// Upper bound of the interval, in shots.
    pub upper: f64,
}

/// Output of [`ReadoutCalibration::correct`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MitigatedCounts {
    shots: u64,
    entries: BTreeMap<String, MitigatedCount>,
}

impl MitigatedCounts {
    /// Shots in the uncorrected histogram.
    pub fn shots(&self) -> u64 {
        self.shots
    }

    /// Entry for `bitstring`.
    pub fn get(&self, bitstring: &str) -> Option<&MitigatedCount> {
        self.entries.get(bitstring)
    }

    /// Corrected count for `bitstring`, zero when absent.
    pub fn count(&self, bitstring: &str) -> f64 {
        self.get(bitstring).map_or(0.0, |c| c.count)
    }

    /// Entries in bitstring order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MitigatedCount)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of reported bitstrings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is reported.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn check_bits(num_bits: usize) -> AlgoResult<()> {
    if num_bits == 0 || num_bits > MAX_QUBITS {
        return Err(AlgoError::validation(
            "num_bits",
            format!("must be in 1..={MAX_QUBITS}, got {num_bits}"),
        ));
    }
    Ok(())
}

/// Observed frequencies indexed by basis state.
fn frequencies(histogram: &Histogram, num_bits: usize) -> AlgoResult<Array1<f64>> {
    let width = histogram.num_bits()?;
    if width != num_bits {
        return Err(AlgoError::DimensionMismatch {
            expected: num_bits,
            got: width,
        });
    }
    let amplitudes = histogram.to_amplitudes()?;
    Ok(amplitudes.into_iter().map(|a| a * a).collect())
}

fn index_to_bitstring(index: usize, num_bits: usize) -> String {
    (0..num_bits)
        .map(|i| if (index >> i) & 1 == 1 { '1' } else { '0' })
        .collect()
}

/// Wilson score interval for proportion `p` over `n` trials, widened if
/// needed so that it contains `p`.
fn wilson(p: f64, n: f64, z: f64) -> (f64, f64) {
    let z2 = z * z;
    let denom = 1.0 + z2 / n;
    let centre = (p + z2 / (2.0 * n)) / denom;
    let half_width = z * (p * (1.0 - p) / n + z2 / (4.0 * n * n)).sqrt() / denom;

    let lower = (centre - half_width).max(0.0).min(p);
    let upper = (centre + half_width).min(1.0).max(p);
    (lower, upper)
}

/// Gauss-Jordan inversion with partial pivoting.
fn invert(matrix: &Array2<f64>) -> AlgoResult<Array2<f64>> {
    let n = matrix.nrows();
    let mut a = matrix.clone();
    let mut inv = Array2::<f64>::eye(n);

    for col in 0..n {
        let (pivot_row, pivot) = (col..n)
            .map(|r| (r, a[[r, col]].abs()))
            .fold((col, -1.0), |best, cand| if cand.1 > best.1 { cand } else { best });
        if pivot < PIVOT_TOLERANCE {
            return Err(AlgoError::SingularMatrix { column: col, pivot });
        }
        if pivot_row != col {
            for k in 0..n {
                a.swap([col, k], [pivot_row, k]);
                inv.swap([col, k], [pivot_row, k]);
            }
        }

        let scale = a[[col, col]];
        a.row_mut(col).mapv_inplace(|v| v / scale);
        inv.row_mut(col).mapv_inplace(|v| v / scale);

        for r in 0..n {
            if r == col {
                continue;
            }
            let factor = a[[r, col]];
            if factor == 0.0 {
                continue;
            }
            for k in 0..n {
                let (a_ck, inv_ck) = (a[[col, k]], inv[[col, k]]);
                a[[r, k]] -= factor * a_ck;
                inv[[r, k]] -= factor * inv_ck;
            }
        }
    }
    Ok(inv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn hist(entries: &[(&str, u64)]) -> Histogram {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_invert_roundtrip() {
        let m = array![
            [0.9, 0.1, 0.0, 0.0],
            [0.05, 0.9, 0.05, 0.0],
            [0.0, 0.2, 0.7, 0.1],
            [0.1, 0.0, 0.0, 0.9]
        ];
        let inv = invert(&m).unwrap();
        let product = m.dot(&inv);
        for ((i, j), v) in product.indexed_iter() {
            let expected = if i == j { 1.0 } else { 0.0 };
            assert!((v - expected).abs() < 1e-12, "({i},{j}) = {v}");
        }
    }

    #[test]
    fn test_singular_matrix_rejected() {
        let m = array![[0.5, 0.5], [0.5, 0.5]];
        assert!(matches!(
            ReadoutCalibration::from_matrix(m),
            Err(AlgoError::SingularMatrix { .. })
        ));
    }

    #[test]
    fn test_matrix_validation() {
        assert!(ReadoutCalibration::from_matrix(array![[0.9, 0.2], [0.1, 0.9]]).is_err());
        assert!(ReadoutCalibration::from_matrix(Array2::eye(3)).is_err());
        assert!(ReadoutCalibration::from_matrix(Array2::zeros((2, 3))).is_err());
    }

    #[test]
    fn test_error_rate_matrix() {
        let cal = ReadoutCalibration::from_error_rate(2, 0.1).unwrap();
        let m = cal.matrix();
        assert!((m[[0, 0]] - 0.81).abs() < 1e-12);
        assert!((m[[0, 1]] - 0.09).abs() < 1e-12);
        assert!((m[[0, 3]] - 0.01).abs() < 1e-12);
        assert!(ReadoutCalibration::from_error_rate(1, 0.5).is_err());
    }

    #[test]
    fn test_identity_calibration_is_noop() {
        let cal = ReadoutCalibration::from_error_rate(2, 0.0).unwrap();
        let out = cal.correct(&hist(&[("00", 300), ("10", 700)])).unwrap();
        assert!((out.count("00") - 300.0).abs() < 1e-9);
        assert!((out.count("10") - 700.0).abs() < 1e-9);
        assert_eq!(out.count("11"), 0.0);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_from_calibration_counts() {
        let cal = ReadoutCalibration::from_calibration_counts(
            1,
            &[hist(&[("0", 95), ("1", 5)]), hist(&[("0", 10), ("1", 90)])],
        )
        .unwrap();
        assert!((cal.matrix()[[0, 1]] - 0.05).abs() < 1e-12);
        assert!((cal.matrix()[[1, 0]] - 0.10).abs() < 1e-12);

        assert!(matches!(
            ReadoutCalibration::from_calibration_counts(1, &[hist(&[("0", 1)])]),
            Err(AlgoError::DimensionMismatch { expected: 2, got: 1 })
        ));
    }

    #[test]
    fn test_width_mismatch() {
        let cal = ReadoutCalibration::from_error_rate(1, 0.01).unwrap();
        assert!(matches!(
            cal.correct(&hist(&[("00", 5)])),
            Err(AlgoError::DimensionMismatch { expected: 1, got: 2 })
        ));
    }

    #[test]
    fn test_wilson_contains_estimate() {
        for &p in &[0.0, 0.001, 0.5, 0.999, 1.0] {
            let (lo, hi) = wilson(p, 1000.0, DEFAULT_Z);
            assert!(lo <= p && p <= hi);
            assert!(lo < hi);
            assert!(lo >= 0.0 && hi <= 1.0);
        }
    }
}
