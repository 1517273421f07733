//! Measurement histograms.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{HalError, HalResult};

/// Widest histogram [`Histogram::to_amplitudes`] will expand into a dense
/// vector.
pub const MAX_AMPLITUDE_BITS: usize = 30;

/// Shot counts keyed by bitstring.
///
/// Character `i` of a key (left to right) is the outcome of qubit `i`, so
/// `"01"` means qubit 0 read 0 and qubit 1 read 1 (basis index 2).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Histogram {
    counts: FxHashMap<String, u64>,
}

impl Histogram {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(basis_index, count)` pairs over a `num_qubits` register.
    pub fn from_outcomes(
        num_qubits: usize,
        outcomes: impl IntoIterator<Item = (usize, u64)>,
    ) -> Self {
        let mut histogram = Self::new();
        for (index, count) in outcomes {
            histogram.insert(index_to_bitstring(index, num_qubits), count);
        }
        histogram
    }

    /// Add `count` shots to `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        *self.counts.entry(bitstring.into()).or_insert(0) += count;
    }

    /// Shots recorded for `bitstring`.
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Total number of shots.
    pub fn total_shots(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct bitstrings.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True if no shots were recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate over `(bitstring, count)` in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Entries by descending count, ties broken by bitstring.
    pub fn sorted(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    /// The most frequent bitstring. Ties go to the smallest bitstring.
    pub fn most_frequent(&self) -> Option<(&str, u64)> {
        self.sorted().into_iter().next()
    }

    /// Counts normalised by total shots. Empty when no shots were recorded.
    pub fn probabilities(&self) -> FxHashMap<String, f64> {
        let total = self.total_shots();
        if total == 0 {
            return FxHashMap::default();
        }
        self.counts
            .iter()
            .map(|(k, &v)| (k.clone(), v as f64 / total as f64))
            .collect()
    }

    /// Add every count of `other` into this histogram.
    pub fn merge(&mut self, other: &Histogram) {
        for (bitstring, count) in other.iter() {
            self.insert(bitstring, count);
        }
    }

    /// Width of the bitstrings, checking they all agree and contain only
    /// `0` and `1`.
    pub fn num_bits(&self) -> HalResult<usize> {
        let mut width = None;
        for key in self.counts.keys() {
            if let Some(c) = key.chars().find(|c| *c != '0' && *c != '1') {
                return Err(HalError::validation(
                    "bitstring",
                    format!("'{key}' contains '{c}'"),
                ));
            }
            match width {
                None => width = Some(key.len()),
                Some(w) if w != key.len() => {
                    return Err(HalError::validation(
                        "bitstring",
                        format!("'{key}' has length {}, expected {w}", key.len()),
                    ));
                }
                Some(_) => {}
            }
        }
        width.ok_or_else(|| HalError::validation("histogram", "no outcomes recorded"))
    }

    /// Real amplitudes √p consistent with the observed frequencies.
    ///
    /// Entry `j` corresponds to the basis index whose bit `i` is character
    /// `i` of the bitstring. Phases are not recoverable from counts, so all
    /// amplitudes are non-negative.
    pub fn to_amplitudes(&self) -> HalResult<Vec<f64>> {
        let width = self.num_bits()?;
        if width > MAX_AMPLITUDE_BITS {
            return Err(HalError::validation(
                "bitstring",
                format!("{width} bits exceeds the maximum of {MAX_AMPLITUDE_BITS}"),
            ));
        }
        let total = self.total_shots();
        if total == 0 {
            return Err(HalError::validation("histogram", "total shot count is zero"));
        }

        let mut amplitudes = vec![0.0; 1usize << width];
        for (key, count) in self.iter() {
            amplitudes[bitstring_to_index(key)] = (count as f64 / total as f64).sqrt();
        }
        Ok(amplitudes)
    }
}

impl FromIterator<(String, u64)> for Histogram {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        let mut histogram = Self::new();
        for (bitstring, count) in iter {
            histogram.insert(bitstring, count);
        }
        histogram
    }
}

fn index_to_bitstring(index: usize, num_qubits: usize) -> String {
    (0..num_qubits)
        .map(|i| if (index >> i) & 1 == 1 { '1' } else { '0' })
        .collect()
}

/// Callers validate `bitstring` first.
fn bitstring_to_index(bitstring: &str) -> usize {
    bitstring
        .bytes()
        .enumerate()
        .filter(|(_, b)| *b == b'1')
        .fold(0, |acc, (i, _)| acc | (1 << i))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hist(entries: &[(&str, u64)]) -> Histogram {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_from_outcomes_bit_order() {
        let h = Histogram::from_outcomes(3, [(1, 5), (4, 2), (1, 1)]);
        assert_eq!(h.get("100"), 6);
        assert_eq!(h.get("001"), 2);
        assert_eq!(h.total_shots(), 8);
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn test_sorted_and_most_frequent() {
        let h = hist(&[("10", 3), ("01", 7), ("11", 3)]);
        assert_eq!(h.sorted(), vec![("01", 7), ("10", 3), ("11", 3)]);
        assert_eq!(h.most_frequent(), Some(("01", 7)));
        assert_eq!(Histogram::new().most_frequent(), None);
    }

    #[test]
    fn test_probabilities() {
        let h = hist(&[("0", 1), ("1", 3)]);
        let p = h.probabilities();
        assert!((p["0"] - 0.25).abs() < 1e-12);
        assert!((p["1"] - 0.75).abs() < 1e-12);
        assert!(Histogram::new().probabilities().is_empty());
    }

    #[test]
    fn test_bell_amplitudes() {
        let h = hist(&[("00", 500), ("11", 500)]);
        let amps = h.to_amplitudes().unwrap();
        let r = 0.5f64.sqrt();
        assert_eq!(amps.len(), 4);
        assert!((amps[0] - r).abs() < 1e-12);
        assert!((amps[3] - r).abs() < 1e-12);
        assert_eq!(amps[1], 0.0);
        assert_eq!(amps[2], 0.0);
    }

    #[test]
    fn test_amplitude_index_uses_qubit_order() {
        let h = hist(&[("01", 1)]);
        let amps = h.to_amplitudes().unwrap();
        assert_eq!(amps[2], 1.0);
    }

    #[test]
    fn test_to_amplitudes_rejects_bad_keys() {
        assert!(hist(&[("00", 1), ("1", 1)]).to_amplitudes().is_err());
        assert!(hist(&[("0x", 1)]).to_amplitudes().is_err());
        assert!(Histogram::new().to_amplitudes().is_err());
        assert!(hist(&[("0", 0)]).to_amplitudes().is_err());
    }

    #[test]
    fn test_merge_and_serde() {
        let mut a = hist(&[("0", 2)]);
        a.merge(&hist(&[("0", 1), ("1", 4)]));
        assert_eq!(a.get("0"), 3);
        assert_eq!(a.get("1"), 4);

        let json = serde_json::to_string(&a).unwrap();
        let back: Histogram = serde_json::from_str(&json).unwrap();
        assert_eq!(back, a);
    }
}
