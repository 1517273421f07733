//! Algorithms built on the qsim engine.
//!
//! - [`phase_estimation`]: quantum phase estimation for a unitary supplied
//!   as a controlled-power closure, read out with a caller-supplied `Rng`.
//! - [`mitigation`]: readout-error correction of measured histograms by
//!   calibration-matrix inversion, with Wilson-score intervals.
//!
//! ```rust
//! use qsim_algo::PhaseEstimation;
//! use std::f64::consts::PI;
//!
//! // The T gate has eigenphase 1/8 on |1⟩.
//! let qpe = PhaseEstimation::for_phase_gate(PI / 4.0, 8).unwrap();
//! let best = qpe.most_likely().unwrap();
//! assert_eq!(best.outcome, 32);
//! assert!((best.phase - 0.125).abs() < 1e-12);
//! ```

pub mod error;
pub mod mitigation;
pub mod phase_estimation;

pub use error::{AlgoError, AlgoResult};
pub use mitigation::{DEFAULT_Z, MitigatedCount, MitigatedCounts, ReadoutCalibration};
pub use phase_estimation::{ControlledPower, PhaseEstimate, PhaseEstimation, Preparation};
