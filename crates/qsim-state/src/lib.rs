//! qsim dense state-vector engine.
//!
//! [`StateVector`] holds the 2^n amplitudes of an n-qubit register.
//! Gates from [`qsim_ir`] are applied with [`StateVector::apply`] and
//! friends; the [`measure`] module samples outcomes and collapses states
//! using a caller-supplied random generator.
//!
//! ```rust
//! use qsim_ir::{Circuit, QubitId};
//! use qsim_state::{StateVector, measure};
//! use rand::SeedableRng;
//!
//! let bell = StateVector::new(2).run(&Circuit::bell().unwrap()).unwrap();
//! let (p0, p1) = measure::outcome_probabilities(&bell, QubitId(0)).unwrap();
//! assert!((p0 - 0.5).abs() < 1e-12 && (p1 - 0.5).abs() < 1e-12);
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//! let outcome = measure::measure_computational_basis(&mut rng, &bell);
//! assert!(outcome == 0 || outcome == 3);
//! ```

mod apply;
pub mod error;
pub mod measure;
pub mod statevector;

pub use error::{StateError, StateResult};
pub use statevector::{MAX_QUBITS, NORM_TOLERANCE, StateVector};
