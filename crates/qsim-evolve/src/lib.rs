//! `qsim-evolve`: Hamiltonian time evolution.
//!
//! Evolves a [`qsim_state::StateVector`] under a sum-of-Paulis Hamiltonian
//! by synthesising a product-formula circuit and running it:
//!
//! - **Trotter-Suzuki** product formulas (first- and second-order)
//! - **QDrift** randomised product formula (Campbell 2019)
//!
//! # Quick start
//!
//! ```rust
//! use qsim_evolve::hamiltonian::{Hamiltonian, PauliTerm};
//! use qsim_evolve::trotter::{EvolutionConfig, TrotterOrder, simulate};
//! use qsim_state::StateVector;
//!
//! // Transverse-field Ising model: H = -J·ZZ - h·X
//! let h = Hamiltonian::new(2, vec![
//!     PauliTerm::zz(0, 1, -1.0),   // -J ZZ
//!     PauliTerm::x(0, -0.5),       // -h X₀
//!     PauliTerm::x(1, -0.5),       // -h X₁
//! ]).unwrap();
//!
//! let config = EvolutionConfig::new(1.0, 10).with_order(TrotterOrder::Second);
//! let evolved = simulate(&h, &StateVector::new(2), &config).unwrap();
//! assert!((evolved.norm() - 1.0).abs() < 1e-6);
//! ```

pub mod error;
pub mod hamiltonian;
pub mod qdrift;
pub mod synthesis;
pub mod trotter;

pub use error::{EvolveError, EvolveResult};
pub use hamiltonian::{Hamiltonian, HamiltonianSpec, PauliOp, PauliString, PauliTerm, TermSpec};
pub use qdrift::QDriftEvolution;
pub use trotter::{EvolutionConfig, TrotterEvolution, TrotterOrder, simulate};
