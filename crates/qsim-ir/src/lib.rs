//! qsim Circuit Intermediate Representation
//!
//! Core data structures shared by every qsim crate: qubit identifiers, the
//! closed [`Gate`] enum, the [`Circuit`] builder and the backend-level
//! [`Operation`].
//!
//! # Conventions
//!
//! Qubit `i` is bit `i` of a basis-state index, so `QubitId(0)` is the least
//! significant bit. Gates are validated against the circuit width when they
//! are added.
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use qsim_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::new("bell_state", 2);
//!
//! // |00⟩ → (|00⟩ + |11⟩)/√2
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.depth(), 2);
//! ```
//!
//! # Example: Invalid Operands
//!
//! ```rust
//! use qsim_ir::{Circuit, IrError, QubitId};
//!
//! let mut circuit = Circuit::new("small", 1);
//! let err = circuit.cx(QubitId(0), QubitId(1)).unwrap_err();
//! assert!(matches!(err, IrError::QubitOutOfRange { .. }));
//! ```

pub mod circuit;
pub mod error;
pub mod gate;
pub mod operation;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::Gate;
pub use operation::Operation;
pub use qubit::QubitId;
