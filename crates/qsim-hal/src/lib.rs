//! qsim Hardware Abstraction Layer
//!
//! A common [`Backend`] trait for engines that evolve a quantum state one
//! [`Operation`](qsim_ir::Operation) at a time, plus the [`Histogram`] type
//! shared by everything that reports measurement counts.
//!
//! # Supported Backends
//!
//! | Backend | Crate | Native state |
//! |---------|-------|--------------|
//! | Local state-vector simulator | `qsim-adapter-sim` | gate-based |
//!
//! # Example: Histograms
//!
//! ```rust
//! use qsim_hal::Histogram;
//!
//! // Basis indices 0 (|00⟩) and 3 (|11⟩) from a two-qubit register.
//! let counts = Histogram::from_outcomes(2, [(0, 510), (3, 490)]);
//! assert_eq!(counts.total_shots(), 1000);
//! assert_eq!(counts.most_frequent(), Some(("00", 510)));
//! ```

pub mod backend;
pub mod error;
pub mod result;

pub use backend::{Backend, BackendConfig, BackendFactory, CancellationSignal, NativeStateType};
pub use error::{HalError, HalResult};
pub use result::{Histogram, MAX_AMPLITUDE_BITS};
