//! qsim Local State-Vector Backend
//!
//! [`LocalSimulator`] implements [`qsim_hal::Backend`] on top of the dense
//! [`StateVector`](qsim_state::StateVector). It evolves one state per call
//! chain, records mid-circuit measurements, and samples histograms with a
//! seedable generator.
//!
//! # Memory
//!
//! | Qubits | Amplitudes |
//! |--------|------------|
//! | 10 | ~16 KB |
//! | 20 | ~16 MB |
//! | 25 | ~512 MB |
//! | 30 | ~16 GB |
//!
//! # Example
//!
//! ```rust
//! use qsim_adapter_sim::{LocalSimulator, SimulatorConfig};
//! use qsim_ir::Circuit;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let backend = LocalSimulator::with_config(SimulatorConfig {
//!     seed: Some(42),
//!     ..SimulatorConfig::default()
//! });
//! let counts = backend.run(&Circuit::bell().unwrap(), Some(1000)).await.unwrap();
//! assert_eq!(counts.get("00") + counts.get("11"), 1000);
//! # });
//! ```

mod config;
mod simulator;

pub use config::{ConfigError, ENV_MAX_QUBITS, ENV_SEED, ENV_SHOTS, SimulatorConfig};
pub use simulator::{LocalSimulator, LocalState};
