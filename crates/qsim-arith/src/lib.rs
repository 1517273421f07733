//! Reversible constant arithmetic for qsim.
//!
//! Every primitive appends gates to a [`qsim_ir::Circuit`]. Registers are
//! little-endian ([`QubitRegister`], index 0 is the LSB) and arithmetic
//! wraps modulo 2^width.
//!
//! - [`fourier`]: phase encoding shared by the adders and by phase
//!   estimation
//! - [`adder`]: singly and doubly controlled add/subtract of a constant,
//!   and a doubly controlled add modulo N
//! - [`modmul`]: controlled multiplication by a constant modulo N
//!
//! ```rust
//! use qsim_arith::{QubitRegister, adder::controlled_add_constant, prepare_value};
//! use qsim_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::new("add", 1);
//! let reg = QubitRegister::new(&mut circuit, 3);
//! circuit.x(QubitId(0)).unwrap();
//! prepare_value(&mut circuit, &reg, 5).unwrap();
//! controlled_add_constant(&mut circuit, QubitId(0), &reg, 6).unwrap();
//! // Register now holds (5 + 6) mod 8 = 3.
//! assert_eq!(circuit.num_qubits(), 4);
//! ```

pub mod adder;
pub mod error;
pub mod fourier;
pub mod modmul;
pub mod register;

pub use adder::{
    controlled_add_constant, controlled_subtract_constant, doubly_controlled_add_constant,
    doubly_controlled_add_constant_mod_n, doubly_controlled_subtract_constant, with_and_ancilla,
};
pub use error::{ArithError, ArithResult};
pub use fourier::{phase_decode, phase_encode};
pub use modmul::{controlled_multiply_constant_mod_n_in_place, gcd, mod_inverse};
pub use register::{MAX_REGISTER_WIDTH, QubitRegister, prepare_value};
