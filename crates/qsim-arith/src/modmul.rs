//! Controlled in-place multiplication by a constant modulo N.
//!
//! The construction is the textbook three-stage one:
//!
//! 1. For each bit i of `register`, add (k·2^i mod N) into `temp` modulo N
//!    under `control` and that bit, so `temp` ends at k·x mod N.
//! 2. Swap `register` and `temp` under `control`.
//! 3. For each bit i of the new `register`, subtract (k⁻¹·2^i mod N) from
//!    `temp` under `control` and that bit.
//!
//! Step 3 uses the plain adders, which reduce modulo 2^width rather than
//! modulo N. The subtracted terms sum to x only modulo N, so `temp` is left
//! holding garbage instead of 0 whenever that sum exceeds x (for N = 15,
//! k = 7, x = 1 it ends in |2⟩). Callers that need a clean `temp` must
//! check it. The product in `register` is always reduced.

use qsim_ir::{Circuit, QubitId};
use tracing::debug;

use crate::adder::{doubly_controlled_add_constant_mod_n, doubly_controlled_subtract_constant};
use crate::error::{ArithError, ArithResult};
use crate::register::{QubitRegister, check_distinct};

/// Greatest common divisor.
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Multiplicative inverse of `k` modulo `n`, if it exists.
pub fn mod_inverse(k: u64, n: u64) -> Option<u64> {
    if n == 0 {
        return None;
    }
    let (mut old_r, mut r) = (i128::from(k % n), i128::from(n));
    let (mut old_s, mut s) = (1_i128, 0_i128);
    while r != 0 {
        let q = old_r / r;
        (old_r, r) = (r, old_r - q * r);
        (old_s, s) = (s, old_s - q * s);
    }
    if old_r != 1 {
        return None;
    }
    u64::try_from(old_s.rem_euclid(i128::from(n))).ok()
}

/// `a · b mod n` without overflow.
fn mul_mod(a: u64, b: u64, n: u64) -> u64 {
    ((u128::from(a) * u128::from(b)) % u128::from(n)) as u64
}

/// Multiply `register` by `k` modulo `n` in place when `control` is |1⟩.
///
/// `register` must hold a value below `n`. `temp` must be as wide as
/// `register` and start in |0⟩; `ancilla` must start in |0⟩ and is always
/// restored. See the module docs for when `temp` is not restored.
pub fn controlled_multiply_constant_mod_n_in_place(
    circuit: &mut Circuit,
    control: QubitId,
    register: &QubitRegister,
    k: u64,
    n: u64,
    temp: &QubitRegister,
    ancilla: QubitId,
) -> ArithResult<()> {
    register.check_width()?;
    if temp.len() != register.len() {
        return Err(ArithError::BitWidthMismatch {
            expected: register.len(),
            got: temp.len(),
        });
    }
    if n < 2 || n > register.modulus() {
        return Err(ArithError::validation(
            "n",
            format!(
                "modulus {n} must lie in [2, 2^{}] = [2, {}]",
                register.len(),
                register.modulus()
            ),
        ));
    }
    let k = k % n;
    let k_inv = mod_inverse(k, n).ok_or_else(|| {
        ArithError::validation("k", format!("gcd({k}, {n}) = {} is not 1", gcd(k, n)))
    })?;
    check_distinct([
        &[control, ancilla][..],
        register.qubits(),
        temp.qubits(),
    ])?;

    debug!(
        width = register.len(),
        k,
        k_inv,
        n,
        "building controlled modular multiplication"
    );

    // temp = k·x mod n
    for (i, bit) in register.iter().enumerate() {
        let addend = mul_mod(k, pow2_mod(i, n), n);
        doubly_controlled_add_constant_mod_n(circuit, control, bit, temp, addend, n, ancilla)?;
    }

    // register ↔ temp
    for (a, b) in register.iter().zip(temp.iter()) {
        controlled_swap(circuit, control, a, b)?;
    }

    // temp -= k⁻¹·(new register)
    for (i, bit) in register.iter().enumerate().rev() {
        let subtrahend = mul_mod(k_inv, pow2_mod(i, n), n);
        doubly_controlled_subtract_constant(circuit, control, bit, temp, subtrahend, ancilla)?;
    }

    Ok(())
}

/// 2^i mod n.
fn pow2_mod(i: usize, n: u64) -> u64 {
    (0..i).fold(1 % n, |acc, _| mul_mod(acc, 2, n))
}

/// Fredkin gate from CX · CCX · CX.
fn controlled_swap(circuit: &mut Circuit, control: QubitId, a: QubitId, b: QubitId) -> ArithResult<()> {
    circuit.cx(b, a)?.ccx(control, a, b)?.cx(b, a)?;
    Ok(())
}
