//! Controlled constant adders.
//!
//! Addition of a classical constant `k` modulo 2^width is done in the
//! Fourier basis: encode the register, rotate qubit `j` by
//! 2π·(k mod 2^{j+1})/2^{j+1} under the control qubit, decode. No ancilla is
//! needed for a single control. Two controls are reduced to one with
//! [`with_and_ancilla`].

use qsim_ir::{Circuit, Gate, QubitId};
use tracing::debug;

use crate::error::{ArithError, ArithResult};
use crate::fourier::{phase_decode, phase_encode, turn_fraction};
use crate::register::{QubitRegister, check_distinct};

/// Add `k` (mod 2^width) to `register` when `control` is |1⟩.
pub fn controlled_add_constant(
    circuit: &mut Circuit,
    control: QubitId,
    register: &QubitRegister,
    k: u64,
) -> ArithResult<()> {
    controlled_phase_add(circuit, &[control], register, k, 1.0)
}

/// Subtract `k` (mod 2^width) from `register` when `control` is |1⟩.
///
/// Exactly undoes [`controlled_add_constant`] with the same arguments.
pub fn controlled_subtract_constant(
    circuit: &mut Circuit,
    control: QubitId,
    register: &QubitRegister,
    k: u64,
) -> ArithResult<()> {
    controlled_phase_add(circuit, &[control], register, k, -1.0)
}

fn controlled_phase_add(
    circuit: &mut Circuit,
    controls: &[QubitId],
    register: &QubitRegister,
    k: u64,
    sign: f64,
) -> ArithResult<()> {
    register.check_width()?;
    check_distinct([controls, register.qubits()])?;

    phase_encode(circuit, register)?;
    for (j, target) in register.iter().enumerate() {
        let modulus = 1u64 << (j + 1);
        let residue = k % modulus;
        if residue == 0 {
            continue;
        }
        let theta = sign * turn_fraction(j + 1) * residue as f64;
        controlled_phase(circuit, controls, theta, target)?;
    }
    phase_decode(circuit, register)?;
    Ok(())
}

/// Phase `theta` on `target` when every qubit in `controls` is |1⟩.
///
/// Two controls are decomposed into three controlled phases and two CX,
/// without an ancilla.
fn controlled_phase(
    circuit: &mut Circuit,
    controls: &[QubitId],
    theta: f64,
    target: QubitId,
) -> ArithResult<()> {
    match *controls {
        [control] => {
            circuit.cp(theta, control, target)?;
        }
        [c1, c2] => {
            circuit
                .cp(theta / 2.0, c2, target)?
                .cx(c1, c2)?
                .cp(-theta / 2.0, c2, target)?
                .cx(c1, c2)?
                .cp(theta / 2.0, c1, target)?;
        }
        _ => {
            return Err(ArithError::validation(
                "controls",
                format!("expected one or two controls, got {}", controls.len()),
            ));
        }
    }
    Ok(())
}

/// Compute the AND of two controls into `ancilla`, run `body` controlled by
/// the ancilla, then uncompute.
///
/// `ancilla` must start in |0⟩ and is returned to |0⟩. `body` receives a
/// scratch circuit of the same width and the ancilla; it may use the ancilla
/// only in ways that leave its computational-basis value unchanged (as a
/// control, or in diagonal gates). Any other use is rejected and `circuit`
/// is left untouched.
pub fn with_and_ancilla<F>(
    circuit: &mut Circuit,
    control1: QubitId,
    control2: QubitId,
    ancilla: QubitId,
    body: F,
) -> ArithResult<()>
where
    F: FnOnce(&mut Circuit, QubitId) -> ArithResult<()>,
{
    check_distinct([&[control1, control2, ancilla][..]])?;

    let mut scratch = Circuit::new("and_body", circuit.num_qubits());
    body(&mut scratch, ancilla)?;
    if let Some(gate) = scratch
        .gates()
        .iter()
        .find(|g| !preserves_basis_of(g, ancilla))
    {
        return Err(ArithError::validation(
            "body",
            format!("gate '{}' would modify ancilla {ancilla}", gate.name()),
        ));
    }

    circuit.ccx(control1, control2, ancilla)?;
    circuit.append(&scratch)?;
    circuit.ccx(control1, control2, ancilla)?;
    Ok(())
}

/// True if `gate` maps every basis state to a multiple of a basis state
/// with the same value of `qubit`.
fn preserves_basis_of(gate: &Gate, qubit: QubitId) -> bool {
    match gate {
        Gate::Z { .. }
        | Gate::S { .. }
        | Gate::Sdg { .. }
        | Gate::T { .. }
        | Gate::Tdg { .. }
        | Gate::Phase { .. }
        | Gate::Rz { .. }
        | Gate::Cz { .. }
        | Gate::CPhase { .. }
        | Gate::Mcz { .. } => true,
        Gate::Cx { target, .. } | Gate::Ccx { target, .. } => *target != qubit,
        other => !other.qubits().contains(&qubit),
    }
}

/// Add `k` (mod 2^width) to `register` when both controls are |1⟩.
///
/// With exactly one control set the register is unchanged. `ancilla` must be
/// |0⟩ on entry and is |0⟩ on exit.
pub fn doubly_controlled_add_constant(
    circuit: &mut Circuit,
    control1: QubitId,
    control2: QubitId,
    register: &QubitRegister,
    k: u64,
    ancilla: QubitId,
) -> ArithResult<()> {
    check_distinct([&[control1, control2, ancilla][..], register.qubits()])?;
    debug!(
        width = register.len(),
        k,
        register = register.label(),
        "doubly controlled add"
    );
    with_and_ancilla(circuit, control1, control2, ancilla, |body, anc| {
        controlled_add_constant(body, anc, register, k)
    })
}

/// Subtract `k` (mod 2^width) from `register` when both controls are |1⟩.
pub fn doubly_controlled_subtract_constant(
    circuit: &mut Circuit,
    control1: QubitId,
    control2: QubitId,
    register: &QubitRegister,
    k: u64,
    ancilla: QubitId,
) -> ArithResult<()> {
    check_distinct([&[control1, control2, ancilla][..], register.qubits()])?;
    debug!(
        width = register.len(),
        k,
        register = register.label(),
        "doubly controlled subtract"
    );
    with_and_ancilla(circuit, control1, control2, ancilla, |body, anc| {
        controlled_subtract_constant(body, anc, register, k)
    })
}

/// Add `k` modulo `n` to `register` when both controls are |1⟩.
///
/// `register` must hold a value below `n`, and `n` must lie in
/// `[2, 2^width]`. `flag` must be |0⟩ on entry and is |0⟩ on exit; while
/// the adder runs it is the top bit of a (width + 1)-qubit view of the
/// register and records whether the sum reached `n`:
///
/// 1. `flag ← controls ∧ (b ≥ n − k)` by subtracting `n − k` over the wide
///    view, adding it back over the register, and flipping `flag` with a
///    Toffoli on the controls.
/// 2. `b ← b + k − n·flag`, which is `(b + k) mod n`.
/// 3. `flag ← flag ⊕ (controls ∧ b < k)`, the same comparison against `k`,
///    which clears it.
pub fn doubly_controlled_add_constant_mod_n(
    circuit: &mut Circuit,
    control1: QubitId,
    control2: QubitId,
    register: &QubitRegister,
    k: u64,
    n: u64,
    flag: QubitId,
) -> ArithResult<()> {
    register.check_width()?;
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
    check_distinct([&[control1, control2, flag][..], register.qubits()])?;
    let wide = QubitRegister::from_qubits(register.iter().chain(std::iter::once(flag)));
    wide.check_width()?;

    let k = k % n;
    let controls = [control1, control2];
    debug!(
        width = register.len(),
        k,
        n,
        register = register.label(),
        "doubly controlled modular add"
    );

    controlled_phase_add(circuit, &controls, &wide, n - k, -1.0)?;
    controlled_phase_add(circuit, &controls, register, n - k, 1.0)?;
    circuit.ccx(control1, control2, flag)?;

    controlled_phase_add(circuit, &controls, register, k, 1.0)?;
    controlled_phase_add(circuit, &[flag], register, n, -1.0)?;

    controlled_phase_add(circuit, &controls, &wide, k, -1.0)?;
    controlled_phase_add(circuit, &controls, register, k, 1.0)?;
    Ok(())
}
