//! Simulated checks of the constant adders.

use proptest::prelude::*;
use qsim_arith::{
    QubitRegister, controlled_add_constant, controlled_subtract_constant,
    doubly_controlled_add_constant, doubly_controlled_add_constant_mod_n,
    doubly_controlled_subtract_constant, prepare_value,
};
use qsim_ir::{Circuit, QubitId};
use qsim_state::StateVector;
use qsim_state::measure::outcome_probabilities;

/// Run `circuit` from |0…0⟩ and return the basis index holding all the
/// probability.
fn run_to_basis(circuit: &Circuit) -> (usize, StateVector) {
    let state = StateVector::new(circuit.num_qubits() as usize)
        .run(circuit)
        .unwrap();
    let (index, p) = state
        .probabilities()
        .into_iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .unwrap();
    assert!(p > 0.999, "state is not a basis state (max p = {p})");
    (index, state)
}

struct Layout {
    circuit: Circuit,
    c1: QubitId,
    c2: QubitId,
    reg: QubitRegister,
    anc: QubitId,
}

fn layout(width: usize, x: u64, c1_on: bool, c2_on: bool) -> Layout {
    let mut circuit = Circuit::new("adder", 2);
    let (c1, c2) = (QubitId(0), QubitId(1));
    let reg = QubitRegister::new(&mut circuit, width).with_label("x");
    let anc = circuit.add_qubits(1)[0];
    if c1_on {
        circuit.x(c1).unwrap();
    }
    if c2_on {
        circuit.x(c2).unwrap();
    }
    prepare_value(&mut circuit, &reg, x).unwrap();
    Layout {
        circuit,
        c1,
        c2,
        reg,
        anc,
    }
}

// ---------------------------------------------------------------------------
// Singly controlled
// ---------------------------------------------------------------------------

#[test]
fn controlled_add_wraps() {
    let mut l = layout(3, 5, true, false);
    controlled_add_constant(&mut l.circuit, l.c1, &l.reg, 6).unwrap();
    let (index, _) = run_to_basis(&l.circuit);
    assert_eq!(l.reg.value_in(index), 3);
}

#[test]
fn controlled_add_off_is_identity() {
    let mut l = layout(4, 9, false, false);
    controlled_add_constant(&mut l.circuit, l.c1, &l.reg, 5).unwrap();
    let (index, _) = run_to_basis(&l.circuit);
    assert_eq!(l.reg.value_in(index), 9);
}

#[test]
fn controlled_subtract_borrows() {
    let mut l = layout(4, 2, true, false);
    controlled_subtract_constant(&mut l.circuit, l.c1, &l.reg, 5).unwrap();
    let (index, _) = run_to_basis(&l.circuit);
    assert_eq!(l.reg.value_in(index), 13);
}

// ---------------------------------------------------------------------------
// Doubly controlled
// ---------------------------------------------------------------------------

#[test]
fn doubly_controlled_add_needs_both_controls() {
    for (c1_on, c2_on) in [(false, false), (true, false), (false, true), (true, true)] {
        let mut l = layout(3, 6, c1_on, c2_on);
        doubly_controlled_add_constant(&mut l.circuit, l.c1, l.c2, &l.reg, 3, l.anc).unwrap();
        let (index, state) = run_to_basis(&l.circuit);

        let expected = if c1_on && c2_on { (6 + 3) % 8 } else { 6 };
        assert_eq!(l.reg.value_in(index), expected, "controls {c1_on} {c2_on}");

        let (p0, _) = outcome_probabilities(&state, l.anc).unwrap();
        assert!(p0 > 0.999, "ancilla left dirty: P(0) = {p0}");
    }
}

#[test]
fn doubly_controlled_add_in_superposition_keeps_ancilla_clean() {
    let mut l = layout(3, 1, false, true);
    l.circuit.h(l.c1).unwrap();
    doubly_controlled_add_constant(&mut l.circuit, l.c1, l.c2, &l.reg, 2, l.anc).unwrap();
    let state = StateVector::new(l.circuit.num_qubits() as usize)
        .run(&l.circuit)
        .unwrap();

    let (p0, _) = outcome_probabilities(&state, l.anc).unwrap();
    assert!(p0 > 0.999);
    // Half the weight on x = 1 (c1 = 0), half on x = 3 (c1 = 1).
    let on_three: f64 = state
        .probabilities()
        .iter()
        .enumerate()
        .filter(|(i, _)| l.reg.value_in(*i) == 3)
        .map(|(_, p)| p)
        .sum();
    assert!((on_three - 0.5).abs() < 1e-9);
}

#[test]
fn modular_add_reduces_for_every_sum() {
    for (width, n) in [(3, 5), (3, 8), (4, 13)] {
        for k in 0..n {
            for b in 0..n {
                for (c1_on, c2_on) in [(true, true), (true, false), (false, true)] {
                    let mut l = layout(width, b, c1_on, c2_on);
                    doubly_controlled_add_constant_mod_n(
                        &mut l.circuit,
                        l.c1,
                        l.c2,
                        &l.reg,
                        k,
                        n,
                        l.anc,
                    )
                    .unwrap();
                    let (index, state) = run_to_basis(&l.circuit);

                    let expected = if c1_on && c2_on { (b + k) % n } else { b };
                    assert_eq!(l.reg.value_in(index), expected, "{b} + {k} mod {n}");
                    let (p0, _) = outcome_probabilities(&state, l.anc).unwrap();
                    assert!(p0 > 0.999, "flag left set after {b} + {k} mod {n}");
                }
            }
        }
    }
}

#[test]
fn modular_add_rejects_modulus_above_register() {
    let mut l = layout(3, 0, true, true);
    let before = l.circuit.len();
    assert!(
        doubly_controlled_add_constant_mod_n(&mut l.circuit, l.c1, l.c2, &l.reg, 1, 9, l.anc)
            .is_err()
    );
    assert_eq!(l.circuit.len(), before);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn add_then_subtract_restores(width in 1_usize..=5, x in any::<u64>(), k in any::<u64>()) {
        let x = x % (1 << width);
        let mut l = layout(width, x, true, false);
        controlled_add_constant(&mut l.circuit, l.c1, &l.reg, k).unwrap();
        controlled_subtract_constant(&mut l.circuit, l.c1, &l.reg, k).unwrap();
        let (index, _) = run_to_basis(&l.circuit);
        prop_assert_eq!(l.reg.value_in(index), x);
    }

    #[test]
    fn doubly_controlled_matches_classical(
        width in 1_usize..=4,
        x in any::<u64>(),
        k in any::<u64>(),
        c1_on in any::<bool>(),
        c2_on in any::<bool>(),
        subtract in any::<bool>(),
    ) {
        let modulus = 1_u64 << width;
        let x = x % modulus;
        let mut l = layout(width, x, c1_on, c2_on);
        if subtract {
            doubly_controlled_subtract_constant(&mut l.circuit, l.c1, l.c2, &l.reg, k, l.anc).unwrap();
        } else {
            doubly_controlled_add_constant(&mut l.circuit, l.c1, l.c2, &l.reg, k, l.anc).unwrap();
        }
        let (index, state) = run_to_basis(&l.circuit);

        let k = k % modulus;
        let expected = match (c1_on && c2_on, subtract) {
            (false, _) => x,
            (true, false) => (x + k) % modulus,
            (true, true) => (x + modulus - k) % modulus,
        };
        prop_assert_eq!(l.reg.value_in(index), expected);
        let (p0, _) = outcome_probabilities(&state, l.anc).unwrap();
        prop_assert!(p0 > 0.999);
    }
}
