//! Benchmarks for state-vector gate application
//!
//! Run with: cargo bench -p qsim-state

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qsim_ir::{Circuit, Gate, QubitId};
use qsim_state::StateVector;
use qsim_state::measure::sample_counts;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::f64::consts::PI;

/// Benchmark single gates across register widths
fn bench_single_gates(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_gate");

    for num_qubits in &[4_usize, 10, 16, 20] {
        let state = StateVector::new(*num_qubits);
        let h = Gate::H { qubit: QubitId(0) };
        let rx = Gate::Rx {
            qubit: QubitId(1),
            theta: PI / 4.0,
        };
        let cx = Gate::Cx {
            control: QubitId(0),
            target: QubitId(1),
        };

        group.bench_with_input(BenchmarkId::new("h", num_qubits), &state, |b, s| {
            b.iter(|| s.apply(black_box(&h)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("rx", num_qubits), &state, |b, s| {
            b.iter(|| s.apply(black_box(&rx)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("cx", num_qubits), &state, |b, s| {
            b.iter(|| s.apply(black_box(&cx)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark running a full GHZ circuit
fn bench_ghz_circuit(c: &mut Criterion) {
    let mut group = c.benchmark_group("ghz_circuit");

    for num_qubits in &[4_u32, 10, 16] {
        let circuit = Circuit::ghz(*num_qubits).unwrap();
        let state = StateVector::new(*num_qubits as usize);
        group.bench_with_input(BenchmarkId::new("run", num_qubits), &circuit, |b, circ| {
            b.iter(|| state.run(black_box(circ)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark shot sampling
fn bench_sampling(c: &mut Criterion) {
    let state = StateVector::new(12)
        .run(&Circuit::ghz(12).unwrap())
        .unwrap();
    c.bench_function("sample_counts_1024", |b| {
        let mut rng = StdRng::seed_from_u64(0);
        b.iter(|| sample_counts(&mut rng, black_box(&state), 1024));
    });
}

criterion_group!(benches, bench_single_gates, bench_ghz_circuit, bench_sampling);
criterion_main!(benches);
