//! Integration tests for the local backend through the `Backend` trait.

use qsim_adapter_sim::{LocalSimulator, SimulatorConfig};
use qsim_hal::{Backend, CancellationSignal, HalError};
use qsim_ir::{Circuit, Gate, Operation, QubitId};

fn seeded(seed: u64) -> LocalSimulator {
    LocalSimulator::with_config(SimulatorConfig {
        seed: Some(seed),
        ..SimulatorConfig::default()
    })
}

#[tokio::test]
async fn test_seed_reproducible_histogram() {
    let circuit = Circuit::ghz(3).unwrap();
    let a = seeded(11).run(&circuit, Some(500)).await.unwrap();
    let b = seeded(11).run(&circuit, Some(500)).await.unwrap();
    assert_eq!(a, b);
    assert_eq!(a.get("000") + a.get("111"), 500);
}

#[tokio::test]
async fn test_default_shots_from_config() {
    let backend = LocalSimulator::with_config(SimulatorConfig {
        seed: Some(1),
        default_shots: 64,
        ..SimulatorConfig::default()
    });
    let counts = backend.run(&Circuit::bell().unwrap(), None).await.unwrap();
    assert_eq!(counts.total_shots(), 64);
}

#[tokio::test]
async fn test_zero_shots_rejected() {
    let backend = seeded(3);
    let err = backend
        .run(&Circuit::bell().unwrap(), Some(0))
        .await
        .unwrap_err();
    assert!(matches!(err, HalError::Validation { ref parameter, .. } if parameter == "shots"));
}

#[tokio::test]
async fn test_mid_circuit_measurement_collapses() {
    let backend = seeded(5);
    let op = Operation::sequence([
        Operation::gate(Gate::H { qubit: QubitId(0) }),
        Operation::gate(Gate::Cx {
            control: QubitId(0),
            target: QubitId(1),
        }),
        Operation::measure(QubitId(0)),
        Operation::measure(QubitId(1)),
    ]);

    let state = backend.initialize_state(2).unwrap();
    let state = backend
        .apply_operation(&op, state, &CancellationSignal::new())
        .await
        .unwrap();

    let record = state.measurements();
    assert_eq!(record.len(), 2);
    assert_eq!(record[0].0, QubitId(0));
    // Bell correlation survives collapse.
    assert_eq!(record[0].1, record[1].1);

    let index = if record[0].1 == 1 { 3 } else { 0 };
    assert!((state.state().amplitude(index).unwrap().norm_sqr() - 1.0).abs() < 1e-12);
}

#[tokio::test]
async fn test_foreign_operation_rejected_recursively() {
    let backend = LocalSimulator::new();
    let nested = Operation::sequence([
        Operation::gate(Gate::X { qubit: QubitId(0) }),
        Operation::sequence([Operation::Anneal { duration_ns: 100 }]),
    ]);
    assert!(!backend.supports_operation(&nested));

    let state = backend.initialize_state(1).unwrap();
    let result = backend
        .apply_operation(&nested, state, &CancellationSignal::new())
        .await;
    match result {
        Err(HalError::Operation { message, .. }) => assert!(message.contains("anneal")),
        other => panic!("expected Operation error, got {other:?}"),
    }

    let shuttle = Operation::Shuttle {
        qubit: QubitId(0),
        from_zone: 0,
        to_zone: 1,
    };
    assert!(!backend.supports_operation(&shuttle));
    assert!(backend.supports_operation(&Operation::measure(QubitId(0))));
}

#[tokio::test]
async fn test_cancelled_sequence_stops() {
    let backend = LocalSimulator::new();
    let signal = CancellationSignal::new();
    signal.cancel();

    let op = Operation::from_circuit(&Circuit::bell().unwrap());
    let state = backend.initialize_state(2).unwrap();
    let result = backend.apply_operation(&op, state, &signal).await;
    assert!(matches!(result, Err(HalError::Cancelled)));
}

#[tokio::test]
async fn test_initialize_state_checks_capacity() {
    let backend = LocalSimulator::with_max_qubits(3);
    assert!(matches!(
        backend.initialize_state(4),
        Err(HalError::CapacityExceeded { .. })
    ));
    let state = backend.initialize_state(3).unwrap();
    assert_eq!(state.state().num_qubits(), 3);
    assert!(state.measurements().is_empty());
}
