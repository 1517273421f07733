//! Simulator backend implementation.

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Instant;
use tracing::{debug, instrument};

use qsim_hal::{
    Backend, BackendConfig, BackendFactory, CancellationSignal, HalError, HalResult, Histogram,
    NativeStateType,
};
use qsim_ir::{Circuit, Operation, QubitId};
use qsim_state::{StateError, StateVector, measure};

use crate::config::SimulatorConfig;

/// State threaded through [`LocalSimulator::apply_operation`].
#[derive(Debug, Clone)]
pub struct LocalState {
    state: StateVector,
    rng: StdRng,
    measurements: Vec<(QubitId, u8)>,
}

impl LocalState {
    /// Current amplitudes.
    pub fn state(&self) -> &StateVector {
        &self.state
    }

    /// Mid-circuit measurement outcomes in the order they happened.
    pub fn measurements(&self) -> &[(QubitId, u8)] {
        &self.measurements
    }

    /// Take the amplitudes, dropping the generator and the record.
    pub fn into_state(self) -> StateVector {
        self.state
    }
}

/// Local state-vector backend.
///
/// Applies gates and measurements exactly on a dense vector. Sampling uses
/// a generator seeded from [`SimulatorConfig::seed`] each time a state is
/// initialised, so a fixed seed gives identical runs.
#[derive(Debug, Clone)]
pub struct LocalSimulator {
    name: String,
    config: SimulatorConfig,
}

impl LocalSimulator {
    /// Create a new simulator backend with default settings.
    pub fn new() -> Self {
        Self::with_config(SimulatorConfig::default())
    }

    /// Create a simulator from explicit settings.
    pub fn with_config(config: SimulatorConfig) -> Self {
        Self {
            name: "simulator".into(),
            config,
        }
    }

    /// Create a simulator with custom max qubits.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self::with_config(SimulatorConfig {
            max_qubits,
            ..SimulatorConfig::default()
        })
    }

    /// The active settings.
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Run `circuit` from |0…0⟩ and sample `shots` full-register outcomes.
    ///
    /// `None` uses [`SimulatorConfig::default_shots`]. Zero shots is a
    /// validation error.
    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    pub async fn run(&self, circuit: &Circuit, shots: Option<u64>) -> HalResult<Histogram> {
        let start = Instant::now();
        let shots = shots.unwrap_or(self.config.default_shots);
        if shots == 0 {
            return Err(HalError::validation("shots", "must be at least 1"));
        }
        let num_qubits = circuit.num_qubits();
        self.ensure_capacity(num_qubits)?;

        debug!(num_qubits, shots, gates = circuit.len(), "Starting simulation");

        let state = self.initialize_state(num_qubits)?;
        let mut state = self
            .apply_operation(
                &Operation::from_circuit(circuit),
                state,
                &CancellationSignal::new(),
            )
            .await?;

        let counts = measure::sample_counts(&mut state.rng, &state.state, shots);
        let histogram = Histogram::from_outcomes(num_qubits as usize, counts);

        debug!(elapsed = ?start.elapsed(), "Simulation completed");
        Ok(histogram)
    }

    fn rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    fn unsupported(&self, op: &Operation) -> HalError {
        HalError::Operation {
            context: format!("{} ({})", self.name, self.native_state_type()),
            message: format!("'{}' is not a gate-based operation", op.name()),
        }
    }
}

impl Default for LocalSimulator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for LocalSimulator {
    type State = LocalState;

    fn name(&self) -> &str {
        &self.name
    }

    fn native_state_type(&self) -> NativeStateType {
        NativeStateType::GateBased
    }

    fn initialize_state(&self, num_qubits: u32) -> HalResult<LocalState> {
        self.ensure_capacity(num_qubits)?;
        let state = StateVector::try_new(num_qubits as usize).map_err(state_error)?;
        Ok(LocalState {
            state,
            rng: self.rng(),
            measurements: Vec::new(),
        })
    }

    fn supports_operation(&self, op: &Operation) -> bool {
        op.is_gate_based()
    }

    #[instrument(skip(self, op, state, cancel), fields(op = op.name()))]
    async fn apply_operation(
        &self,
        op: &Operation,
        mut state: LocalState,
        cancel: &CancellationSignal,
    ) -> HalResult<LocalState> {
        if let Some(foreign) = op.first_foreign() {
            return Err(self.unsupported(foreign));
        }

        match op {
            Operation::Gate { gate } => {
                state.state = state.state.apply(gate).map_err(state_error)?;
            }
            Operation::Measure { qubit } => {
                let (outcome, collapsed) =
                    measure::measure_and_collapse(&mut state.rng, *qubit, &state.state)
                        .map_err(state_error)?;
                debug!(%qubit, outcome, "Measured");
                state.state = collapsed;
                state.measurements.push((*qubit, outcome));
            }
            Operation::Sequence { ops } => {
                for child in ops {
                    cancel.check()?;
                    state = self.apply_operation(child, state, cancel).await?;
                }
                debug!(ops = ops.len(), "Applied sequence");
            }
            Operation::Shuttle { .. } | Operation::Anneal { .. } => {
                return Err(self.unsupported(op));
            }
        }
        Ok(state)
    }

    fn max_qubits(&self) -> Option<u32> {
        Some(self.config.max_qubits)
    }
}

impl BackendFactory for LocalSimulator {
    fn from_config(config: BackendConfig) -> HalResult<Self> {
        let mut settings = SimulatorConfig::default();
        if let Some(max_qubits) = config.get_u64("max_qubits")? {
            settings.max_qubits = u32::try_from(max_qubits)
                .map_err(|_| HalError::validation("max_qubits", "does not fit in u32"))?;
        }
        settings.seed = config.get_u64("seed")?;
        if let Some(shots) = config.get_u64("default_shots")? {
            settings.default_shots = shots;
        }
        settings
            .validate()
            .map_err(|e| HalError::validation("backend config", e.to_string()))?;

        let name = if config.name.is_empty() {
            "simulator".to_string()
        } else {
            config.name
        };
        Ok(Self {
            name,
            config: settings,
        })
    }
}

fn state_error(err: StateError) -> HalError {
    match err {
        StateError::DegenerateMeasurement {
            qubit,
            outcome,
            probability,
        } => HalError::DegenerateMeasurement {
            qubit,
            outcome,
            probability,
        },
        StateError::DimensionMismatch { expected, got } => {
            HalError::DimensionMismatch { expected, got }
        }
        other => HalError::validation("operation", other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsim_ir::Gate;

    #[tokio::test]
    async fn test_simulator_defaults() {
        let backend = LocalSimulator::new();
        assert_eq!(backend.name(), "simulator");
        assert_eq!(backend.max_qubits(), Some(20));
        assert_eq!(backend.native_state_type(), NativeStateType::GateBased);
    }

    #[tokio::test]
    async fn test_simulator_bell_state() {
        let backend = LocalSimulator::new();

        let circuit = Circuit::bell().unwrap();
        let counts = backend.run(&circuit, Some(1000)).await.unwrap();

        // Bell state should produce only 00 and 11
        assert_eq!(counts.total_shots(), 1000);
        assert_eq!(counts.get("00") + counts.get("11"), 1000);
        assert_eq!(counts.get("01") + counts.get("10"), 0);
    }

    #[tokio::test]
    async fn test_simulator_too_many_qubits() {
        let backend = LocalSimulator::with_max_qubits(5);

        let circuit = Circuit::new("test", 10);
        let result = backend.run(&circuit, Some(100)).await;

        assert!(matches!(
            result,
            Err(HalError::CapacityExceeded {
                required: 10,
                available: 5,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_gate_error_maps_to_validation() {
        let backend = LocalSimulator::new();
        let state = backend.initialize_state(1).unwrap();
        let op = Operation::gate(Gate::Cx {
            control: QubitId(0),
            target: QubitId(1),
        });
        let result = backend
            .apply_operation(&op, state, &CancellationSignal::new())
            .await;
        assert!(matches!(result, Err(HalError::Validation { .. })));
    }

    #[test]
    fn test_from_config() {
        let config = BackendConfig::new("local")
            .with_extra("max_qubits", serde_json::json!(8))
            .with_extra("seed", serde_json::json!(3));
        let backend = LocalSimulator::from_config(config).unwrap();
        assert_eq!(backend.name(), "local");
        assert_eq!(backend.max_qubits(), Some(8));
        assert_eq!(backend.config().seed, Some(3));

        let bad = BackendConfig::new("local").with_extra("max_qubits", serde_json::json!(0));
        assert!(matches!(
            LocalSimulator::from_config(bad),
            Err(HalError::Validation { .. })
        ));
    }
}
