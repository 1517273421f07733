//! Backend trait and configuration.
//!
//! A [`Backend`] owns no simulation state of its own. Callers obtain a
//! state with [`Backend::initialize_state`] and thread it through
//! [`Backend::apply_operation`], which consumes the previous state and
//! returns the next one:
//!
//! ```text
//!   ensure_capacity() ──→ initialize_state() ──→ apply_operation()*
//!     (sync)               (sync)                 (async, cancellable)
//! ```
//!
//! ## Method table
//!
//! | Method | Kind | Required | Returns |
//! |--------|------|----------|---------|
//! | `name()` | sync | yes | `&str` |
//! | `native_state_type()` | sync | yes | `NativeStateType` |
//! | `initialize_state()` | sync | yes | `HalResult<State>` |
//! | `supports_operation()` | sync | yes | `bool` |
//! | `apply_operation()` | async | yes | `HalResult<State>` |
//! | `max_qubits()` | sync | yes | `Option<u32>` |
//! | `ensure_capacity()` | sync | provided | `HalResult<()>` |

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use qsim_ir::Operation;

use crate::error::{HalError, HalResult};

/// Configuration for a backend instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Name of the backend.
    pub name: String,
    /// Additional configuration.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BackendConfig {
    /// Create a new backend configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// Parse a configuration from JSON; keys other than `name` land in
    /// `extra`.
    pub fn from_json(json: &str) -> HalResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Add extra configuration.
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Read an unsigned integer from `extra`.
    ///
    /// Returns `Ok(None)` when the key is absent and a validation error when
    /// it holds anything other than a non-negative integer.
    pub fn get_u64(&self, key: &str) -> HalResult<Option<u64>> {
        match self.extra.get(key) {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(value) => value.as_u64().map(Some).ok_or_else(|| {
                HalError::validation(key, format!("expected a non-negative integer, got {value}"))
            }),
        }
    }
}

/// The kind of state a backend evolves natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NativeStateType {
    /// Gate-model register (state vector, density matrix, hardware qubits).
    GateBased,
    /// Annealer driven by schedules.
    Annealing,
    /// Neutral-atom array with movable qubits.
    NeutralAtom,
}

impl fmt::Display for NativeStateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeStateType::GateBased => write!(f, "gate-based"),
            NativeStateType::Annealing => write!(f, "annealing"),
            NativeStateType::NeutralAtom => write!(f, "neutral-atom"),
        }
    }
}

/// Shared flag that asks a running backend to stop.
///
/// Clones observe the same flag. Backends check it between the children of
/// an [`Operation::Sequence`]; a single gate is never interrupted.
#[derive(Debug, Clone, Default)]
pub struct CancellationSignal {
    cancelled: Arc<AtomicBool>,
}

impl CancellationSignal {
    /// A fresh, uncancelled signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        debug!("Cancellation requested");
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// `Err(HalError::Cancelled)` once cancellation has been requested.
    pub fn check(&self) -> HalResult<()> {
        if self.is_cancelled() {
            Err(HalError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Trait for execution backends.
///
/// # Contract
///
/// - `apply_operation()` consumes the state it is given. On error the state
///   is dropped; callers that need to retry keep their own copy.
/// - Backends answer `supports_operation() == false` for operations outside
///   their native family and return [`HalError::Operation`] if asked to
///   apply them anyway, also when they are nested inside a sequence.
/// - `max_qubits()` returns `None` when the backend has no fixed limit.
#[async_trait]
pub trait Backend: Send + Sync {
    /// The state this backend evolves.
    type State: Send;

    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// The state family this backend evolves natively.
    fn native_state_type(&self) -> NativeStateType;

    /// A fresh state over `num_qubits` qubits.
    fn initialize_state(&self, num_qubits: u32) -> HalResult<Self::State>;

    /// Whether `op` can be applied by this backend.
    fn supports_operation(&self, op: &Operation) -> bool;

    /// Apply `op` to `state`, checking `cancel` between sequence children.
    async fn apply_operation(
        &self,
        op: &Operation,
        state: Self::State,
        cancel: &CancellationSignal,
    ) -> HalResult<Self::State>;

    /// Largest register this backend can hold, if limited.
    fn max_qubits(&self) -> Option<u32>;

    /// Fail with [`HalError::CapacityExceeded`] when `required` qubits do not
    /// fit on this backend.
    fn ensure_capacity(&self, required: u32) -> HalResult<()> {
        match self.max_qubits() {
            Some(available) if required > available => {
                debug!(backend = self.name(), required, available, "Capacity check failed");
                Err(HalError::CapacityExceeded {
                    backend: self.name().to_string(),
                    required,
                    available,
                })
            }
            _ => Ok(()),
        }
    }
}

/// Trait for creating backends from configuration.
pub trait BackendFactory: Backend + Sized {
    /// Create a backend from configuration.
    fn from_config(config: BackendConfig) -> HalResult<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsim_ir::{Gate, QubitId};

    /// Counts applied gates; knows nothing but gates.
    struct CountingBackend;

    #[async_trait]
    impl Backend for CountingBackend {
        type State = usize;

        fn name(&self) -> &str {
            "counting"
        }

        fn native_state_type(&self) -> NativeStateType {
            NativeStateType::GateBased
        }

        fn initialize_state(&self, _num_qubits: u32) -> HalResult<usize> {
            Ok(0)
        }

        fn supports_operation(&self, op: &Operation) -> bool {
            op.is_gate_based()
        }

        async fn apply_operation(
            &self,
            op: &Operation,
            state: usize,
            cancel: &CancellationSignal,
        ) -> HalResult<usize> {
            match op {
                Operation::Gate { .. } | Operation::Measure { .. } => Ok(state + 1),
                Operation::Sequence { ops } => {
                    let mut state = state;
                    for child in ops {
                        cancel.check()?;
                        state = self.apply_operation(child, state, cancel).await?;
                    }
                    Ok(state)
                }
                other => Err(HalError::Operation {
                    context: self.name().to_string(),
                    message: other.name().to_string(),
                }),
            }
        }

        fn max_qubits(&self) -> Option<u32> {
            Some(4)
        }
    }

    #[test]
    fn test_backend_config() {
        let config = BackendConfig::new("test")
            .with_extra("seed", serde_json::json!(42))
            .with_extra("label", serde_json::json!("x"));

        assert_eq!(config.name, "test");
        assert_eq!(config.get_u64("seed").unwrap(), Some(42));
        assert_eq!(config.get_u64("missing").unwrap(), None);
        assert!(matches!(
            config.get_u64("label"),
            Err(HalError::Validation { .. })
        ));
    }

    #[test]
    fn test_backend_config_flattened_json() {
        let config = BackendConfig::from_json(r#"{"name":"sim","max_qubits":12}"#).unwrap();
        assert_eq!(config.name, "sim");
        assert_eq!(config.get_u64("max_qubits").unwrap(), Some(12));
    }

    #[test]
    fn test_backend_config_malformed_json() {
        assert!(matches!(
            BackendConfig::from_json(r#"{"name":"sim","#),
            Err(HalError::Serialization(_))
        ));
        assert!(matches!(
            BackendConfig::from_json(r#"{"max_qubits":12}"#),
            Err(HalError::Serialization(_))
        ));
    }

    #[test]
    fn test_ensure_capacity() {
        let backend = CountingBackend;
        assert!(backend.ensure_capacity(4).is_ok());
        match backend.ensure_capacity(5) {
            Err(HalError::CapacityExceeded {
                backend,
                required,
                available,
            }) => {
                assert_eq!(backend, "counting");
                assert_eq!(required, 5);
                assert_eq!(available, 4);
            }
            other => panic!("expected CapacityExceeded, got {other:?}"),
        }
    }

    #[test]
    fn test_cancellation_signal_shared() {
        let signal = CancellationSignal::new();
        let clone = signal.clone();
        assert!(signal.check().is_ok());
        clone.cancel();
        assert!(signal.is_cancelled());
        assert!(matches!(signal.check(), Err(HalError::Cancelled)));
    }

    #[tokio::test]
    async fn test_sequence_honours_cancellation() {
        let backend = CountingBackend;
        let seq = Operation::sequence([
            Operation::gate(Gate::H { qubit: QubitId(0) }),
            Operation::measure(QubitId(0)),
        ]);

        let signal = CancellationSignal::new();
        let state = backend.initialize_state(1).unwrap();
        let state = backend.apply_operation(&seq, state, &signal).await.unwrap();
        assert_eq!(state, 2);

        signal.cancel();
        let err = backend.apply_operation(&seq, state, &signal).await;
        assert!(matches!(err, Err(HalError::Cancelled)));
    }

    #[test]
    fn test_native_state_type_display() {
        assert_eq!(NativeStateType::GateBased.to_string(), "gate-based");
        let json = serde_json::to_string(&NativeStateType::NeutralAtom).unwrap();
        assert_eq!(json, "\"neutral_atom\"");
    }
}
