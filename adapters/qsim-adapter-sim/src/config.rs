//! Configuration for the local simulator.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. Environment variables (with QSIM_ prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::warn;

use qsim_state::MAX_QUBITS;

/// Environment variable overriding [`SimulatorConfig::max_qubits`].
pub const ENV_MAX_QUBITS: &str = "QSIM_MAX_QUBITS";
/// Environment variable overriding [`SimulatorConfig::seed`].
pub const ENV_SEED: &str = "QSIM_SEED";
/// Environment variable overriding [`SimulatorConfig::default_shots`].
pub const ENV_SHOTS: &str = "QSIM_SHOTS";

/// Settings of a [`LocalSimulator`](crate::LocalSimulator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Largest register the simulator accepts.
    #[serde(default = "default_max_qubits")]
    pub max_qubits: u32,

    /// Seed for measurement sampling. `None` draws from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Shots used when the caller does not specify a count.
    #[serde(default = "default_shots")]
    pub default_shots: u64,
}

fn default_max_qubits() -> u32 {
    20
}

fn default_shots() -> u64 {
    1024
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            max_qubits: default_max_qubits(),
            seed: None,
            default_shots: default_shots(),
        }
    }
}

impl SimulatorConfig {
    /// Parse a YAML document. Missing keys take their defaults.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_yaml_ng::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::from_yaml_str(&contents)
    }

    /// Load configuration with the following precedence:
    /// 1. Load from file if provided, defaults otherwise
    /// 2. Apply environment variable overrides
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.merge_env();
        config.validate()?;
        Ok(config)
    }

    /// Merge process environment variables into this configuration.
    pub fn merge_env(self) -> Self {
        self.merge_from(|key| std::env::var(key).ok())
    }

    /// Merge overrides from `lookup` (keyed by environment variable name).
    ///
    /// Only variables that are set override the current values. Values that
    /// do not parse are logged and ignored.
    pub fn merge_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(val) = parse_override(&lookup, ENV_MAX_QUBITS) {
            self.max_qubits = val;
        }
        if let Some(val) = parse_override(&lookup, ENV_SEED) {
            self.seed = Some(val);
        }
        if let Some(val) = parse_override(&lookup, ENV_SHOTS) {
            self.default_shots = val;
        }
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_qubits == 0 || self.max_qubits as usize > MAX_QUBITS {
            return Err(ConfigError::Validation(format!(
                "max_qubits must be in 1..={MAX_QUBITS}, got {}",
                self.max_qubits
            )));
        }
        if self.default_shots == 0 {
            return Err(ConfigError::Validation(
                "default_shots must be positive".into(),
            ));
        }
        Ok(())
    }
}

fn parse_override<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(val) => Some(val),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparseable environment override");
            None
        }
    }
}

/// Configuration loading errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File could not be read.
    #[error("IO error: {0}")]
    Io(String),

    /// YAML could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A value is out of range.
    #[error("Validation error: {0}")]
    Validation(String),
}
