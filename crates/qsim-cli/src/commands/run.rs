//! Run command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use tracing::debug;

use qsim_adapter_sim::{LocalSimulator, SimulatorConfig};

use super::common::{load_circuit, print_histogram, spinner};

/// Execute the run command.
pub async fn execute(
    input: &str,
    shots: Option<u64>,
    seed: Option<u64>,
    config: Option<&str>,
) -> Result<()> {
    let mut settings = SimulatorConfig::load(config.map(Path::new))
        .context("Failed to load simulator configuration")?;
    if seed.is_some() {
        settings.seed = seed;
    }
    let shots = shots.unwrap_or(settings.default_shots);
    debug!(?settings, shots, "Resolved simulator settings");

    println!(
        "{} Running {} on {} ({} shots)",
        style("→").cyan().bold(),
        style(input).green(),
        style("simulator").yellow(),
        shots
    );

    let circuit = load_circuit(input)?;
    println!(
        "  Loaded: {} qubits, {} gates, depth {}",
        circuit.num_qubits(),
        circuit.len(),
        circuit.depth()
    );

    let backend = LocalSimulator::with_config(settings);
    let spinner = spinner("Simulating...")?;
    let result = backend.run(&circuit, Some(shots)).await;
    spinner.finish_and_clear();

    print_histogram(&result?);
    Ok(())
}
