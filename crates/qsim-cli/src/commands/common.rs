//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use qsim_evolve::Hamiltonian;
use qsim_hal::Histogram;
use qsim_ir::Circuit;

/// Outcomes shown before the listing is truncated.
const MAX_ROWS: usize = 16;

fn read_source(path: &str) -> Result<String> {
    if !Path::new(path).exists() {
        anyhow::bail!("File not found: {path}");
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))
}

/// Load and validate a circuit from a JSON file.
pub fn load_circuit(path: &str) -> Result<Circuit> {
    let source = read_source(path)?;
    let circuit: Circuit =
        serde_json::from_str(&source).with_context(|| format!("Invalid circuit JSON: {path}"))?;
    circuit
        .validate()
        .with_context(|| format!("Invalid circuit: {path}"))?;
    Ok(circuit)
}

/// Load a Hamiltonian from a JSON file.
pub fn load_hamiltonian(path: &str) -> Result<Hamiltonian> {
    let source = read_source(path)?;
    Hamiltonian::from_json(&source).with_context(|| format!("Invalid Hamiltonian: {path}"))
}

/// A cyan spinner ticking every 100 ms.
pub fn spinner(message: impl Into<String>) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}

/// Print a histogram as a bar table, most frequent first.
pub fn print_histogram(histogram: &Histogram) {
    let total = histogram.total_shots();
    println!(
        "\n{} Results ({} shots):",
        style("✓").green().bold(),
        total
    );

    let sorted = histogram.sorted();
    for (bitstring, count) in sorted.iter().take(MAX_ROWS) {
        let prob = *count as f64 / total.max(1) as f64 * 100.0;
        let bar_len = (prob / 2.0).round() as usize;
        let bar: String = "█".repeat(bar_len);

        println!(
            "  {}: {:>6} ({:>5.2}%) {}",
            style(bitstring).cyan(),
            count,
            prob,
            style(bar).green()
        );
    }

    if sorted.len() > MAX_ROWS {
        println!("  ... and {} more outcomes", sorted.len() - MAX_ROWS);
    }
}
