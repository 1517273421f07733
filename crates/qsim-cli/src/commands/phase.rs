//! Phase estimation command implementation.

use anyhow::Result;
use console::style;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::f64::consts::TAU;

use qsim_algo::PhaseEstimation;

/// Execute the phase command.
pub fn execute(theta: f64, precision: usize, seed: Option<u64>) -> Result<()> {
    println!(
        "{} Estimating the phase of P({}) with {} counting qubits",
        style("→").cyan().bold(),
        theta,
        precision
    );

    let qpe = PhaseEstimation::for_phase_gate(theta, precision)?;
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let sample = qpe.estimate(&mut rng)?;
    let best = qpe.most_likely()?;

    println!("\n{} Estimate:", style("✓").green().bold());
    println!(
        "  Sampled:     y = {:>6}  phase = {:.6}  (p = {:.4})",
        sample.outcome, sample.phase, sample.probability
    );
    println!(
        "  Most likely: y = {:>6}  phase = {:.6}  (p = {:.4})",
        best.outcome, best.phase, best.probability
    );
    println!(
        "  Exact:       phase = {:.6}",
        style((theta / TAU).rem_euclid(1.0)).yellow()
    );
    Ok(())
}
