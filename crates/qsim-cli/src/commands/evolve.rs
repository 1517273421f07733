//! Evolve command implementation.

use anyhow::{Result, anyhow};
use console::style;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use qsim_evolve::{EvolutionConfig, QDriftEvolution, TrotterOrder, simulate};
use qsim_state::StateVector;

use super::common::{load_hamiltonian, spinner};

/// Basis probabilities below this are not printed.
const PRINT_THRESHOLD: f64 = 1e-9;

/// Execute the evolve command.
pub fn execute(
    input: &str,
    time: f64,
    steps: usize,
    order: u8,
    qdrift_samples: Option<usize>,
    seed: Option<u64>,
) -> Result<()> {
    let hamiltonian = load_hamiltonian(input)?;
    let n = hamiltonian.num_qubits() as usize;
    let initial = StateVector::try_new(n)?;

    let method = match qdrift_samples {
        Some(samples) => format!("QDrift, {samples} samples"),
        None => format!("order {order}, {steps} steps"),
    };
    println!(
        "{} Evolving {} ({} qubits, {} terms) for t = {} ({})",
        style("→").cyan().bold(),
        style(input).green(),
        n,
        hamiltonian.n_terms(),
        time,
        method
    );

    let spinner = spinner("Evolving...")?;
    let evolved = match qdrift_samples {
        Some(samples) => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            QDriftEvolution::new(&hamiltonian, time, samples).simulate_with_rng(&initial, &mut rng)
        }
        None => {
            let order = TrotterOrder::from_number(order)
                .ok_or_else(|| anyhow!("Trotter order must be 1 or 2, got {order}"))?;
            let config = EvolutionConfig::new(time, steps).with_order(order);
            simulate(&hamiltonian, &initial, &config)
        }
    };
    spinner.finish_and_clear();
    let evolved = evolved?;
    info!(norm = evolved.norm(), "Evolution complete");

    println!("\n{} Basis probabilities:", style("✓").green().bold());
    for (index, p) in evolved.probabilities().into_iter().enumerate() {
        if p > PRINT_THRESHOLD {
            println!(
                "  {}: {:.6}",
                style(evolved.outcome_to_bitstring(index)).cyan(),
                p
            );
        }
    }
    println!(
        "\n  ⟨H⟩:  {:.6}",
        style(hamiltonian.expectation(&evolved)?).yellow()
    );
    println!("  Norm: {:.12}", evolved.norm());
    Ok(())
}
