//! qsim Command-Line Interface
//!
//! The main entry point for the `qsim` tool: run circuits on the local
//! state-vector simulator, evolve states under Pauli Hamiltonians and
//! estimate phases.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{evolve, phase, run, version};

/// qsim - state-vector quantum simulation
#[derive(Parser)]
#[command(name = "qsim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a circuit on the local simulator and print the counts
    Run {
        /// Input circuit (JSON)
        #[arg(short, long)]
        input: String,

        /// Number of shots (defaults to the configured value)
        #[arg(short, long)]
        shots: Option<u64>,

        /// RNG seed for reproducible sampling
        #[arg(long)]
        seed: Option<u64>,

        /// Simulator configuration file (YAML)
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Evolve |0...0> under a Hamiltonian
    Evolve {
        /// Input Hamiltonian (JSON)
        #[arg(short, long)]
        input: String,

        /// Evolution time
        #[arg(short, long)]
        time: f64,

        /// Number of Trotter steps
        #[arg(long, default_value = "100")]
        steps: usize,

        /// Trotter order (1 or 2)
        #[arg(long, default_value = "1")]
        order: u8,

        /// Use QDrift with this many samples instead of Trotterization
        #[arg(long)]
        qdrift: Option<usize>,

        /// RNG seed for QDrift sampling
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Estimate the phase of a single-qubit phase gate
    Phase {
        /// Gate angle in radians
        #[arg(long, allow_negative_numbers = true)]
        theta: f64,

        /// Number of counting qubits
        #[arg(short, long, default_value = "8")]
        precision: usize,

        /// RNG seed for the sampled estimate
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Run {
            input,
            shots,
            seed,
            config,
        } => run::execute(&input, shots, seed, config.as_deref()).await,

        Commands::Evolve {
            input,
            time,
            steps,
            order,
            qdrift,
            seed,
        } => evolve::execute(&input, time, steps, order, qdrift, seed),

        Commands::Phase {
            theta,
            precision,
            seed,
        } => phase::execute(theta, precision, seed),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
