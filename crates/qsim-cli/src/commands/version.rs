//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - dense state-vector quantum simulation",
        style("qsim").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qsim-ir           Gates, circuits and backend operations");
    println!("  qsim-state        Amplitude vector, gate kernels, measurement");
    println!("  qsim-evolve       Trotter and QDrift Hamiltonian evolution");
    println!("  qsim-arith        Reversible constant arithmetic");
    println!("  qsim-hal          Backend abstraction and histograms");
    println!("  qsim-algo         Phase estimation and readout mitigation");
    println!("  qsim-adapter-sim  Local simulator backend");
    println!();
    println!("License: {}", style("Apache-2.0").dim());
}
