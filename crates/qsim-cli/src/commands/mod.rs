//! CLI command implementations.

pub mod common;
pub mod evolve;
pub mod phase;
pub mod run;
pub mod version;
