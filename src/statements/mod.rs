//! Statement runner
//!
//! Executes catalog statements one at a time on a single connection and
//! runs the quality checks.

mod runner;

pub use runner::{run_all, run_quality_checks, CheckReport};

#[cfg(test)]
mod tests;
