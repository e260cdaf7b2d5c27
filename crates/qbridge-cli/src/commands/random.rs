//! Random command implementation.

use std::path::Path;

use anyhow::{Context, Result};

use qbridge_qasm3::{RandomCircuitOptions, random_qasm3};

use super::common::write_output;

/// Execute the random command.
pub fn execute(
    num_qubits: Option<usize>,
    depth: Option<usize>,
    max_operands: Option<usize>,
    seed: Option<u64>,
    measure: bool,
    output: Option<&Path>,
) -> Result<()> {
    let options = RandomCircuitOptions {
        num_qubits,
        depth,
        max_operands,
        seed,
        measure,
    };
    let circuit = random_qasm3(&options).context("Failed to generate circuit")?;
    write_output(&circuit, output)
}
