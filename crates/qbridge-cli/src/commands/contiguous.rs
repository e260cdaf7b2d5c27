//! Contiguous command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use tracing::info;

use qbridge_qasm3::{contiguous_qasm3, qasm3_num_qubits};

use super::common::{read_input, write_output};

/// Execute the contiguous command.
pub fn execute(input: &str, output: Option<&Path>, expand: bool) -> Result<()> {
    let source = read_input(input)?;
    let before = qasm3_num_qubits(&source).with_context(|| format!("Failed to read {input}"))?;
    let rewritten = contiguous_qasm3(&source, expand)
        .with_context(|| format!("Failed to make {input} contiguous"))?;
    let after = qasm3_num_qubits(&rewritten)?;
    info!(expand, before, after, "Rewrote registers");

    write_output(&rewritten, output)?;
    if let Some(path) = output {
        eprintln!(
            "{} {} -> {} qubits, written to {}",
            style("✓").green().bold(),
            before,
            after,
            style(path.display()).green()
        );
    }
    Ok(())
}
