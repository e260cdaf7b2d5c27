//! Convert command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use tracing::info;

use qbridge_qasm3::convert_to_qasm3;

use super::common::{read_input, write_output};

/// Execute the convert command.
pub fn execute(input: &str, output: Option<&Path>) -> Result<()> {
    let qasm2 = read_input(input)?;
    let qasm3 =
        convert_to_qasm3(&qasm2).with_context(|| format!("Failed to convert {input}"))?;
    info!(input, bytes = qasm3.len(), "Converted to OpenQASM 3");

    write_output(&qasm3, output)?;
    if let Some(path) = output {
        eprintln!(
            "{} Wrote OpenQASM 3 to {}",
            style("✓").green().bold(),
            style(path.display()).green()
        );
    }
    Ok(())
}
