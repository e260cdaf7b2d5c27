//! Depth command implementation.

use anyhow::{Context, Result};

use qbridge_qasm3::qasm3_depth;

use super::common::read_input;

/// Execute the depth command.
pub fn execute(input: &str) -> Result<()> {
    let source = read_input(input)?;
    let depth = qasm3_depth(&source).with_context(|| format!("Failed to analyze {input}"))?;
    println!("{depth}");
    Ok(())
}
