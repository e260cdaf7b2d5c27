//! Qubits command implementation.

use anyhow::{Context, Result};
use console::style;
use serde::Serialize;

use qbridge_qasm3::qasm3_qubits;

use super::common::read_input;
use crate::OutputFormat;

#[derive(Serialize)]
struct QubitReport {
    registers: Vec<RegisterEntry>,
    num_qubits: usize,
}

#[derive(Serialize)]
struct RegisterEntry {
    name: String,
    size: usize,
}

/// Execute the qubits command.
pub fn execute(input: &str, format: OutputFormat) -> Result<()> {
    let source = read_input(input)?;
    let registers =
        qasm3_qubits(&source).with_context(|| format!("Failed to analyze {input}"))?;

    let report = QubitReport {
        num_qubits: registers.iter().map(|(_, size)| size).sum(),
        registers: registers
            .into_iter()
            .map(|(name, size)| RegisterEntry { name, size })
            .collect(),
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Table => {
            println!("{:<16} {:>6}", style("Register").bold(), style("Qubits").bold());
            for entry in &report.registers {
                println!("{:<16} {:>6}", style(&entry.name).cyan(), entry.size);
            }
            println!("{:<16} {:>6}", "total", style(report.num_qubits).yellow());
        }
    }
    Ok(())
}
