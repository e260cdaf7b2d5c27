//! Shared helpers for CLI commands.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use qbridge_hal::{ProviderConfig, QuantumProvider};

/// Read program text from a file, or from stdin when `input` is `-`.
pub fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .context("Failed to read from stdin")?;
        return Ok(source);
    }

    let path = Path::new(input);
    if !path.exists() {
        anyhow::bail!("File not found: {input}");
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {input}"))
}

/// Write program text to `output`, or to stdout when no file is given.
pub fn write_output(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => fs::write(path, text)
            .with_context(|| format!("Failed to write file: {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|()| stdout.flush())
                .context("Failed to write to stdout")
        }
    }
}

/// Build the device provider from `config`, or from the default locations.
pub fn load_provider(config: Option<&Path>) -> Result<QuantumProvider> {
    let config = ProviderConfig::load(config).context("Failed to load provider configuration")?;
    QuantumProvider::from_config(&config).context("Invalid provider configuration")
}
