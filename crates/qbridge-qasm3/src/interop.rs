//! Interop seam for circuit libraries that speak `OpenQASM` 2.
//!
//! A vendor circuit layer implements [`Qasm2Interop`]; [`circuit_to_qasm3`]
//! then gets its circuits to `OpenQASM` 3 through the translator.

use thiserror::Error;
use tracing::debug;

use crate::error::QasmError;
use crate::translate::convert_to_qasm3;

/// Conversion between a library's circuit type and `OpenQASM` 2 text.
pub trait Qasm2Interop {
    type Circuit;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Library identifier, used in log and error messages.
    fn name(&self) -> &str;

    fn circuit_to_qasm2(&self, circuit: &Self::Circuit) -> Result<String, Self::Error>;

    fn qasm2_to_circuit(&self, qasm2: &str) -> Result<Self::Circuit, Self::Error>;
}

/// Errors from converting a library circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InteropError {
    #[error("{library} failed to export OpenQASM 2: {source}")]
    Export {
        library: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error(transparent)]
    Qasm(#[from] QasmError),
}

/// Convert a library circuit to `OpenQASM` 3 via its `OpenQASM` 2 export.
pub fn circuit_to_qasm3<I: Qasm2Interop>(
    interop: &I,
    circuit: &I::Circuit,
) -> Result<String, InteropError> {
    let qasm2 = interop
        .circuit_to_qasm2(circuit)
        .map_err(|e| InteropError::Export {
            library: interop.name().to_string(),
            source: Box::new(e),
        })?;
    debug!(library = interop.name(), "Exported circuit as OpenQASM 2");
    Ok(convert_to_qasm3(&qasm2)?)
}
