//! Error types for QASM conversion and introspection.

use thiserror::Error;

/// Errors that can occur while scanning, rewriting or analyzing QASM.
#[derive(Debug, Clone, Error, PartialEq)]
#[non_exhaustive]
pub enum QasmError {
    /// Malformed or unrecognized statement.
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Valid QASM for which no translation rule exists.
    #[error("Unsupported construct at line {line}: {construct}")]
    UnsupportedConstruct { line: usize, construct: String },

    /// Operand index at or beyond the declared register size.
    #[error("Index {index} out of range for register '{register}' of size {size} (line {line})")]
    IndexOutOfRange {
        line: usize,
        register: String,
        index: u32,
        size: u32,
    },

    /// Invalid argument to a generator or helper.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl QasmError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        QasmError::Parse {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn unsupported(line: usize, construct: impl Into<String>) -> Self {
        QasmError::UnsupportedConstruct {
            line,
            construct: construct.into(),
        }
    }
}

/// Result type for QASM operations.
pub type QasmResult<T> = Result<T, QasmError>;
