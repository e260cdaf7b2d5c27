//! `OpenQASM` dialect conversion and introspection for qbridge
//!
//! This crate works on QASM text directly. Programs are scanned into
//! statements that keep their byte spans, and every rewrite splices the
//! original source, so comments and layout come through unchanged.
//!
//! # Entry Points
//!
//! | Function | Purpose |
//! |----------|---------|
//! | [`convert_to_qasm3`] | `OpenQASM` 2 to `OpenQASM` 3 |
//! | [`contiguous_qasm3`] | Compact registers, or pad unused qubits with `i` |
//! | [`qasm3_depth`] | Circuit depth |
//! | [`qasm3_qubits`] | Quantum registers and sizes |
//! | [`qasm3_num_qubits`] | Total qubit count |
//! | [`random_qasm3`] | Seeded random `OpenQASM` 3 circuit |
//!
//! # Example: Converting QASM
//!
//! ```rust
//! use qbridge_qasm3::{convert_to_qasm3, qasm3_num_qubits};
//!
//! let qasm2 = r#"
//! OPENQASM 2.0;
//! qreg q[2];
//! creg c[2];
//! h q[0];
//! cx q[0], q[1];
//! measure q -> c;
//! "#;
//!
//! let qasm3 = convert_to_qasm3(qasm2).unwrap();
//! assert!(qasm3.contains("qubit[2] q;"));
//! assert!(qasm3.contains("c = measure q;"));
//! assert_eq!(qasm3_num_qubits(&qasm3).unwrap(), 2);
//! ```
//!
//! # Example: Compacting Registers
//!
//! ```rust
//! use qbridge_qasm3::contiguous_qasm3;
//!
//! let sparse = "OPENQASM 3.0;\nqubit[4] q;\nh q[1];\ncx q[1], q[3];\n";
//! let compact = contiguous_qasm3(sparse, false).unwrap();
//! assert_eq!(compact, "OPENQASM 3.0;\nqubit[2] q;\nh q[0];\ncx q[0], q[1];\n");
//! ```
//!
//! # Example: Random Circuits
//!
//! ```rust
//! use qbridge_qasm3::{qasm3_depth, random_qasm3, RandomCircuitOptions};
//!
//! let options = RandomCircuitOptions {
//!     num_qubits: Some(3),
//!     depth: Some(4),
//!     seed: Some(42),
//!     ..Default::default()
//! };
//! let circuit = random_qasm3(&options).unwrap();
//! assert_eq!(qasm3_depth(&circuit).unwrap(), 4);
//! ```

mod analysis;
mod contiguity;
mod error;
pub mod gates;
pub mod interop;
mod inventory;
mod lexer;
mod random;
mod rewrite;
mod scanner;
mod translate;

pub use analysis::{qasm3_depth, qasm3_num_qubits, qasm3_qubits};
pub use contiguity::contiguous_qasm3;
pub use error::{QasmError, QasmResult};
pub use inventory::{RegisterInventory, RegisterUsage};
pub use random::{RandomCircuitOptions, random_qasm3};
pub use translate::convert_to_qasm3;

// Re-export scanner types for callers that inspect programs
pub mod syntax {
    pub use crate::scanner::*;
}
