//! CLI command implementations.

pub mod common;
pub mod contiguous;
pub mod convert;
pub mod depth;
pub mod devices;
pub mod qubits;
pub mod random;
pub mod version;
