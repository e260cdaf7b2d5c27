//! Static gate tables used by the v2 to v3 translator.

/// Gate definitions from `qelib1.inc` that `stdgates.inc` does not provide.
///
/// Injected after `include "stdgates.inc";` when a program includes `qelib1.inc`.
pub const GATE_LIBRARY: &str = include_str!("../resources/qelib_qasm3.qasm");

/// Gates whose name changes between dialects: `(qasm2, qasm3)`.
pub const GATE_RENAMES: &[(&str, &str)] = &[("u", "U")];

/// A gate with no `OpenQASM` 3 equivalent, replaced by a fixed sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decomposition {
    pub gate: &'static str,
    pub num_params: usize,
    pub num_qubits: usize,
    /// One statement per step, without the terminating `;`.
    /// `{p0}` and `{q0}` stand for the first parameter and qubit.
    pub steps: &'static [&'static str],
}

pub const DECOMPOSITIONS: &[Decomposition] = &[Decomposition {
    gate: "rxx",
    num_params: 1,
    num_qubits: 2,
    steps: &[
        "h {q0}",
        "h {q1}",
        "cx {q0},{q1}",
        "rz({p0}) {q1}",
        "cx {q0},{q1}",
        "h {q1}",
        "h {q0}",
    ],
}];

/// The `OpenQASM` 3 name of a gate, if it differs.
pub fn renamed(gate: &str) -> Option<&'static str> {
    GATE_RENAMES
        .iter()
        .find(|(from, _)| *from == gate)
        .map(|(_, to)| *to)
}

pub fn decomposition(gate: &str) -> Option<&'static Decomposition> {
    DECOMPOSITIONS.iter().find(|d| d.gate == gate)
}

impl Decomposition {
    /// Instantiate the steps with parameter and operand text.
    ///
    /// Callers check arity first; placeholders without an argument stay as written.
    pub fn expand(&self, params: &[&str], qubits: &[&str]) -> Vec<String> {
        self.steps
            .iter()
            .map(|step| {
                let mut text = (*step).to_string();
                for (i, p) in params.iter().enumerate() {
                    text = text.replace(&format!("{{p{i}}}"), p);
                }
                for (i, q) in qubits.iter().enumerate() {
                    text = text.replace(&format!("{{q{i}}}"), q);
                }
                text
            })
            .collect()
    }
}
