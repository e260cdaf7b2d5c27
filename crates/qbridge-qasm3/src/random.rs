//! Seeded random `OpenQASM` 3 circuits.
//!
//! Every layer touches each qubit exactly once, so an unmeasured circuit of
//! depth `d` has a [`qasm3_depth`](crate::qasm3_depth) of exactly `d`.

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{QasmError, QasmResult};

/// Largest gate arity the generator draws from.
pub const MAX_OPERANDS: usize = 3;

/// `(name, number of angle parameters)` per arity.
const ONE_QUBIT_GATES: &[(&str, usize)] = &[
    ("x", 0),
    ("y", 0),
    ("z", 0),
    ("h", 0),
    ("s", 0),
    ("sdg", 0),
    ("t", 0),
    ("tdg", 0),
    ("sx", 0),
    ("id", 0),
    ("rx", 1),
    ("ry", 1),
    ("rz", 1),
    ("p", 1),
    ("u1", 1),
    ("u2", 2),
    ("u3", 3),
];

const TWO_QUBIT_GATES: &[(&str, usize)] = &[
    ("cx", 0),
    ("cy", 0),
    ("cz", 0),
    ("ch", 0),
    ("swap", 0),
    ("crx", 1),
    ("cry", 1),
    ("crz", 1),
    ("cp", 1),
    ("cu", 4),
];

const THREE_QUBIT_GATES: &[(&str, usize)] = &[("ccx", 0), ("cswap", 0)];

/// Options for [`random_qasm3`]. Unset fields are drawn at random.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomCircuitOptions {
    pub num_qubits: Option<usize>,
    pub depth: Option<usize>,
    /// Largest gate arity, at most [`MAX_OPERANDS`].
    pub max_operands: Option<usize>,
    pub seed: Option<u64>,
    /// Measure every qubit into a classical register `c` at the end.
    pub measure: bool,
}

impl RandomCircuitOptions {
    fn validate(&self) -> QasmResult<()> {
        if self.num_qubits == Some(0) {
            return Err(QasmError::InvalidArgument(
                "num_qubits must be at least 1".into(),
            ));
        }
        if self.depth == Some(0) {
            return Err(QasmError::InvalidArgument("depth must be at least 1".into()));
        }
        match self.max_operands {
            Some(0) => Err(QasmError::InvalidArgument(
                "max_operands must be at least 1".into(),
            )),
            Some(k) if k > MAX_OPERANDS => Err(QasmError::InvalidArgument(format!(
                "max_operands must be at most {MAX_OPERANDS}, got {k}"
            ))),
            _ => Ok(()),
        }
    }
}

/// Generate a random `OpenQASM` 3 circuit.
///
/// The same options always give the same text. Without a seed, one is drawn
/// from `0..1000` and recorded in the header comment with the other
/// resolved parameters.
#[instrument]
pub fn random_qasm3(options: &RandomCircuitOptions) -> QasmResult<String> {
    options.validate()?;

    let seed = options
        .seed
        .unwrap_or_else(|| rand::thread_rng().gen_range(0..1000));
    let mut rng = StdRng::seed_from_u64(seed);

    let num_qubits = options
        .num_qubits
        .unwrap_or_else(|| rng.gen_range(1..=4));
    let depth = options.depth.unwrap_or_else(|| rng.gen_range(1..=4));
    let max_operands = options
        .max_operands
        .unwrap_or_else(|| rng.gen_range(1..=MAX_OPERANDS.min(num_qubits)))
        .min(num_qubits);

    let mut out = format!(
        "// Random circuit generated by qbridge\n\
         OPENQASM 3.0;\n\
         include \"stdgates.inc\";\n\
         /*\n    seed = {seed}\n    num_qubits = {num_qubits}\n    depth = {depth}\n    max_operands = {max_operands}\n*/\n\
         qubit[{num_qubits}] q;\n"
    );
    if options.measure {
        out.push_str(&format!("bit[{num_qubits}] c;\n"));
    }

    let mut qubits: Vec<usize> = (0..num_qubits).collect();
    for _ in 0..depth {
        qubits.shuffle(&mut rng);
        let mut remaining = qubits.as_slice();
        while !remaining.is_empty() {
            let arity = rng.gen_range(1..=max_operands.min(remaining.len()));
            let (group, rest) = remaining.split_at(arity);
            write_gate(&mut out, &mut rng, group);
            remaining = rest;
        }
    }

    if options.measure {
        for i in 0..num_qubits {
            out.push_str(&format!("c[{i}] = measure q[{i}];\n"));
        }
    }

    debug!(seed, num_qubits, depth, max_operands, "Generated random circuit");
    Ok(out)
}

fn write_gate(out: &mut String, rng: &mut StdRng, operands: &[usize]) {
    let pool = match operands.len() {
        1 => ONE_QUBIT_GATES,
        2 => TWO_QUBIT_GATES,
        _ => THREE_QUBIT_GATES,
    };
    let (name, num_params) = pool[rng.gen_range(0..pool.len())];

    out.push_str(name);
    if num_params > 0 {
        let angles: Vec<String> = (0..num_params)
            .map(|_| rng.gen_range(0.0..2.0 * PI).to_string())
            .collect();
        out.push_str(&format!("({})", angles.join(",")));
    }
    let targets: Vec<String> = operands.iter().map(|q| format!("q[{q}]")).collect();
    out.push_str(&format!(" {};\n", targets.join(",")));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{qasm3_depth, qasm3_num_qubits};

    fn options(num_qubits: usize, depth: usize, max_operands: usize, seed: u64) -> RandomCircuitOptions {
        RandomCircuitOptions {
            num_qubits: Some(num_qubits),
            depth: Some(depth),
            max_operands: Some(max_operands),
            seed: Some(seed),
            measure: false,
        }
    }

    #[test]
    fn test_header_records_parameters() {
        let circuit = random_qasm3(&RandomCircuitOptions {
            measure: true,
            ..options(3, 3, 3, 42)
        })
        .unwrap();
        assert!(circuit.starts_with(
            "// Random circuit generated by qbridge\nOPENQASM 3.0;\ninclude \"stdgates.inc\";\n/*\n    seed = 42\n    num_qubits = 3\n    depth = 3\n    max_operands = 3\n*/\nqubit[3] q;\nbit[3] c;\n"
        ));
        assert!(circuit.ends_with("c[0] = measure q[0];\nc[1] = measure q[1];\nc[2] = measure q[2];\n"));
        assert_eq!(qasm3_num_qubits(&circuit).unwrap(), 3);
    }

    #[test]
    fn test_same_options_same_text() {
        let opts = options(4, 5, 2, 7);
        assert_eq!(random_qasm3(&opts).unwrap(), random_qasm3(&opts).unwrap());
    }

    #[test]
    fn test_depth_matches_request() {
        for depth in 1..8 {
            let circuit = random_qasm3(&options(4, depth, 3, 42)).unwrap();
            assert_eq!(qasm3_depth(&circuit).unwrap(), depth);
        }
    }

    #[test]
    fn test_defaults_in_range() {
        for seed in 0..20 {
            let circuit = random_qasm3(&RandomCircuitOptions {
                seed: Some(seed),
                ..Default::default()
            })
            .unwrap();
            let n = qasm3_num_qubits(&circuit).unwrap();
            assert!((1..=4).contains(&n));
            assert!(!circuit.contains("bit["));
        }
    }

    #[test]
    fn test_max_operands_capped_at_qubits() {
        let circuit = random_qasm3(&options(1, 3, 3, 1)).unwrap();
        assert!(circuit.contains("    max_operands = 1\n"));
    }

    #[test]
    fn test_invalid_arguments() {
        for opts in [
            options(0, 1, 1, 0),
            options(1, 0, 1, 0),
            options(2, 1, 0, 0),
            options(4, 1, 4, 0),
        ] {
            assert!(matches!(
                random_qasm3(&opts),
                Err(QasmError::InvalidArgument(_))
            ));
        }
    }
}
