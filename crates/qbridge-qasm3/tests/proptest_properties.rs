//! Property-based tests for conversion, contiguity and depth.
//!
//! Programs are generated as `OpenQASM` 2 text with one or more registers,
//! only some of whose qubits are used.

use proptest::prelude::*;
use qbridge_qasm3::{
    RandomCircuitOptions, contiguous_qasm3, convert_to_qasm3, qasm3_depth, qasm3_num_qubits,
    random_qasm3,
};

/// Gate operations on `(register, index)` qubits.
#[derive(Debug, Clone)]
enum GateOp {
    H(usize, u32),
    X(usize, u32),
    Rz(f64, usize, u32),
    Cx((usize, u32), (usize, u32)),
    Measure(usize, u32),
}

impl GateOp {
    fn render(&self) -> String {
        match self {
            GateOp::H(r, i) => format!("h q{r}[{i}];"),
            GateOp::X(r, i) => format!("x q{r}[{i}];"),
            GateOp::Rz(theta, r, i) => format!("rz({theta}) q{r}[{i}];"),
            GateOp::Cx((r0, i0), (r1, i1)) => format!("cx q{r0}[{i0}], q{r1}[{i1}];"),
            GateOp::Measure(r, i) => format!("measure q{r}[{i}] -> c{r}[{i}];"),
        }
    }
}

/// A qubit of one of the declared registers.
fn arb_qubit(sizes: Vec<u32>) -> impl Strategy<Value = (usize, u32)> {
    (0..sizes.len()).prop_flat_map(move |r| (Just(r), 0..sizes[r]))
}

fn arb_gate_op(sizes: Vec<u32>) -> impl Strategy<Value = GateOp> {
    prop_oneof![
        arb_qubit(sizes.clone()).prop_map(|(r, i)| GateOp::H(r, i)),
        arb_qubit(sizes.clone()).prop_map(|(r, i)| GateOp::X(r, i)),
        (0.0..6.28_f64, arb_qubit(sizes.clone())).prop_map(|(t, (r, i))| GateOp::Rz(t, r, i)),
        (arb_qubit(sizes.clone()), arb_qubit(sizes.clone()))
            .prop_filter("Control and target must differ", |(c, t)| c != t)
            .prop_map(|(c, t)| GateOp::Cx(c, t)),
        arb_qubit(sizes).prop_map(|(r, i)| GateOp::Measure(r, i)),
    ]
}

/// Register sizes and a list of operations on them.
fn arb_program() -> impl Strategy<Value = (Vec<u32>, Vec<GateOp>)> {
    prop::collection::vec(1_u32..=5, 1..=3).prop_flat_map(|sizes| {
        (
            Just(sizes.clone()),
            prop::collection::vec(arb_gate_op(sizes), 0..=12),
        )
    })
}

fn render_qasm2(sizes: &[u32], ops: &[GateOp]) -> String {
    let mut out = String::from("OPENQASM 2.0;\ninclude \"qelib1.inc\";\n");
    for (r, size) in sizes.iter().enumerate() {
        out.push_str(&format!("qreg q{r}[{size}];\ncreg c{r}[{size}];\n"));
    }
    for op in ops {
        out.push_str(&op.render());
        out.push('\n');
    }
    out
}

/// Ways a program can end, including without a final newline.
fn arb_ending() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["\n", "", "   ", " // end", "\n// end", " /* end */"])
}

proptest! {
    /// The qubit count survives the v2 to v3 translation.
    #[test]
    fn test_conversion_preserves_qubit_count((sizes, ops) in arb_program()) {
        let qasm2 = render_qasm2(&sizes, &ops);
        let qasm3 = convert_to_qasm3(&qasm2).expect("conversion failed");

        let expected: u32 = sizes.iter().sum();
        prop_assert_eq!(qasm3_num_qubits(&qasm2).unwrap(), expected as usize);
        prop_assert_eq!(qasm3_num_qubits(&qasm3).unwrap(), expected as usize);
    }

    /// Translation keeps the circuit structure, so depth is unchanged.
    #[test]
    fn test_conversion_preserves_depth((sizes, ops) in arb_program()) {
        let qasm2 = render_qasm2(&sizes, &ops);
        let qasm3 = convert_to_qasm3(&qasm2).expect("conversion failed");
        prop_assert_eq!(qasm3_depth(&qasm3).unwrap(), qasm3_depth(&qasm2).unwrap());
    }

    /// Applying either contiguity mode twice gives the result of applying it once.
    #[test]
    fn test_contiguity_is_idempotent((sizes, ops) in arb_program(), expansion in any::<bool>()) {
        let qasm3 = convert_to_qasm3(&render_qasm2(&sizes, &ops)).expect("conversion failed");

        let once = contiguous_qasm3(&qasm3, expansion).expect("first pass failed");
        let twice = contiguous_qasm3(&once, expansion).expect("second pass failed");
        prop_assert_eq!(once, twice);
    }

    /// Idempotence holds whatever the program ends with, and expanded
    /// padding is real code rather than part of a trailing comment.
    #[test]
    fn test_contiguity_with_any_ending(
        (sizes, ops) in arb_program(),
        ending in arb_ending(),
        expansion in any::<bool>(),
    ) {
        let qasm3 = convert_to_qasm3(&render_qasm2(&sizes, &ops)).expect("conversion failed");
        let source = format!("{}{ending}", qasm3.trim_end_matches('\n'));

        let once = contiguous_qasm3(&source, expansion).expect("first pass failed");
        let twice = contiguous_qasm3(&once, expansion).expect("second pass failed");
        prop_assert_eq!(&once, &twice);
        if expansion {
            prop_assert_eq!(&contiguous_qasm3(&once, false).unwrap(), &once);
        }
    }

    /// Compaction never grows the program and preserves depth.
    #[test]
    fn test_compaction_preserves_depth((sizes, ops) in arb_program()) {
        let qasm3 = convert_to_qasm3(&render_qasm2(&sizes, &ops)).expect("conversion failed");
        let compact = contiguous_qasm3(&qasm3, false).expect("compaction failed");

        prop_assert!(qasm3_num_qubits(&compact).unwrap() <= qasm3_num_qubits(&qasm3).unwrap());
        prop_assert_eq!(qasm3_depth(&compact).unwrap(), qasm3_depth(&qasm3).unwrap());
    }

    /// Appending an operation never lowers depth.
    #[test]
    fn test_depth_is_monotonic((sizes, ops) in arb_program(), extra in 0usize..5) {
        let qasm2 = render_qasm2(&sizes, &ops);
        let before = qasm3_depth(&qasm2).unwrap();

        let op = match extra {
            0 => GateOp::H(0, 0),
            1 => GateOp::Measure(0, 0),
            2 => GateOp::Rz(0.5, sizes.len() - 1, 0),
            _ => GateOp::X(0, sizes[0] - 1),
        };
        let after = qasm3_depth(&format!("{qasm2}{}\n", op.render())).unwrap();
        prop_assert!(after >= before);
        prop_assert!(after <= before + 1);
    }

    /// Identical options give byte-identical circuits.
    #[test]
    fn test_random_generation_is_deterministic(
        num_qubits in 1_usize..=6,
        depth in 1_usize..=6,
        max_operands in 1_usize..=3,
        seed in any::<u64>(),
        measure in any::<bool>(),
    ) {
        let options = RandomCircuitOptions {
            num_qubits: Some(num_qubits),
            depth: Some(depth),
            max_operands: Some(max_operands),
            seed: Some(seed),
            measure,
        };
        let first = random_qasm3(&options).expect("generation failed");
        let second = random_qasm3(&options).expect("generation failed");

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(qasm3_num_qubits(&first).unwrap(), num_qubits);
        if !measure {
            prop_assert_eq!(qasm3_depth(&first).unwrap(), depth);
        }
    }
}
