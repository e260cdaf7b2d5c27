//! Known-input conversions, checked byte for byte.

use qbridge_qasm3::gates::GATE_LIBRARY;
use qbridge_qasm3::{
    QasmError, contiguous_qasm3, convert_to_qasm3, qasm3_depth, qasm3_num_qubits, qasm3_qubits,
};

fn stdgates_with_library() -> String {
    format!("include \"stdgates.inc\";\n{}", GATE_LIBRARY.trim_end())
}

#[test]
fn test_declaration_program() {
    let qasm2 = r#"
OPENQASM 2.0;
include "qelib1.inc";
qreg q[1] ;
qreg qubits  [10]   ;
creg c[1];
creg bits   [12]   ;
        "#;
    let expected = format!(
        "\nOPENQASM 3.0;\n{}\nqubit[1] q;\nqubit[10] qubits;\nbit[1] c;\nbit[12] bits;\n        ",
        stdgates_with_library()
    );
    assert_eq!(convert_to_qasm3(qasm2).unwrap(), expected);
}

#[test]
fn test_measurement_program() {
    let qasm2 = r#"
OPENQASM 2.0;
include "qelib1.inc";
qreg q[2];
creg c[2];
measure q->c;
measure q[0] -> c[1];
"#;
    let expected = format!(
        "\nOPENQASM 3.0;\n{}\nqubit[2] q;\nbit[2] c;\nc = measure q;\nc[1] = measure q[0];\n",
        stdgates_with_library()
    );
    assert_eq!(convert_to_qasm3(qasm2).unwrap(), expected);
}

#[test]
fn test_opaque_program() {
    let qasm2 = r#"
OPENQASM 2.0;
include "qelib1.inc";
qreg q[2];
creg c[2];
opaque custom_gate (a,b,c) p,q,r;
"#;
    let out = convert_to_qasm3(qasm2).unwrap();
    assert!(out.ends_with("qubit[2] q;\nbit[2] c;\n// opaque custom_gate (a,b,c) p,q,r;\n"));
}

#[test]
fn test_extended_gate_program() {
    let qasm2 = r#"
OPENQASM 2.0;
include "qelib1.inc";
qreg q[5];
u(1,2,3) q[0];
sxdg q[0];
csx q[0], q[1];
cu1(0.5) q[0], q[1];
cu3(1,2,3) q[0], q[1];
rzz(0.5) q[0], q[1];
rccx q[0], q[1], q[2];
rc3x q[0], q[1], q[2], q[3];
c3x q[0], q[1], q[2], q[3];
c3sqrtx q[0], q[1], q[2], q[3];
c4x q[0], q[1], q[2], q[3], q[4];
"#;
    let expected = format!(
        r#"
OPENQASM 3.0;
{}
qubit[5] q;
U(1,2,3) q[0];
sxdg q[0];
csx q[0], q[1];
cu1(0.5) q[0], q[1];
cu3(1,2,3) q[0], q[1];
rzz(0.5) q[0], q[1];
rccx q[0], q[1], q[2];
rc3x q[0], q[1], q[2], q[3];
c3x q[0], q[1], q[2], q[3];
c3sqrtx q[0], q[1], q[2], q[3];
c4x q[0], q[1], q[2], q[3], q[4];
"#,
        stdgates_with_library()
    );
    let out = convert_to_qasm3(qasm2).unwrap();
    assert_eq!(out, expected);

    // The injected library scans as part of the program.
    assert_eq!(qasm3_qubits(&out).unwrap(), vec![("q".to_string(), 5)]);
    assert_eq!(qasm3_depth(&out).unwrap(), 11);
}

#[test]
fn test_rxx_program() {
    let qasm2 = "
    OPENQASM 2.0;
    include \"qelib1.inc\";
    qreg q[3];
    rxx(0.5) q[0], q[1];";
    let expected = format!(
        "
    OPENQASM 3.0;
    {}
    qubit[3] q;
    // rxx gate
    h q[0];
    h q[1];
    cx q[0],q[1];
    rz(0.5) q[1];
    cx q[0],q[1];
    h q[1];
    h q[0];",
        stdgates_with_library()
    );
    assert_eq!(convert_to_qasm3(qasm2).unwrap(), expected);
}

#[test]
fn test_converted_program_compacts() {
    let qasm2 = "OPENQASM 2.0;\ninclude \"qelib1.inc\";\nqreg q1[2];\nqreg q2[3];\nx q1[0];\ncx q1[0], q2[2];\n";
    let qasm3 = convert_to_qasm3(qasm2).unwrap();
    assert_eq!(qasm3_num_qubits(&qasm3).unwrap(), 5);

    let compact = contiguous_qasm3(&qasm3, false).unwrap();
    assert!(compact.ends_with("qubit[1] q1;\nqubit[1] q2;\nx q1[0];\ncx q1[0], q2[0];\n"));
    assert_eq!(qasm3_num_qubits(&compact).unwrap(), 2);

    let expanded = contiguous_qasm3(&qasm3, true).unwrap();
    assert!(expanded.ends_with("i q1[1];\ni q2[0];\ni q2[1];\n"));
}

#[test]
fn test_index_out_of_range_is_reported() {
    let err = contiguous_qasm3("OPENQASM 3.0;\nqubit[2] q;\n\nh q[2];\n", false).unwrap_err();
    assert_eq!(
        err,
        QasmError::IndexOutOfRange {
            line: 4,
            register: "q".to_string(),
            index: 2,
            size: 2,
        }
    );
    assert_eq!(
        err.to_string(),
        "Index 2 out of range for register 'q' of size 2 (line 4)"
    );
}
