//! Benchmarks for qbridge QASM operations
//!
//! Run with: cargo bench -p qbridge-qasm3

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qbridge_qasm3::{
    RandomCircuitOptions, contiguous_qasm3, convert_to_qasm3, qasm3_depth, random_qasm3,
};

/// A layered OpenQASM 2 program over `n` qubits.
fn qasm2_program(num_qubits: usize, layers: usize) -> String {
    let mut source = format!(
        "OPENQASM 2.0;\ninclude \"qelib1.inc\";\nqreg q[{num_qubits}];\ncreg c[{num_qubits}];\n"
    );
    for layer in 0..layers {
        for i in 0..num_qubits {
            source.push_str(&format!("u3(0.1,0.2,0.{layer}) q[{i}];\n"));
        }
        for i in (layer % 2..num_qubits.saturating_sub(1)).step_by(2) {
            source.push_str(&format!("cx q[{i}],q[{}];\n", i + 1));
        }
    }
    source.push_str("measure q -> c;\n");
    source
}

fn random_program(num_qubits: usize, depth: usize) -> String {
    random_qasm3(&RandomCircuitOptions {
        num_qubits: Some(num_qubits),
        depth: Some(depth),
        max_operands: Some(3),
        seed: Some(7),
        measure: true,
    })
    .unwrap()
}

fn bench_conversion(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert_to_qasm3");

    for num_qubits in &[5, 20, 50] {
        let source = qasm2_program(*num_qubits, 20);
        group.bench_with_input(BenchmarkId::new("layers_20", num_qubits), &source, |b, s| {
            b.iter(|| convert_to_qasm3(black_box(s)).unwrap());
        });
    }

    group.finish();
}

fn bench_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("qasm3_depth");

    for depth in &[10, 100, 500] {
        let source = random_program(20, *depth);
        group.bench_with_input(BenchmarkId::new("qubits_20", depth), &source, |b, s| {
            b.iter(|| qasm3_depth(black_box(s)).unwrap());
        });
    }

    group.finish();
}

fn bench_contiguity(c: &mut Criterion) {
    let mut group = c.benchmark_group("contiguous_qasm3");
    let source = random_program(30, 100);

    group.bench_function("compact", |b| {
        b.iter(|| contiguous_qasm3(black_box(&source), false).unwrap());
    });
    group.bench_function("expand", |b| {
        b.iter(|| contiguous_qasm3(black_box(&source), true).unwrap());
    });

    group.finish();
}

fn bench_random(c: &mut Criterion) {
    c.bench_function("random_qasm3/20x100", |b| {
        b.iter(|| random_program(black_box(20), black_box(100)));
    });
}

criterion_group!(
    benches,
    bench_conversion,
    bench_depth,
    bench_contiguity,
    bench_random
);
criterion_main!(benches);
