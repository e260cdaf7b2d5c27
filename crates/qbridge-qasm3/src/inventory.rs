//! Register inventory: declared sizes against referenced indices.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::{QasmError, QasmResult};
use crate::scanner::{QasmProgram, RegisterDeclaration, RegisterKind, StatementKind};

/// Usage of one declared register.
#[derive(Debug, Clone)]
pub struct RegisterUsage {
    pub declaration: RegisterDeclaration,
    /// Index of the declaring statement in [`QasmProgram::statements`].
    pub statement: usize,
    indices: BTreeSet<u32>,
    whole: bool,
}

impl RegisterUsage {
    pub fn name(&self) -> &str {
        &self.declaration.name
    }

    pub fn size(&self) -> u32 {
        self.declaration.size
    }

    pub fn kind(&self) -> RegisterKind {
        self.declaration.kind
    }

    /// Highest index referenced explicitly, `None` if the register is never indexed.
    pub fn max_referenced_index(&self) -> Option<u32> {
        self.indices.last().copied()
    }

    /// Indices referenced explicitly, ascending.
    pub fn used_indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.indices.iter().copied()
    }

    /// Whether some operation addresses the register as a whole.
    pub fn is_referenced_whole(&self) -> bool {
        self.whole
    }

    pub fn is_referenced(&self) -> bool {
        self.whole || !self.indices.is_empty()
    }

    /// Declared indices no operation touches.
    pub fn unused_indices(&self) -> Vec<u32> {
        if self.whole {
            return Vec::new();
        }
        (0..self.size())
            .filter(|i| !self.indices.contains(i))
            .collect()
    }
}

/// Per-register inventory of a program.
///
/// Operands inside custom gate bodies are formal arguments, not registers,
/// and are not counted.
#[derive(Debug, Clone, Default)]
pub struct RegisterInventory {
    registers: Vec<RegisterUsage>,
    by_name: FxHashMap<String, usize>,
    problems: Vec<QasmError>,
}

impl RegisterInventory {
    /// Collect declarations and operand references.
    ///
    /// Only duplicate declarations fail here; out-of-range indices and
    /// undeclared registers are reported by [`RegisterInventory::validate`].
    pub fn build(program: &QasmProgram<'_>) -> QasmResult<Self> {
        let mut inventory = Self::default();

        for (i, stmt) in program.statements().iter().enumerate() {
            if stmt.in_definition {
                continue;
            }
            if let StatementKind::Declaration(decl) = &stmt.kind {
                if inventory.by_name.contains_key(&decl.name) {
                    return Err(QasmError::parse(
                        stmt.line,
                        format!("duplicate declaration of register '{}'", decl.name),
                    ));
                }
                inventory
                    .by_name
                    .insert(decl.name.clone(), inventory.registers.len());
                inventory.registers.push(RegisterUsage {
                    declaration: decl.clone(),
                    statement: i,
                    indices: BTreeSet::new(),
                    whole: false,
                });
            }
        }

        for stmt in program.statements().iter().filter(|s| !s.in_definition) {
            for operand in stmt.operands() {
                let Some(&slot) = inventory.by_name.get(&operand.register) else {
                    // Subroutine arguments may be classical variables.
                    if matches!(stmt.kind, StatementKind::SubroutineCall { .. }) {
                        continue;
                    }
                    inventory.problems.push(QasmError::parse(
                        stmt.line,
                        format!("undeclared register '{}'", operand.register),
                    ));
                    continue;
                };
                let usage = &mut inventory.registers[slot];
                match operand.index {
                    Some(index) if index >= usage.size() => {
                        inventory.problems.push(QasmError::IndexOutOfRange {
                            line: stmt.line,
                            register: operand.register.clone(),
                            index,
                            size: usage.size(),
                        });
                    }
                    Some(index) => {
                        usage.indices.insert(index);
                    }
                    None => usage.whole = true,
                }
            }
        }

        debug!(
            registers = inventory.registers.len(),
            problems = inventory.problems.len(),
            "Built register inventory"
        );
        Ok(inventory)
    }

    /// Report the first inconsistency found while building.
    pub fn validate(&self) -> QasmResult<()> {
        match self.problems.first() {
            Some(problem) => Err(problem.clone()),
            None => Ok(()),
        }
    }

    /// All registers in declaration order.
    pub fn registers(&self) -> &[RegisterUsage] {
        &self.registers
    }

    pub fn get(&self, name: &str) -> Option<&RegisterUsage> {
        self.by_name.get(name).map(|&i| &self.registers[i])
    }

    /// Quantum registers in declaration order.
    pub fn quantum(&self) -> impl Iterator<Item = &RegisterUsage> {
        self.registers
            .iter()
            .filter(|r| r.kind() == RegisterKind::Quantum)
    }

    /// Total number of declared qubits.
    pub fn num_qubits(&self) -> usize {
        self.quantum().map(|r| r.size() as usize).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inventory(source: &str) -> RegisterInventory {
        let program = QasmProgram::parse(source).unwrap();
        RegisterInventory::build(&program).unwrap()
    }

    #[test]
    fn test_max_referenced_index() {
        let inv = inventory("OPENQASM 3.0;\nqubit[4] q;\nqubit[2] r;\nh q[2];\ncx q[0], q[2];");
        let q = inv.get("q").unwrap();
        assert_eq!(q.size(), 4);
        assert_eq!(q.max_referenced_index(), Some(2));
        assert_eq!(q.used_indices().collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(q.unused_indices(), vec![1, 3]);
        assert_eq!(inv.get("r").unwrap().max_referenced_index(), None);
        assert!(inv.validate().is_ok());
    }

    #[test]
    fn test_gate_body_operands_are_skipped() {
        let source = r"
            gate custom q1, q2 {
                x q1;
                y q2;
            }
            qreg q1[2];
            qubit[2] q2;
            x q1[0];
        ";
        let inv = inventory(source);
        let q1 = inv.get("q1").unwrap();
        assert!(!q1.is_referenced_whole());
        assert_eq!(q1.unused_indices(), vec![1]);
        assert!(!inv.get("q2").unwrap().is_referenced());
    }

    #[test]
    fn test_whole_register_reference() {
        let inv = inventory("qubit[3] q;\nbit[3] c;\nc = measure q;");
        assert!(inv.get("q").unwrap().is_referenced_whole());
        assert!(inv.get("q").unwrap().unused_indices().is_empty());
        assert!(inv.get("c").unwrap().is_referenced_whole());
        assert_eq!(inv.num_qubits(), 3);
    }

    #[test]
    fn test_out_of_range_reported_on_validate() {
        let inv = inventory("qreg q[2];\nx q[2];");
        assert!(matches!(
            inv.validate(),
            Err(QasmError::IndexOutOfRange { line: 2, index: 2, size: 2, .. })
        ));
    }

    #[test]
    fn test_undeclared_register_reported_on_validate() {
        let inv = inventory("qubit[1] q;\nx r[0];");
        assert!(matches!(inv.validate(), Err(QasmError::Parse { line: 2, .. })));
    }

    #[test]
    fn test_duplicate_declaration_fails() {
        let program = QasmProgram::parse("qubit[1] q;\nqreg q[2];").unwrap();
        assert!(RegisterInventory::build(&program).is_err());
    }
}
