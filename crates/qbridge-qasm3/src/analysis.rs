//! Qubit counting and circuit depth.

use rustc_hash::FxHashMap;
use tracing::{debug, instrument};

use crate::error::{QasmError, QasmResult};
use crate::scanner::{OperandReference, QasmProgram, RegisterKind, StatementKind};

/// Quantum registers and their sizes, in declaration order.
pub fn qasm3_qubits(source: &str) -> QasmResult<Vec<(String, usize)>> {
    let program = QasmProgram::parse(source)?;
    Ok(program
        .declarations()
        .filter(|(_, decl)| decl.kind == RegisterKind::Quantum)
        .map(|(_, decl)| (decl.name.clone(), decl.size as usize))
        .collect())
}

/// Total number of declared qubits.
pub fn qasm3_num_qubits(source: &str) -> QasmResult<usize> {
    Ok(qasm3_qubits(source)?.iter().map(|(_, size)| size).sum())
}

/// Circuit depth: the length of the longest chain of operations sharing a
/// qubit or classical bit.
///
/// Gate calls, measurements and resets on whole registers count once per
/// index; a barrier or subroutine call counts once over everything it names.
/// Custom gate and subroutine bodies are definitions and do not contribute.
#[instrument(skip(source))]
pub fn qasm3_depth(source: &str) -> QasmResult<usize> {
    let program = QasmProgram::parse(source)?;
    let mut layers = LayerCounter::new(&program);

    for stmt in program.statements().iter().filter(|s| s.is_operation()) {
        match &stmt.kind {
            StatementKind::Barrier(operands) if operands.is_empty() => {
                let all = layers.all_qubits();
                layers.apply(all);
            }
            StatementKind::Barrier(operands) => {
                let mut slots = Vec::new();
                for operand in operands {
                    slots.extend(layers.expand(operand, stmt.line)?);
                }
                layers.apply(slots);
            }
            StatementKind::SubroutineCall { args, .. } => {
                let mut slots = Vec::new();
                for arg in args.iter().filter(|a| layers.declares(&a.register)) {
                    slots.extend(layers.expand(arg, stmt.line)?);
                }
                layers.apply(slots);
            }
            _ => {
                let operands = stmt.operands();
                for slots in layers.broadcast(&operands, stmt.line)? {
                    layers.apply(slots);
                }
            }
        }
    }

    debug!(depth = layers.depth, "Computed circuit depth");
    Ok(layers.depth)
}

type Slot<'p> = (&'p str, u32);

struct LayerCounter<'p> {
    sizes: FxHashMap<&'p str, (u32, RegisterKind)>,
    order: Vec<&'p str>,
    layers: FxHashMap<Slot<'p>, usize>,
    depth: usize,
}

impl<'p> LayerCounter<'p> {
    fn new(program: &'p QasmProgram<'_>) -> Self {
        let mut sizes = FxHashMap::default();
        let mut order = Vec::new();
        for (_, decl) in program.declarations() {
            sizes.insert(decl.name.as_str(), (decl.size, decl.kind));
            order.push(decl.name.as_str());
        }
        Self {
            sizes,
            order,
            layers: FxHashMap::default(),
            depth: 0,
        }
    }

    fn declares(&self, register: &str) -> bool {
        self.sizes.contains_key(register)
    }

    fn size_of(&self, register: &str, line: usize) -> QasmResult<u32> {
        self.sizes
            .get(register)
            .map(|(size, _)| *size)
            .ok_or_else(|| QasmError::parse(line, format!("undeclared register '{register}'")))
    }

    fn all_qubits(&self) -> Vec<Slot<'p>> {
        self.order
            .iter()
            .filter_map(|name| {
                self.sizes
                    .get(name)
                    .filter(|(_, kind)| *kind == RegisterKind::Quantum)
                    .map(|(size, _)| (*name, *size))
            })
            .flat_map(|(name, size)| (0..size).map(move |i| (name, i)))
            .collect()
    }

    /// Every slot an operand names.
    fn expand(&self, operand: &'p OperandReference, line: usize) -> QasmResult<Vec<Slot<'p>>> {
        let register = operand.register.as_str();
        match operand.index {
            Some(index) => Ok(vec![(register, index)]),
            None => Ok((0..self.size_of(register, line)?)
                .map(|i| (register, i))
                .collect()),
        }
    }

    /// One slot set per application of a broadcast operation.
    fn broadcast(
        &self,
        operands: &[&'p OperandReference],
        line: usize,
    ) -> QasmResult<Vec<Vec<Slot<'p>>>> {
        let mut width: Option<u32> = None;
        for operand in operands.iter().filter(|o| o.index.is_none()) {
            let size = self.size_of(&operand.register, line)?;
            match width {
                Some(w) if w != size => {
                    return Err(QasmError::parse(
                        line,
                        format!(
                            "register '{}' of size {size} broadcast against size {w}",
                            operand.register
                        ),
                    ));
                }
                _ => width = Some(size),
            }
        }

        Ok((0..width.unwrap_or(1))
            .map(|i| {
                operands
                    .iter()
                    .map(|o| (o.register.as_str(), o.index.unwrap_or(i)))
                    .collect()
            })
            .collect())
    }

    fn apply(&mut self, slots: Vec<Slot<'p>>) {
        if slots.is_empty() {
            return;
        }
        let layer = slots
            .iter()
            .map(|slot| self.layers.get(slot).copied().unwrap_or(0))
            .max()
            .unwrap_or(0)
            + 1;
        for slot in slots {
            self.layers.insert(slot, layer);
        }
        self.depth = self.depth.max(layer);
    }
}
