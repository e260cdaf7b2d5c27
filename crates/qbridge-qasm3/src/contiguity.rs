//! Contiguous register rewriting.
//!
//! A program is contiguous when every declared qubit is used. [`contiguous_qasm3`]
//! either pads unused qubits with identity gates (expansion) or shrinks the
//! registers and renumbers the operands (compaction). Both modes only touch
//! quantum registers and are idempotent.

use rustc_hash::FxHashMap;
use tracing::{debug, instrument};

use crate::error::QasmResult;
use crate::inventory::RegisterInventory;
use crate::rewrite::Rewriter;
use crate::scanner::QasmProgram;

/// Make the registers of a program contiguous.
///
/// With `expansion`, an `i` gate is appended for every unused qubit, in
/// register declaration order then index order. Without it, each register
/// indexed explicitly is resized to its number of used indices and the
/// operands are renumbered in order; registers that are never referenced lose
/// their declaration (the line stays, blanked). Registers referenced as a
/// whole are left alone, as are custom gate and subroutine definitions.
#[instrument(skip(source))]
pub fn contiguous_qasm3(source: &str, expansion: bool) -> QasmResult<String> {
    let program = QasmProgram::parse(source)?;
    let inventory = RegisterInventory::build(&program)?;
    inventory.validate()?;

    if expansion {
        Ok(expand(source, &inventory))
    } else {
        Ok(compact(&program, &inventory))
    }
}

fn expand(source: &str, inventory: &RegisterInventory) -> String {
    let mut output = source.to_string();
    let mut padded = 0usize;
    for register in inventory.quantum() {
        for index in register.unused_indices() {
            // Padding goes on a line of its own, never after a trailing comment.
            if output
                .rsplit('\n')
                .next()
                .is_some_and(|tail| !tail.trim().is_empty())
            {
                output.push('\n');
            }
            output.push_str(&format!("i {}[{}];\n", register.name(), index));
            padded += 1;
        }
    }
    debug!(padded, "Expanded program to contiguous registers");
    output
}

fn compact(program: &QasmProgram<'_>, inventory: &RegisterInventory) -> String {
    let mut rewriter = Rewriter::new(program.source());
    let mut mappings: FxHashMap<&str, FxHashMap<u32, u32>> = FxHashMap::default();

    for register in inventory.quantum() {
        if register.is_referenced_whole() {
            continue;
        }
        let declaration = &program.statements()[register.statement];

        if !register.is_referenced() {
            debug!(register = register.name(), "Removing unused register");
            rewriter.replace(declaration.span.clone(), "");
            continue;
        }

        let used: Vec<u32> = register.used_indices().collect();
        let new_size = u32::try_from(used.len()).unwrap_or(u32::MAX);
        if new_size != register.size() {
            if let Some(size_span) = &register.declaration.size_span {
                debug!(
                    register = register.name(),
                    from = register.size(),
                    to = new_size,
                    "Shrinking register"
                );
                rewriter.replace(size_span.clone(), new_size.to_string());
            }
        }

        let mapping: FxHashMap<u32, u32> = used
            .iter()
            .zip(0..)
            .filter(|(old, new)| *old != new)
            .map(|(&old, new)| (old, new))
            .collect();
        if !mapping.is_empty() {
            mappings.insert(register.name(), mapping);
        }
    }

    for stmt in program.statements().iter().filter(|s| !s.in_definition) {
        for operand in stmt.operands() {
            let (Some(mapping), Some(index), Some(span)) = (
                mappings.get(operand.register.as_str()),
                operand.index,
                operand.index_span.as_ref(),
            ) else {
                continue;
            };
            if let Some(new_index) = mapping.get(&index) {
                rewriter.replace(span.clone(), new_index.to_string());
            }
        }
    }

    rewriter.finish()
}
