//! `OpenQASM` 2 to `OpenQASM` 3 translation.

use tracing::{debug, instrument, warn};

use crate::error::{QasmError, QasmResult};
use crate::gates::{self, GATE_LIBRARY};
use crate::lexer::Token;
use crate::rewrite::Rewriter;
use crate::scanner::{
    Dialect, GateApplication, OperandReference, QasmProgram, RegisterKind, Statement,
    StatementKind,
};

/// Translate an `OpenQASM` 2 program to `OpenQASM` 3.
///
/// The rewrite works statement by statement on the source text, so comments
/// and layout survive. `qelib1.inc` is replaced by `stdgates.inc` plus the
/// definitions of the gates it lacks; opaque declarations become comments.
/// Anything that only exists in `OpenQASM` 3 is rejected.
#[instrument(skip(qasm2))]
pub fn convert_to_qasm3(qasm2: &str) -> QasmResult<String> {
    let program = QasmProgram::parse(qasm2)?;
    check_header(&program)?;

    let mut rewriter = Rewriter::new(qasm2);
    for stmt in program.statements() {
        translate_statement(&program, stmt, &mut rewriter)?;
    }

    debug!(statements = program.statements().len(), "Translated program to OpenQASM 3");
    Ok(rewriter.finish())
}

fn check_header(program: &QasmProgram<'_>) -> QasmResult<()> {
    let Some(first) = program.statements().first() else {
        return Err(QasmError::parse(1, "missing 'OPENQASM 2.0;' header"));
    };
    match &first.kind {
        StatementKind::Version {
            dialect: Dialect::Qasm2,
            ..
        } => Ok(()),
        StatementKind::Version { version, .. } => Err(QasmError::unsupported(
            first.line,
            format!("input is already OPENQASM {version}"),
        )),
        _ => Err(QasmError::parse(first.line, "missing 'OPENQASM 2.0;' header")),
    }
}

fn translate_statement(
    program: &QasmProgram<'_>,
    stmt: &Statement,
    rewriter: &mut Rewriter<'_>,
) -> QasmResult<()> {
    match &stmt.kind {
        StatementKind::Version { .. } => {
            rewriter.replace(stmt.span.clone(), "OPENQASM 3.0;");
        }
        StatementKind::Include(path) if path == "qelib1.inc" => {
            rewriter.replace(
                stmt.span.clone(),
                format!("include \"stdgates.inc\";\n{}", GATE_LIBRARY.trim_end()),
            );
        }
        StatementKind::Include(path) => {
            warn!(line = stmt.line, path = %path, "Keeping unknown include as written");
        }
        StatementKind::Declaration(decl) => {
            if decl.syntax == Dialect::Qasm3 {
                return Err(unsupported(program, stmt));
            }
            let keyword = match decl.kind {
                RegisterKind::Quantum => "qubit",
                RegisterKind::Classical => "bit",
            };
            rewriter.replace(
                stmt.span.clone(),
                format!("{keyword}[{}] {};", decl.size, decl.name),
            );
        }
        StatementKind::Opaque => {
            warn!(line = stmt.line, "Commenting out opaque gate declaration");
            rewriter.replace(
                stmt.span.clone(),
                format!("// {}", program.statement_text(stmt)),
            );
        }
        StatementKind::Measure {
            qubits,
            bits,
            arrow: true,
        } => {
            if bits.is_empty() {
                return Err(QasmError::parse(stmt.line, "measure without '->' target"));
            }
            let start = program
                .tokens_of(stmt)
                .iter()
                .find(|t| t.token == Token::Measure)
                .map_or(stmt.span.start, |t| t.span.start);
            rewriter.replace(
                start..stmt.span.end,
                format!(
                    "{} = measure {};",
                    operand_text(program, bits),
                    operand_text(program, qubits)
                ),
            );
        }
        StatementKind::GateCall(call) => translate_gate(program, stmt, call, rewriter)?,
        StatementKind::Measure { arrow: false, .. }
        | StatementKind::BlockStart
        | StatementKind::SubroutineCall { .. } => {
            return Err(unsupported(program, stmt));
        }
        StatementKind::Other => {
            // An empty statement is the only thing both dialects treat as a no-op.
            let empty = matches!(program.tokens_of(stmt), [t] if t.token == Token::Semicolon);
            if !empty {
                return Err(unsupported(program, stmt));
            }
        }
        StatementKind::GateDef { .. }
        | StatementKind::BlockEnd
        | StatementKind::Reset(_)
        | StatementKind::Barrier(_) => {}
    }
    Ok(())
}

fn translate_gate(
    program: &QasmProgram<'_>,
    stmt: &Statement,
    call: &GateApplication,
    rewriter: &mut Rewriter<'_>,
) -> QasmResult<()> {
    if call.modified {
        return Err(unsupported(program, stmt));
    }

    if let Some(name) = gates::renamed(&call.name) {
        debug!(from = %call.name, to = name, "Renaming gate");
        rewriter.replace(call.name_span.clone(), name);
        return Ok(());
    }

    let Some(decomposition) = gates::decomposition(&call.name) else {
        return Ok(());
    };
    if call.params.len() != decomposition.num_params
        || call.operands.len() != decomposition.num_qubits
    {
        return Err(QasmError::parse(
            stmt.line,
            format!(
                "'{}' takes {} parameter(s) and {} qubit(s), found {} and {}",
                call.name,
                decomposition.num_params,
                decomposition.num_qubits,
                call.params.len(),
                call.operands.len()
            ),
        ));
    }
    if stmt.conditional {
        return Err(QasmError::unsupported(
            stmt.line,
            format!("conditional '{}' cannot be decomposed", call.name),
        ));
    }

    let params: Vec<&str> = call.params.iter().map(|p| program.text(p)).collect();
    let qubits: Vec<&str> = call.operands.iter().map(|o| program.text(&o.span)).collect();
    let indent = program.line_indent(stmt.span.start);

    let mut text = format!("// {} gate", call.name);
    for step in decomposition.expand(&params, &qubits) {
        text.push('\n');
        text.push_str(indent);
        text.push_str(&step);
        text.push(';');
    }
    debug!(gate = %call.name, line = stmt.line, "Decomposing gate");
    rewriter.replace(stmt.span.clone(), text);
    Ok(())
}

fn operand_text(program: &QasmProgram<'_>, operands: &[OperandReference]) -> String {
    operands
        .iter()
        .map(|o| program.text(&o.span))
        .collect::<Vec<_>>()
        .join(", ")
}

fn unsupported(program: &QasmProgram<'_>, stmt: &Statement) -> QasmError {
    QasmError::unsupported(
        stmt.line,
        format!(
            "'{}' is not valid OpenQASM 2",
            program.statement_text(stmt).trim()
        ),
    )
}
