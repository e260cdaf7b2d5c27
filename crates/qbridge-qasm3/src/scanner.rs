//! Statement scanner for `OpenQASM` sources.
//!
//! The scanner turns a source string into an ordered list of [`Statement`]s.
//! It does not build a circuit: every statement keeps the byte span it was
//! read from, so later passes can rewrite the text in place and leave
//! comments, blank lines and indentation untouched.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::{QasmError, QasmResult};
use crate::lexer::{SpannedToken, Token, tokenize};

/// `OpenQASM` language version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dialect {
    Qasm2,
    Qasm3,
}

/// Whether a register holds qubits or classical bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegisterKind {
    Quantum,
    Classical,
}

/// A `qreg`/`creg`/`qubit`/`bit` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterDeclaration {
    pub name: String,
    pub size: u32,
    pub kind: RegisterKind,
    /// Declaration syntax: `qreg q[2];` is [`Dialect::Qasm2`], `qubit[2] q;` is [`Dialect::Qasm3`].
    pub syntax: Dialect,
    /// Span of the size literal; absent for `qubit q;`.
    pub size_span: Option<Range<usize>>,
}

/// A register operand: `q` (whole register) or `q[3]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperandReference {
    pub register: String,
    pub index: Option<u32>,
    /// Span of the full operand text.
    pub span: Range<usize>,
    /// Span of the index literal.
    pub index_span: Option<Range<usize>>,
}

/// A gate application such as `rz(pi/2) q[0];`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateApplication {
    pub name: String,
    pub name_span: Range<usize>,
    /// Parameter expressions, as spans into the source.
    pub params: Vec<Range<usize>>,
    pub operands: Vec<OperandReference>,
    /// Carries `ctrl @`, `negctrl @`, `inv @` or `pow(..) @` modifiers.
    pub modified: bool,
}

/// Parsed kind of a statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatementKind {
    /// `OPENQASM 2.0;`
    Version { version: String, dialect: Dialect },
    /// `include "file";`
    Include(String),
    /// Register declaration.
    Declaration(RegisterDeclaration),
    /// Header of a custom gate definition, up to and including `{`.
    GateDef {
        name: String,
        params: Vec<String>,
        qubits: Vec<String>,
    },
    /// Header of any other block: control flow (`if (..) {`, `for .. {`,
    /// `else {`) or a subroutine (`def f(qubit a) {`).
    BlockStart,
    /// A closing `}`.
    BlockEnd,
    /// `opaque name(params) args;`
    Opaque,
    GateCall(GateApplication),
    /// `measure a -> b;` (`arrow`) or `b = measure a;`.
    Measure {
        qubits: Vec<OperandReference>,
        bits: Vec<OperandReference>,
        arrow: bool,
    },
    Reset(Vec<OperandReference>),
    Barrier(Vec<OperandReference>),
    /// `name(args);` calling a subroutine. `args` holds the arguments that are
    /// plain `name` or `name[index]` references; they may also name classical
    /// variables, which are not registers.
    SubroutineCall {
        name: String,
        args: Vec<OperandReference>,
    },
    /// Anything else: classical declarations, assignments, loops, subroutines.
    Other,
}

/// One statement of a program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub kind: StatementKind,
    /// Byte span, from the first token to the terminating `;`, `{` or `}`.
    pub span: Range<usize>,
    /// 1-based line of the first token.
    pub line: usize,
    /// True for statements of a custom gate or subroutine body, including its
    /// closing `}`. Their operands are formal parameters, not registers.
    pub in_definition: bool,
    /// Set when the statement is guarded by `if (..)`.
    pub conditional: bool,
    pub(crate) tokens: Range<usize>,
}

impl Statement {
    /// Whether the statement acts on qubits at run time.
    pub fn is_operation(&self) -> bool {
        !self.in_definition
            && matches!(
                self.kind,
                StatementKind::GateCall(_)
                    | StatementKind::Measure { .. }
                    | StatementKind::Reset(_)
                    | StatementKind::Barrier(_)
                    | StatementKind::SubroutineCall { .. }
            )
    }

    /// All register operands referenced by this statement.
    pub fn operands(&self) -> Vec<&OperandReference> {
        match &self.kind {
            StatementKind::GateCall(call) => call.operands.iter().collect(),
            StatementKind::Measure { qubits, bits, .. } => qubits.iter().chain(bits).collect(),
            StatementKind::Reset(ops)
            | StatementKind::Barrier(ops)
            | StatementKind::SubroutineCall { args: ops, .. } => ops.iter().collect(),
            _ => Vec::new(),
        }
    }
}

/// A custom gate definition with its body.
#[derive(Debug, Clone, Copy)]
pub struct GateDefinition<'p> {
    pub name: &'p str,
    pub params: &'p [String],
    pub qubits: &'p [String],
    pub body: &'p [Statement],
}

/// A scanned QASM program.
#[derive(Debug, Clone)]
pub struct QasmProgram<'a> {
    source: &'a str,
    tokens: Vec<SpannedToken>,
    statements: Vec<Statement>,
    line_starts: Vec<usize>,
}

impl<'a> QasmProgram<'a> {
    /// Scan a source string into statements.
    pub fn parse(source: &'a str) -> QasmResult<Self> {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect::<Vec<_>>();

        let mut program = Self {
            source,
            tokens: Vec::new(),
            statements: Vec::new(),
            line_starts,
        };

        for result in tokenize(source) {
            match result {
                Ok(t) => program.tokens.push(t),
                Err((span, message)) => {
                    return Err(QasmError::parse(program.line_of(span.start), message));
                }
            }
        }

        program.statements = program.group_statements()?;
        Ok(program)
    }

    /// The source text.
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Statements in program order.
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// The declared language version, if the program has a header.
    pub fn dialect(&self) -> Option<Dialect> {
        self.statements.iter().find_map(|s| match &s.kind {
            StatementKind::Version { dialect, .. } => Some(*dialect),
            _ => None,
        })
    }

    /// Source text of a span.
    pub fn text(&self, span: &Range<usize>) -> &'a str {
        &self.source[span.clone()]
    }

    /// Source text of a statement.
    pub fn statement_text(&self, statement: &Statement) -> &'a str {
        self.text(&statement.span)
    }

    /// Register declarations in declaration order, skipping gate bodies.
    pub fn declarations(&self) -> impl Iterator<Item = (&Statement, &RegisterDeclaration)> {
        self.statements.iter().filter_map(|s| match &s.kind {
            StatementKind::Declaration(decl) if !s.in_definition => Some((s, decl)),
            _ => None,
        })
    }

    /// Custom gate definitions in program order.
    pub fn gate_definitions(&self) -> Vec<GateDefinition<'_>> {
        let mut defs = Vec::new();
        for (i, stmt) in self.statements.iter().enumerate() {
            if let StatementKind::GateDef {
                name,
                params,
                qubits,
            } = &stmt.kind
            {
                let end = self.statements[i + 1..]
                    .iter()
                    .position(|s| s.kind == StatementKind::BlockEnd)
                    .map_or(self.statements.len(), |p| i + 1 + p);
                defs.push(GateDefinition {
                    name,
                    params,
                    qubits,
                    body: &self.statements[i + 1..end],
                });
            }
        }
        defs
    }

    /// 1-based line containing a byte offset.
    pub fn line_of(&self, offset: usize) -> usize {
        self.line_starts.partition_point(|&start| start <= offset)
    }

    /// Leading whitespace of the line containing a byte offset.
    pub fn line_indent(&self, offset: usize) -> &'a str {
        let start = self.line_starts[self.line_of(offset) - 1];
        let line = &self.source[start..offset];
        let end = line
            .find(|c: char| c != ' ' && c != '\t')
            .unwrap_or(line.len());
        &line[..end]
    }

    pub(crate) fn tokens_of(&self, statement: &Statement) -> &[SpannedToken] {
        &self.tokens[statement.tokens.clone()]
    }

    /// Split the token stream at `;`, `{` and `}`.
    fn group_statements(&self) -> QasmResult<Vec<Statement>> {
        let mut statements = Vec::new();
        let mut blocks: Vec<BlockKind> = Vec::new();
        let mut start = 0;

        for (i, spanned) in self.tokens.iter().enumerate() {
            let in_gate = blocks.contains(&BlockKind::Gate);
            let in_definition = in_gate || blocks.contains(&BlockKind::Subroutine);
            match spanned.token {
                Token::Semicolon => {
                    statements.push(self.classify(start..i + 1, in_definition)?);
                    start = i + 1;
                }
                Token::LBrace => {
                    let first = &self.tokens[start];
                    let line = self.line_of(first.span.start);
                    if in_gate {
                        return Err(QasmError::parse(
                            line,
                            "blocks are not allowed inside a gate definition",
                        ));
                    }
                    let block = match first.token {
                        Token::Gate => BlockKind::Gate,
                        Token::Def => BlockKind::Subroutine,
                        _ => BlockKind::Other,
                    };
                    let kind = if block == BlockKind::Gate {
                        self.parse_gate_header(start..i, line)?
                    } else {
                        StatementKind::BlockStart
                    };
                    statements.push(Statement {
                        kind,
                        span: first.span.start..spanned.span.end,
                        line,
                        in_definition,
                        conditional: false,
                        tokens: start..i + 1,
                    });
                    blocks.push(block);
                    start = i + 1;
                }
                Token::RBrace => {
                    let line = self.line_of(spanned.span.start);
                    if start != i {
                        return Err(QasmError::parse(line, "expected ';' before '}'"));
                    }
                    blocks
                        .pop()
                        .ok_or_else(|| QasmError::parse(line, "unbalanced '}'"))?;
                    statements.push(Statement {
                        kind: StatementKind::BlockEnd,
                        span: spanned.span.clone(),
                        line,
                        in_definition,
                        conditional: false,
                        tokens: i..i + 1,
                    });
                    start = i + 1;
                }
                _ => {}
            }
        }

        if let Some(dangling) = self.tokens.get(start) {
            return Err(QasmError::parse(
                self.line_of(dangling.span.start),
                "unterminated statement, expected ';'",
            ));
        }
        if !blocks.is_empty() {
            let line = self.line_of(self.source.len());
            return Err(QasmError::parse(line, "unclosed '{' at end of input"));
        }

        Ok(statements)
    }

    /// Parse `gate name(params) a, b` (tokens before `{`).
    fn parse_gate_header(&self, range: Range<usize>, line: usize) -> QasmResult<StatementKind> {
        let mut cursor = Cursor::new(&self.tokens[range], line);
        cursor.expect(&Token::Gate)?;
        let name = cursor.parse_identifier()?;
        let params = if cursor.consume(&Token::LParen) {
            if cursor.consume(&Token::RParen) {
                Vec::new()
            } else {
                let p = cursor.parse_identifier_list()?;
                cursor.expect(&Token::RParen)?;
                p
            }
        } else {
            Vec::new()
        };
        let qubits = cursor.parse_identifier_list()?;
        cursor.finish()?;
        Ok(StatementKind::GateDef {
            name,
            params,
            qubits,
        })
    }

    /// Classify a `;`-terminated statement.
    fn classify(&self, range: Range<usize>, in_definition: bool) -> QasmResult<Statement> {
        let tokens = &self.tokens[range.clone()];
        let span = tokens[0].span.start..tokens[tokens.len() - 1].span.end;
        let line = self.line_of(span.start);
        let mut cursor = Cursor::new(tokens, line);

        let conditional = cursor.check(&Token::If);
        if conditional {
            cursor.skip_condition()?;
        }

        let kind = match cursor.peek() {
            Some(Token::OpenQasm) => self.parse_version(&mut cursor)?,
            Some(Token::Include) => {
                cursor.advance();
                let path = match cursor.advance() {
                    Some(Token::StringLiteral(s)) => s.clone(),
                    _ => return Err(QasmError::parse(line, "expected include path")),
                };
                cursor.expect(&Token::Semicolon)?;
                StatementKind::Include(path)
            }
            Some(Token::Qreg) => self.parse_qasm2_decl(&mut cursor, RegisterKind::Quantum)?,
            Some(Token::Creg) => self.parse_qasm2_decl(&mut cursor, RegisterKind::Classical)?,
            Some(Token::Qubit) => self.parse_qasm3_decl(&mut cursor, RegisterKind::Quantum)?,
            Some(Token::Bit) => self.parse_qasm3_decl(&mut cursor, RegisterKind::Classical)?,
            Some(Token::Opaque) => StatementKind::Opaque,
            Some(Token::Gate) => {
                return Err(QasmError::parse(line, "gate definition without a body"));
            }
            Some(Token::Measure) => {
                cursor.advance();
                let qubits = cursor.parse_operands()?;
                let bits = if cursor.consume(&Token::Arrow) {
                    cursor.parse_operands()?
                } else {
                    Vec::new()
                };
                cursor.expect(&Token::Semicolon)?;
                StatementKind::Measure {
                    qubits,
                    bits,
                    arrow: true,
                }
            }
            Some(Token::Reset) => {
                cursor.advance();
                let qubits = cursor.parse_operands()?;
                cursor.expect(&Token::Semicolon)?;
                StatementKind::Reset(qubits)
            }
            Some(Token::Barrier) => {
                cursor.advance();
                let qubits = if cursor.check(&Token::Semicolon) {
                    Vec::new()
                } else {
                    cursor.parse_operands()?
                };
                cursor.expect(&Token::Semicolon)?;
                StatementKind::Barrier(qubits)
            }
            Some(Token::Identifier(_)) => self.parse_identifier_statement(&mut cursor)?,
            Some(Token::Semicolon) => StatementKind::Other,
            Some(
                Token::Int
                | Token::Uint
                | Token::Float
                | Token::Angle
                | Token::Bool
                | Token::Const
                | Token::Let
                | Token::Def
                | Token::For
                | Token::While
                | Token::Else
                | Token::Return
                | Token::Delay
                | Token::Input
                | Token::Output,
            ) => StatementKind::Other,
            Some(other) => {
                return Err(QasmError::parse(
                    line,
                    format!("unexpected '{other}' at start of statement"),
                ));
            }
            None => return Err(QasmError::parse(line, "empty conditional statement")),
        };

        Ok(Statement {
            kind,
            span,
            line,
            in_definition,
            conditional,
            tokens: range,
        })
    }

    fn parse_version(&self, cursor: &mut Cursor<'_>) -> QasmResult<StatementKind> {
        cursor.advance();
        let version = match cursor.advance_spanned() {
            Some(t) if matches!(t.token, Token::FloatLiteral(_) | Token::IntLiteral(_)) => {
                self.text(&t.span).to_string()
            }
            _ => return Err(QasmError::parse(cursor.line, "expected version number")),
        };
        cursor.expect(&Token::Semicolon)?;

        let dialect = match version.split('.').next() {
            Some("2") => Dialect::Qasm2,
            Some("3") => Dialect::Qasm3,
            _ => {
                return Err(QasmError::parse(
                    cursor.line,
                    format!("invalid OPENQASM version: {version}"),
                ));
            }
        };
        Ok(StatementKind::Version { version, dialect })
    }

    /// `qreg name[size];`
    fn parse_qasm2_decl(
        &self,
        cursor: &mut Cursor<'_>,
        kind: RegisterKind,
    ) -> QasmResult<StatementKind> {
        cursor.advance();
        let name = cursor.parse_identifier()?;
        cursor.expect(&Token::LBracket)?;
        let (size, size_span) = cursor.parse_size()?;
        cursor.expect(&Token::RBracket)?;
        cursor.expect(&Token::Semicolon)?;
        Ok(StatementKind::Declaration(RegisterDeclaration {
            name,
            size,
            kind,
            syntax: Dialect::Qasm2,
            size_span: Some(size_span),
        }))
    }

    /// `qubit[size] name;` or `qubit name;`
    fn parse_qasm3_decl(
        &self,
        cursor: &mut Cursor<'_>,
        kind: RegisterKind,
    ) -> QasmResult<StatementKind> {
        cursor.advance();
        let (size, size_span) = if cursor.consume(&Token::LBracket) {
            let (size, span) = cursor.parse_size()?;
            cursor.expect(&Token::RBracket)?;
            (size, Some(span))
        } else {
            (1, None)
        };
        let name = cursor.parse_identifier()?;
        if !cursor.check(&Token::Semicolon) {
            // `bit c = measure q;` and other initialised declarations.
            return Ok(StatementKind::Other);
        }
        cursor.expect(&Token::Semicolon)?;
        Ok(StatementKind::Declaration(RegisterDeclaration {
            name,
            size,
            kind,
            syntax: Dialect::Qasm3,
            size_span,
        }))
    }

    /// Gate call, `c = measure q;` or a classical assignment.
    fn parse_identifier_statement(&self, cursor: &mut Cursor<'_>) -> QasmResult<StatementKind> {
        let rest = cursor.remaining();

        if matches!(rest.get(1).map(|t| &t.token), Some(Token::Eq | Token::LBracket)) {
            let target = cursor.parse_operand()?;
            if cursor.consume(&Token::Eq) && cursor.consume(&Token::Measure) {
                let qubits = cursor.parse_operands()?;
                cursor.expect(&Token::Semicolon)?;
                return Ok(StatementKind::Measure {
                    qubits,
                    bits: vec![target],
                    arrow: false,
                });
            }
            return Ok(StatementKind::Other);
        }

        if cursor.at_subroutine_call() {
            return cursor.parse_subroutine_call();
        }

        if let Some(last_at) = rest.iter().rposition(|t| t.token == Token::At) {
            cursor.skip(last_at + 1);
            let mut call = cursor.parse_gate_call()?;
            call.modified = true;
            return Ok(StatementKind::GateCall(call));
        }

        match rest.get(1).map(|t| &t.token) {
            Some(Token::Identifier(_) | Token::LParen) => {
                Ok(StatementKind::GateCall(cursor.parse_gate_call()?))
            }
            // Compound assignment and other classical expressions.
            _ => Ok(StatementKind::Other),
        }
    }
}

/// Kind of an open `{` block while grouping statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Gate,
    Subroutine,
    Other,
}

/// Token cursor over one statement.
struct Cursor<'t> {
    tokens: &'t [SpannedToken],
    pos: usize,
    line: usize,
}

impl<'t> Cursor<'t> {
    fn new(tokens: &'t [SpannedToken], line: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            line,
        }
    }

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    fn remaining(&self) -> &'t [SpannedToken] {
        &self.tokens[self.pos.min(self.tokens.len())..]
    }

    fn advance_spanned(&mut self) -> Option<&'t SpannedToken> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    fn advance(&mut self) -> Option<&'t Token> {
        self.advance_spanned().map(|t| &t.token)
    }

    fn skip(&mut self, n: usize) {
        self.pos += n;
    }

    fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(token))
    }

    fn consume(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> QasmResult<()> {
        match self.advance() {
            Some(found) if std::mem::discriminant(found) == std::mem::discriminant(expected) => {
                Ok(())
            }
            Some(found) => Err(QasmError::parse(
                self.line,
                format!("expected '{expected}', found '{found}'"),
            )),
            None => Err(QasmError::parse(
                self.line,
                format!("expected '{expected}', found end of statement"),
            )),
        }
    }

    /// Require that only the terminator (if any) is left.
    fn finish(&self) -> QasmResult<()> {
        match self.peek() {
            None => Ok(()),
            Some(t) => Err(QasmError::parse(self.line, format!("unexpected '{t}'"))),
        }
    }

    fn parse_identifier(&mut self) -> QasmResult<String> {
        match self.advance() {
            Some(Token::Identifier(s)) => Ok(s.clone()),
            Some(other) => Err(QasmError::parse(
                self.line,
                format!("expected identifier, found '{other}'"),
            )),
            None => Err(QasmError::parse(self.line, "expected identifier")),
        }
    }

    fn parse_identifier_list(&mut self) -> QasmResult<Vec<String>> {
        let mut ids = vec![self.parse_identifier()?];
        while self.consume(&Token::Comma) {
            ids.push(self.parse_identifier()?);
        }
        Ok(ids)
    }

    /// `name(args);` with nothing between the argument list and `;`.
    fn at_subroutine_call(&self) -> bool {
        let rest = self.remaining();
        if !matches!(rest.get(1).map(|t| &t.token), Some(Token::LParen)) {
            return false;
        }
        let mut depth = 0usize;
        for (i, spanned) in rest.iter().enumerate().skip(1) {
            match spanned.token {
                Token::LParen => depth += 1,
                Token::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        return matches!(rest.get(i + 1).map(|t| &t.token), Some(Token::Semicolon));
                    }
                }
                _ => {}
            }
        }
        false
    }

    fn parse_subroutine_call(&mut self) -> QasmResult<StatementKind> {
        let name = self.parse_identifier()?;
        self.expect(&Token::LParen)?;
        let mut args = Vec::new();
        if !self.consume(&Token::RParen) {
            loop {
                if self.at_register_argument() {
                    args.push(self.parse_operand()?);
                } else {
                    self.skip_argument();
                }
                if !self.consume(&Token::Comma) {
                    break;
                }
            }
            self.expect(&Token::RParen)?;
        }
        self.expect(&Token::Semicolon)?;
        Ok(StatementKind::SubroutineCall { name, args })
    }

    /// Next argument is `name` or `name[int]`, followed by `,` or `)`.
    fn at_register_argument(&self) -> bool {
        let ahead: Vec<&Token> = self.remaining().iter().take(5).map(|t| &t.token).collect();
        matches!(
            ahead.as_slice(),
            [Token::Identifier(_), Token::Comma | Token::RParen, ..]
                | [
                    Token::Identifier(_),
                    Token::LBracket,
                    Token::IntLiteral(_),
                    Token::RBracket,
                    Token::Comma | Token::RParen,
                    ..
                ]
        )
    }

    /// Move to the `,` or `)` ending the current argument.
    fn skip_argument(&mut self) {
        let mut depth = 0usize;
        while let Some(token) = self.peek() {
            match token {
                Token::LParen | Token::LBracket => depth += 1,
                Token::RParen | Token::RBracket if depth > 0 => depth -= 1,
                Token::Comma | Token::RParen if depth == 0 => return,
                _ => {}
            }
            self.pos += 1;
        }
    }

    /// Parse a register size or index literal.
    fn parse_index(&mut self) -> QasmResult<(u32, Range<usize>)> {
        match self.advance_spanned() {
            Some(SpannedToken {
                token: Token::IntLiteral(v),
                span,
            }) => {
                let value = u32::try_from(*v).map_err(|_| {
                    QasmError::parse(self.line, format!("index {v} exceeds u32::MAX"))
                })?;
                Ok((value, span.clone()))
            }
            Some(other) => Err(QasmError::parse(
                self.line,
                format!("expected integer, found '{}'", other.token),
            )),
            None => Err(QasmError::parse(self.line, "expected integer")),
        }
    }

    fn parse_size(&mut self) -> QasmResult<(u32, Range<usize>)> {
        let (size, span) = self.parse_index()?;
        if size == 0 {
            return Err(QasmError::parse(self.line, "register size must be at least 1"));
        }
        Ok((size, span))
    }

    /// Parse `name` or `name[index]`.
    fn parse_operand(&mut self) -> QasmResult<OperandReference> {
        let start = match self.tokens.get(self.pos) {
            Some(t) => t.span.start,
            None => return Err(QasmError::parse(self.line, "expected operand")),
        };
        let register = self.parse_identifier()?;

        if self.consume(&Token::LBracket) {
            let (index, index_span) = match self.peek() {
                Some(Token::IntLiteral(_)) => self.parse_index()?,
                _ => {
                    return Err(QasmError::unsupported(
                        self.line,
                        format!("non-literal index on register '{register}'"),
                    ));
                }
            };
            if self.check(&Token::Colon) || self.check(&Token::Comma) {
                return Err(QasmError::unsupported(
                    self.line,
                    format!("register slice '{register}[..]'"),
                ));
            }
            let end = self.tokens.get(self.pos).map_or(index_span.end, |t| t.span.end);
            self.expect(&Token::RBracket)?;
            Ok(OperandReference {
                register,
                index: Some(index),
                span: start..end,
                index_span: Some(index_span),
            })
        } else {
            let end = self.tokens[self.pos - 1].span.end;
            Ok(OperandReference {
                register,
                index: None,
                span: start..end,
                index_span: None,
            })
        }
    }

    fn parse_operands(&mut self) -> QasmResult<Vec<OperandReference>> {
        let mut refs = vec![self.parse_operand()?];
        while self.consume(&Token::Comma) {
            refs.push(self.parse_operand()?);
        }
        Ok(refs)
    }

    /// Parse `name(params) operands;` starting at the gate name.
    fn parse_gate_call(&mut self) -> QasmResult<GateApplication> {
        let name_span = match self.tokens.get(self.pos) {
            Some(t) => t.span.clone(),
            None => return Err(QasmError::parse(self.line, "expected gate name")),
        };
        let name = self.parse_identifier()?;
        let params = if self.check(&Token::LParen) {
            self.parse_param_spans()?
        } else {
            Vec::new()
        };
        let operands = self.parse_operands()?;
        self.expect(&Token::Semicolon)?;
        Ok(GateApplication {
            name,
            name_span,
            params,
            operands,
            modified: false,
        })
    }

    /// Parse `( expr, expr )` and return the span of each expression.
    fn parse_param_spans(&mut self) -> QasmResult<Vec<Range<usize>>> {
        self.expect(&Token::LParen)?;
        let mut params = Vec::new();
        let mut depth = 0usize;
        let mut current: Option<Range<usize>> = None;

        loop {
            let spanned = self
                .advance_spanned()
                .ok_or_else(|| QasmError::parse(self.line, "unclosed '(' in gate parameters"))?;
            match spanned.token {
                Token::RParen if depth == 0 => {
                    if let Some(span) = current.take() {
                        params.push(span);
                    } else if !params.is_empty() {
                        return Err(QasmError::parse(self.line, "empty gate parameter"));
                    }
                    return Ok(params);
                }
                Token::Comma if depth == 0 => {
                    let span = current
                        .take()
                        .ok_or_else(|| QasmError::parse(self.line, "empty gate parameter"))?;
                    params.push(span);
                }
                _ => {
                    match spanned.token {
                        Token::LParen => depth += 1,
                        Token::RParen => depth -= 1,
                        _ => {}
                    }
                    current = Some(match current {
                        Some(span) => span.start..spanned.span.end,
                        None => spanned.span.clone(),
                    });
                }
            }
        }
    }

    /// Skip `if ( condition )`.
    fn skip_condition(&mut self) -> QasmResult<()> {
        self.expect(&Token::If)?;
        self.expect(&Token::LParen)?;
        let mut depth = 0usize;
        loop {
            match self.advance() {
                Some(Token::LParen) => depth += 1,
                Some(Token::RParen) if depth == 0 => return Ok(()),
                Some(Token::RParen) => depth -= 1,
                Some(_) => {}
                None => return Err(QasmError::parse(self.line, "unclosed '(' in condition")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_qasm2_program() {
        let source = r#"
OPENQASM 2.0;
include "qelib1.inc";
qreg q[2];
creg c[2];
h q[0];
cx q[0], q[1];
measure q -> c;
"#;
        let program = QasmProgram::parse(source).unwrap();
        assert_eq!(program.dialect(), Some(Dialect::Qasm2));
        assert_eq!(program.statements().len(), 7);
        assert_eq!(program.statements()[0].line, 2);
        assert!(matches!(
            program.statements()[1].kind,
            StatementKind::Include(ref p) if p == "qelib1.inc"
        ));

        let decls: Vec<_> = program.declarations().map(|(_, d)| d.clone()).collect();
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].name, "q");
        assert_eq!(decls[0].kind, RegisterKind::Quantum);
        assert_eq!(decls[1].kind, RegisterKind::Classical);
    }

    #[test]
    fn test_qasm3_declarations() {
        let program = QasmProgram::parse("OPENQASM 3.0;\nqubit[3] q;\nqubit a;\nbit[2] c;").unwrap();
        let decls: Vec<_> = program.declarations().map(|(_, d)| d.clone()).collect();
        assert_eq!(decls[0].size, 3);
        assert_eq!(decls[0].syntax, Dialect::Qasm3);
        assert_eq!(decls[1].size, 1);
        assert!(decls[1].size_span.is_none());
        assert_eq!(decls[2].kind, RegisterKind::Classical);
    }

    #[test]
    fn test_gate_call_operands_and_params() {
        let source = "rz(pi / 2, 0.1) q[0], r;";
        let program = QasmProgram::parse(source).unwrap();
        let StatementKind::GateCall(call) = &program.statements()[0].kind else {
            panic!("expected gate call");
        };
        assert_eq!(call.name, "rz");
        assert_eq!(call.params.len(), 2);
        assert_eq!(program.text(&call.params[0]), "pi / 2");
        assert_eq!(program.text(&call.params[1]), "0.1");
        assert_eq!(call.operands[0].index, Some(0));
        assert_eq!(program.text(&call.operands[0].span), "q[0]");
        assert_eq!(call.operands[1].index, None);
    }

    #[test]
    fn test_measure_forms() {
        let program = QasmProgram::parse("measure q[0] -> c[1];\nc = measure q;").unwrap();
        let stmts = program.statements();
        assert!(matches!(
            &stmts[0].kind,
            StatementKind::Measure { arrow: true, bits, .. } if bits[0].index == Some(1)
        ));
        assert!(matches!(
            &stmts[1].kind,
            StatementKind::Measure { arrow: false, bits, qubits }
                if bits[0].register == "c" && qubits[0].index.is_none()
        ));
    }

    #[test]
    fn test_gate_definition_body_is_flagged() {
        let source = r"
            gate custom q1, q2 {
                x q1;
                y q2;
            }
            qubit[2] q;
            custom q[0], q[1];
        ";
        let program = QasmProgram::parse(source).unwrap();
        let defs = program.gate_definitions();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "custom");
        assert_eq!(defs[0].qubits, ["q1", "q2"]);
        assert_eq!(defs[0].body.len(), 2);
        assert!(defs[0].body.iter().all(|s| s.in_definition));

        let last = program.statements().last().unwrap();
        assert!(!last.in_definition);
        assert!(last.is_operation());
    }

    #[test]
    fn test_subroutine_body_is_flagged() {
        let source = "qubit[1] q;\ndef f(qubit a) {\n    h a;\n    for int i in [0:1] { x a; }\n}\nf(q[0]);\nh q[0];";
        let program = QasmProgram::parse(source).unwrap();
        let statements = program.statements();

        assert_eq!(statements[1].kind, StatementKind::BlockStart);
        assert!(!statements[1].in_definition);
        // h a; for {; x a; }; }
        assert!(statements[2..7].iter().all(|s| s.in_definition));
        assert!(statements[2..7].iter().all(|s| !s.is_operation()));
        assert!(statements[7..].iter().all(|s| !s.in_definition));
        assert!(statements.last().unwrap().is_operation());
    }

    #[test]
    fn test_control_flow_block_is_not_a_definition() {
        let program = QasmProgram::parse("qubit[1] q;\nfor int i in [0:1] { x q[0]; }").unwrap();
        assert!(program.statements().iter().all(|s| !s.in_definition));
    }

    #[test]
    fn test_modified_gate_call() {
        let program = QasmProgram::parse("ctrl @ x q[0], q[1];").unwrap();
        let StatementKind::GateCall(call) = &program.statements()[0].kind else {
            panic!("expected gate call");
        };
        assert!(call.modified);
        assert_eq!(call.name, "x");
        assert_eq!(call.operands.len(), 2);
    }

    #[test]
    fn test_conditional_statement() {
        let program = QasmProgram::parse("if (c == 1) x q[0];").unwrap();
        let stmt = &program.statements()[0];
        assert!(stmt.conditional);
        assert!(matches!(stmt.kind, StatementKind::GateCall(_)));
    }

    #[test]
    fn test_line_indent() {
        let source = "OPENQASM 3.0;\n    h q[0];";
        let program = QasmProgram::parse(source).unwrap();
        let stmt = &program.statements()[1];
        assert_eq!(stmt.line, 2);
        assert_eq!(program.line_indent(stmt.span.start), "    ");
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            QasmProgram::parse("h q[0]"),
            Err(QasmError::Parse { line: 1, .. })
        ));
        assert!(QasmProgram::parse("gate g a { x a;").is_err());
        assert!(QasmProgram::parse("}").is_err());
        assert!(QasmProgram::parse("qreg q[0];").is_err());
        assert!(matches!(
            QasmProgram::parse("x q[0:2];"),
            Err(QasmError::UnsupportedConstruct { .. })
        ));
    }
}
