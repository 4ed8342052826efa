//! The lens-script AST.
//!
//! Every statement records the 1-based source line of its header token.
//! The tracer keys snapshots on those lines, so the invariant here is that
//! one line holds at most one statement header (the parser enforces this:
//! there are no statement separators and no line continuations).

use serde::{Deserialize, Serialize};

use crate::literal::Literal;

/// A block is the ordered body of a `def`, `if`/`elif`/`else` arm, or
/// `while` loop.
pub type Block = Vec<Stmt>;

/// One statement, tagged with the line its header starts on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    /// `name = expr`. Targets are plain names only.
    Assign {
        target: String,
        value: Expr,
        line: u32,
    },

    /// A bare expression evaluated for effect, e.g. a call.
    Expr { expr: Expr, line: u32 },

    /// `if`/`elif` chain with an optional trailing `else` body.
    If {
        branches: Vec<IfBranch>,
        else_body: Option<Block>,
    },

    /// `while cond:` loop.
    While {
        condition: Expr,
        body: Block,
        line: u32,
    },

    /// `return` with an optional value (`None` when the value is omitted).
    Return { value: Option<Expr>, line: u32 },

    Pass { line: u32 },
    Break { line: u32 },
    Continue { line: u32 },
}

/// One tested arm of an `if`/`elif` chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfBranch {
    pub condition: Expr,
    pub body: Block,
    /// Line of the `if` or `elif` header.
    pub line: u32,
}

impl Stmt {
    /// Line of the statement's header. For an `if` chain this is the line
    /// of the initial `if`.
    pub fn line(&self) -> u32 {
        match self {
            Stmt::Assign { line, .. }
            | Stmt::Expr { line, .. }
            | Stmt::While { line, .. }
            | Stmt::Return { line, .. }
            | Stmt::Pass { line }
            | Stmt::Break { line }
            | Stmt::Continue { line } => *line,
            Stmt::If { branches, .. } => branches[0].line,
        }
    }
}

/// An expression. Expressions never span lines, so they carry no position
/// of their own; runtime errors inside one are reported at the line of the
/// enclosing statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Literal(Literal),
    Name(String),

    /// `[a, b, c]` with arbitrary element expressions.
    List(Vec<Expr>),

    /// `(a, b)`; `(x,)` is a one-element tuple, `(x)` is just `x`.
    Tuple(Vec<Expr>),

    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },

    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// `seq[index]` on lists, tuples, and strings.
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
    },

    /// `name(args...)`. Functions are not first-class, so the callee is
    /// always a bare name.
    Call {
        function: String,
        args: Vec<Expr>,
        keywords: Vec<(String, Expr)>,
    },
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Arithmetic negation.
    Neg,
    /// Boolean `not`.
    Not,
}

/// Binary operators. `And`/`Or` short-circuit during evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
}
