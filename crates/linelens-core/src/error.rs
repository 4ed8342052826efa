//! Load-time error types for linelens-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering every
//! way a script or call expression can fail to lex or parse. All variants
//! carry the 1-based source line, and lexer-level variants carry the column,
//! so callers can point at the offending spot.

use thiserror::Error;

/// Errors produced while lexing or parsing a lens script.
///
/// Any of these means the script could not be loaded; no function in it is
/// usable until the source is fixed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// A character the lexer has no rule for.
    #[error("line {line}:{column}: unexpected character '{found}'")]
    UnexpectedCharacter { line: u32, column: u32, found: char },

    /// A string literal that never closes before the end of its line.
    #[error("line {line}:{column}: unterminated string literal")]
    UnterminatedString { line: u32, column: u32 },

    /// A numeric literal that cannot be represented (bad digits, exponent
    /// with no digits, integer out of the 64-bit range).
    #[error("line {line}:{column}: invalid number '{text}'")]
    InvalidNumber {
        line: u32,
        column: u32,
        text: String,
    },

    /// A tab character in leading indentation. Blocks are measured in
    /// spaces only.
    #[error("line {line}: tab in indentation (use spaces)")]
    TabIndent { line: u32 },

    /// A line dedents to a depth that was never on the indentation stack.
    #[error("line {line}: unindent does not match any outer block")]
    InconsistentDedent { line: u32 },

    /// A line is indented where no block was opened.
    #[error("line {line}: unexpected indent")]
    UnexpectedIndent { line: u32 },

    /// The parser met a token that does not fit the grammar.
    #[error("line {line}: expected {expected}, found {found}")]
    UnexpectedToken {
        line: u32,
        expected: String,
        found: String,
    },

    /// Something other than a function definition at the top level of a
    /// script. Only `def` blocks can appear there.
    #[error("line {line}: only function definitions are allowed at the top level")]
    TopLevelStatement { line: u32 },

    /// A required parameter declared after a defaulted one.
    #[error("line {line}: parameter '{name}' without a default follows a defaulted parameter")]
    RequiredAfterDefault { line: u32, name: String },

    /// The same parameter name twice in one definition.
    #[error("line {line}: duplicate parameter '{name}'")]
    DuplicateParameter { line: u32, name: String },

    /// Two `def`s with the same name in one script.
    #[error("line {line}: function '{name}' is already defined")]
    DuplicateFunction { line: u32, name: String },

    /// The same keyword argument twice in one call expression.
    #[error("line {line}: duplicate keyword argument '{name}'")]
    DuplicateKeyword { line: u32, name: String },

    /// A positional argument written after a keyword argument.
    #[error("line {line}: positional argument follows keyword argument")]
    PositionalAfterKeyword { line: u32 },

    /// An assignment whose target is not a plain name.
    #[error("line {line}: only simple names can be assigned to")]
    InvalidAssignTarget { line: u32 },

    /// `break` or `continue` outside any enclosing `while`.
    #[error("line {line}: '{keyword}' outside loop")]
    OutsideLoop { line: u32, keyword: &'static str },
}

impl ParseError {
    /// The source line the error points at.
    pub fn line(&self) -> u32 {
        match self {
            ParseError::UnexpectedCharacter { line, .. }
            | ParseError::UnterminatedString { line, .. }
            | ParseError::InvalidNumber { line, .. }
            | ParseError::TabIndent { line }
            | ParseError::InconsistentDedent { line }
            | ParseError::UnexpectedIndent { line }
            | ParseError::UnexpectedToken { line, .. }
            | ParseError::TopLevelStatement { line }
            | ParseError::RequiredAfterDefault { line, .. }
            | ParseError::DuplicateParameter { line, .. }
            | ParseError::DuplicateFunction { line, .. }
            | ParseError::DuplicateKeyword { line, .. }
            | ParseError::PositionalAfterKeyword { line }
            | ParseError::InvalidAssignTarget { line }
            | ParseError::OutsideLoop { line, .. } => *line,
        }
    }
}
