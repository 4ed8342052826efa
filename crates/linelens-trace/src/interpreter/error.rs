//! Runtime error types with trap semantics for the script interpreter.
//!
//! All runtime errors include the 1-based source line of the statement
//! that was executing when the trap fired, so a partial trace and its
//! error point into the same line numbering.

use serde::{Deserialize, Serialize};

/// Runtime errors produced while executing a script function.
///
/// Each variant represents a trap condition that halts execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum RuntimeError {
    #[error("integer overflow at line {line}")]
    IntegerOverflow { line: u32 },

    #[error("divide by zero at line {line}")]
    DivideByZero { line: u32 },

    #[error("type mismatch at line {line}: expected {expected}, got {got}")]
    TypeMismatch {
        line: u32,
        expected: String,
        got: String,
    },

    #[error("index out of bounds at line {line}: index {index}, length {len}")]
    OutOfBounds { line: u32, index: i64, len: usize },

    #[error("unknown name '{name}' at line {line}")]
    UnknownName { line: u32, name: String },

    #[error("unknown function '{name}' at line {line}")]
    UnknownFunction { line: u32, name: String },

    #[error("{function}() takes at most {expected} arguments, got {got} (line {line})")]
    TooManyArguments {
        line: u32,
        function: String,
        expected: usize,
        got: usize,
    },

    #[error("{function}() missing required argument '{name}' (line {line})")]
    MissingArgument {
        line: u32,
        function: String,
        name: String,
    },

    #[error("{function}() got an unexpected keyword argument '{name}' (line {line})")]
    UnknownKeyword {
        line: u32,
        function: String,
        name: String,
    },

    #[error("{function}() got multiple values for argument '{name}' (line {line})")]
    DuplicateArgument {
        line: u32,
        function: String,
        name: String,
    },

    #[error("recursion depth limit ({limit}) exceeded at line {line}")]
    RecursionLimitExceeded { line: u32, limit: usize },
}

impl RuntimeError {
    /// The source line the trap fired on.
    pub fn line(&self) -> u32 {
        match self {
            RuntimeError::IntegerOverflow { line }
            | RuntimeError::DivideByZero { line }
            | RuntimeError::TypeMismatch { line, .. }
            | RuntimeError::OutOfBounds { line, .. }
            | RuntimeError::UnknownName { line, .. }
            | RuntimeError::UnknownFunction { line, .. }
            | RuntimeError::TooManyArguments { line, .. }
            | RuntimeError::MissingArgument { line, .. }
            | RuntimeError::UnknownKeyword { line, .. }
            | RuntimeError::DuplicateArgument { line, .. }
            | RuntimeError::RecursionLimitExceeded { line, .. } => *line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_line() {
        let err = RuntimeError::DivideByZero { line: 7 };
        assert_eq!(format!("{}", err), "divide by zero at line 7");
        assert_eq!(err.line(), 7);
    }

    #[test]
    fn serde_roundtrip() {
        let err = RuntimeError::TooManyArguments {
            line: 3,
            function: "f".into(),
            expected: 2,
            got: 4,
        };
        let json = serde_json::to_string(&err).unwrap();
        let back: RuntimeError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, back);
    }
}
