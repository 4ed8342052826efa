//! Literal constants as they appear in lens-script source.
//!
//! Literals show up in three places: inside expressions, as parameter
//! defaults, and as the arguments of a call specification. The [`Display`]
//! impl renders a literal back to source form, and the renderer guarantees
//! that re-lexing the output yields the same literal (strings are quoted
//! and escaped, floats always keep a fractional point or exponent).
//!
//! [`Display`]: std::fmt::Display

use std::fmt;

use serde::{Deserialize, Serialize};

/// A constant value written directly in source.
///
/// Note: `Float` holds an `f64` and therefore the enum derives only
/// `PartialEq`, not `Eq`. Two literals lexed from the same text always
/// compare equal; `NaN` cannot be written as a literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    List(Vec<Literal>),
    Tuple(Vec<Literal>),
    None,
}

impl Literal {
    /// Source-level name of the literal's type, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::Int(_) => "int",
            Literal::Float(_) => "float",
            Literal::Bool(_) => "bool",
            Literal::Str(_) => "str",
            Literal::List(_) => "list",
            Literal::Tuple(_) => "tuple",
            Literal::None => "None",
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(v) => write!(f, "{v}"),
            // `{:?}` keeps the fractional point: 1.0 renders as "1.0",
            // not "1", so the text re-lexes as a float.
            Literal::Float(v) => write!(f, "{v:?}"),
            Literal::Bool(true) => write!(f, "True"),
            Literal::Bool(false) => write!(f, "False"),
            Literal::Str(s) => write_quoted(f, s),
            Literal::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Literal::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                // A one-element tuple needs its trailing comma to re-parse
                // as a tuple rather than a parenthesized expression.
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            Literal::None => write!(f, "None"),
        }
    }
}

/// Writes `s` as a double-quoted source string, escaping characters that
/// would break re-lexing.
pub(crate) fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    write!(f, "\"")?;
    for c in s.chars() {
        match c {
            '\\' => write!(f, "\\\\")?,
            '"' => write!(f, "\\\"")?,
            '\n' => write!(f, "\\n")?,
            '\t' => write!(f, "\\t")?,
            '\r' => write!(f, "\\r")?,
            _ => write!(f, "{c}")?,
        }
    }
    write!(f, "\"")
}
