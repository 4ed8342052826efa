//! Runtime value representation for traced execution.
//!
//! [`Value`] is the dynamic counterpart to the literal constants in
//! linelens-core. Every binding in a frame snapshot holds a `Value`, and
//! the change-attribution diff compares them with [`Value::try_eq`], which
//! keeps "cannot be compared" distinct from "not equal".

use std::fmt;

use linelens_core::Literal;
use serde::{Deserialize, Serialize};

/// A runtime value produced by evaluating lens-script expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    None,
}

/// Two values whose equality is not well-defined, because a `NaN` sits
/// somewhere inside at least one of them.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("cannot compare {left} and {right} for equality")]
pub struct Incomparable {
    pub left: &'static str,
    pub right: &'static str,
}

impl Value {
    /// Converts a source-level [`Literal`] to its runtime [`Value`].
    pub fn from_literal(lit: &Literal) -> Value {
        match lit {
            Literal::Int(v) => Value::Int(*v),
            Literal::Float(v) => Value::Float(*v),
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Str(s) => Value::Str(s.clone()),
            Literal::List(items) => Value::List(items.iter().map(Value::from_literal).collect()),
            Literal::Tuple(items) => Value::Tuple(items.iter().map(Value::from_literal).collect()),
            Literal::None => Value::None,
        }
    }

    /// Source-level name of the value's type, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::None => "None",
        }
    }

    /// Diff equality with an explicit failure channel.
    ///
    /// Strict about type: values of different types are unequal, and an
    /// `int` never equals a `float` here even when numerically identical,
    /// so a type change in a binding shows up as a change. `NaN` makes a
    /// comparison [`Incomparable`] rather than quietly unequal; for
    /// sequences, a definite element mismatch wins over an incomparable
    /// element pair.
    pub fn try_eq(&self, other: &Value) -> Result<bool, Incomparable> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Ok(a == b),
            (Value::Float(a), Value::Float(b)) => {
                if a.is_nan() || b.is_nan() {
                    Err(Incomparable {
                        left: self.type_name(),
                        right: other.type_name(),
                    })
                } else {
                    Ok(a == b)
                }
            }
            (Value::Bool(a), Value::Bool(b)) => Ok(a == b),
            (Value::Str(a), Value::Str(b)) => Ok(a == b),
            (Value::List(a), Value::List(b)) | (Value::Tuple(a), Value::Tuple(b)) => {
                if a.len() != b.len() {
                    return Ok(false);
                }
                let mut incomparable = None;
                for (x, y) in a.iter().zip(b) {
                    match x.try_eq(y) {
                        Ok(false) => return Ok(false),
                        Ok(true) => {}
                        Err(err) => incomparable = Some(err),
                    }
                }
                match incomparable {
                    Some(err) => Err(err),
                    None => Ok(true),
                }
            }
            (Value::None, Value::None) => Ok(true),
            _ => Ok(false),
        }
    }
}

impl fmt::Display for Value {
    /// Renders the value in source form: strings quoted and escaped,
    /// floats always with a fractional point or exponent.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v:?}"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Str(s) => write_quoted(f, s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            Value::None => write!(f, "None"),
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_literal_recurses() {
        let lit = Literal::List(vec![
            Literal::Int(1),
            Literal::Tuple(vec![Literal::Str("x".into()), Literal::None]),
        ]);
        assert_eq!(
            Value::from_literal(&lit),
            Value::List(vec![
                Value::Int(1),
                Value::Tuple(vec![Value::Str("x".into()), Value::None]),
            ])
        );
    }

    #[test]
    fn try_eq_same_type() {
        assert_eq!(Value::Int(3).try_eq(&Value::Int(3)), Ok(true));
        assert_eq!(Value::Int(3).try_eq(&Value::Int(4)), Ok(false));
        assert_eq!(
            Value::Str("a".into()).try_eq(&Value::Str("a".into())),
            Ok(true)
        );
    }

    #[test]
    fn try_eq_is_strict_about_type() {
        assert_eq!(Value::Int(1).try_eq(&Value::Float(1.0)), Ok(false));
        assert_eq!(Value::Bool(false).try_eq(&Value::None), Ok(false));
        assert_eq!(
            Value::List(vec![]).try_eq(&Value::Tuple(vec![])),
            Ok(false)
        );
    }

    #[test]
    fn nan_is_incomparable() {
        let nan = Value::Float(f64::NAN);
        assert!(nan.try_eq(&nan).is_err());
        assert!(nan.try_eq(&Value::Float(1.0)).is_err());
        // But a NaN against a different type is a definite mismatch.
        assert_eq!(nan.try_eq(&Value::Int(1)), Ok(false));
    }

    #[test]
    fn sequence_mismatch_beats_incomparable_element() {
        let a = Value::List(vec![Value::Float(f64::NAN), Value::Int(1)]);
        let b = Value::List(vec![Value::Float(f64::NAN), Value::Int(2)]);
        // Element 1 differs for sure, so the NaN pair does not matter.
        assert_eq!(a.try_eq(&b), Ok(false));

        let c = Value::List(vec![Value::Float(f64::NAN), Value::Int(1)]);
        assert!(a.try_eq(&c).is_err());
    }

    #[test]
    fn length_mismatch_is_definite() {
        let a = Value::List(vec![Value::Float(f64::NAN)]);
        let b = Value::List(vec![]);
        assert_eq!(a.try_eq(&b), Ok(false));
    }

    #[test]
    fn display_matches_source_form() {
        assert_eq!(Value::Float(2.0).to_string(), "2.0");
        assert_eq!(Value::Str("a\"b".into()).to_string(), r#""a\"b""#);
        assert_eq!(
            Value::Tuple(vec![Value::Int(1)]).to_string(),
            "(1,)"
        );
        assert_eq!(
            Value::List(vec![Value::Bool(true), Value::None]).to_string(),
            "[True, None]"
        );
    }
}
