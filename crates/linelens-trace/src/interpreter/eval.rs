//! Expression evaluation for the lens interpreter.
//!
//! Contains the value-producing half of the interpreter: literals, name
//! lookup, operators with checked integer arithmetic and trap semantics,
//! indexing, and calls. Calls re-enter [`Interpreter::run`] so nested
//! frames report to the same recorder at their own depth.
//!
//! Statement execution and control flow live in `state.rs`.

use std::cmp::Ordering;

use linelens_core::{BinOp, Expr, UnaryOp};

use super::error::RuntimeError;
use super::hook::LineRecorder;
use super::state::{bind_arguments, Arguments, Interpreter, Scope};
use super::value::Value;

impl<'a> Interpreter<'a> {
    /// Evaluates `expr` against the frame's locals. `line` is the line of
    /// the enclosing statement; every trap an expression raises carries it.
    pub(crate) fn eval(
        &self,
        expr: &Expr,
        line: u32,
        scope: &Scope<'_>,
        recorder: &mut dyn LineRecorder,
    ) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Literal(lit) => Ok(Value::from_literal(lit)),
            Expr::Name(name) => {
                scope
                    .locals
                    .get(name)
                    .cloned()
                    .ok_or_else(|| RuntimeError::UnknownName {
                        line,
                        name: name.clone(),
                    })
            }
            Expr::List(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.eval(item, line, scope, recorder)?);
                }
                Ok(Value::List(values))
            }
            Expr::Tuple(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.eval(item, line, scope, recorder)?);
                }
                Ok(Value::Tuple(values))
            }
            Expr::Unary { op, operand } => {
                let value = self.eval(operand, line, scope, recorder)?;
                match op {
                    UnaryOp::Neg => eval_neg(value, line),
                    UnaryOp::Not => match value {
                        Value::Bool(b) => Ok(Value::Bool(!b)),
                        other => Err(RuntimeError::TypeMismatch {
                            line,
                            expected: "bool".into(),
                            got: other.type_name().into(),
                        }),
                    },
                }
            }
            Expr::Binary { op, left, right } => {
                self.eval_binary(op, left, right, line, scope, recorder)
            }
            Expr::Index { object, index } => {
                let object = self.eval(object, line, scope, recorder)?;
                let index = self.eval(index, line, scope, recorder)?;
                eval_index(object, index, line)
            }
            Expr::Call {
                function,
                args,
                keywords,
            } => self.eval_call(function, args, keywords, line, scope, recorder),
        }
    }

    /// Evaluates a condition and requires it to be `Bool`. There is no
    /// implicit truthiness.
    pub(crate) fn eval_condition(
        &self,
        expr: &Expr,
        line: u32,
        scope: &Scope<'_>,
        recorder: &mut dyn LineRecorder,
    ) -> Result<bool, RuntimeError> {
        match self.eval(expr, line, scope, recorder)? {
            Value::Bool(b) => Ok(b),
            other => Err(RuntimeError::TypeMismatch {
                line,
                expected: "bool".into(),
                got: other.type_name().into(),
            }),
        }
    }

    fn eval_binary(
        &self,
        op: &BinOp,
        left: &Expr,
        right: &Expr,
        line: u32,
        scope: &Scope<'_>,
        recorder: &mut dyn LineRecorder,
    ) -> Result<Value, RuntimeError> {
        match op {
            // `and`/`or` evaluate the right side only when the left side
            // has not already decided the result.
            BinOp::And => {
                if !self.eval_condition(left, line, scope, recorder)? {
                    return Ok(Value::Bool(false));
                }
                Ok(Value::Bool(
                    self.eval_condition(right, line, scope, recorder)?,
                ))
            }
            BinOp::Or => {
                if self.eval_condition(left, line, scope, recorder)? {
                    return Ok(Value::Bool(true));
                }
                Ok(Value::Bool(
                    self.eval_condition(right, line, scope, recorder)?,
                ))
            }
            BinOp::Eq | BinOp::NotEq => {
                let lhs = self.eval(left, line, scope, recorder)?;
                let rhs = self.eval(right, line, scope, recorder)?;
                let eq = values_equal(&lhs, &rhs);
                Ok(Value::Bool(if matches!(op, BinOp::Eq) { eq } else { !eq }))
            }
            BinOp::Lt => self.eval_ordering(left, right, line, scope, recorder, Ordering::is_lt),
            BinOp::LtEq => self.eval_ordering(left, right, line, scope, recorder, Ordering::is_le),
            BinOp::Gt => self.eval_ordering(left, right, line, scope, recorder, Ordering::is_gt),
            BinOp::GtEq => self.eval_ordering(left, right, line, scope, recorder, Ordering::is_ge),
            BinOp::Add => {
                let lhs = self.eval(left, line, scope, recorder)?;
                let rhs = self.eval(right, line, scope, recorder)?;
                eval_add(lhs, rhs, line)
            }
            BinOp::Sub => {
                let lhs = self.eval(left, line, scope, recorder)?;
                let rhs = self.eval(right, line, scope, recorder)?;
                eval_numeric(lhs, rhs, line, i64::checked_sub, |a, b| a - b)
            }
            BinOp::Mul => {
                let lhs = self.eval(left, line, scope, recorder)?;
                let rhs = self.eval(right, line, scope, recorder)?;
                eval_numeric(lhs, rhs, line, i64::checked_mul, |a, b| a * b)
            }
            BinOp::Div => {
                let lhs = self.eval(left, line, scope, recorder)?;
                let rhs = self.eval(right, line, scope, recorder)?;
                if let (Value::Int(_), Value::Int(0)) = (&lhs, &rhs) {
                    return Err(RuntimeError::DivideByZero { line });
                }
                eval_numeric(lhs, rhs, line, i64::checked_div, |a, b| a / b)
            }
            BinOp::Mod => {
                let lhs = self.eval(left, line, scope, recorder)?;
                let rhs = self.eval(right, line, scope, recorder)?;
                if let (Value::Int(_), Value::Int(0)) = (&lhs, &rhs) {
                    return Err(RuntimeError::DivideByZero { line });
                }
                eval_numeric(lhs, rhs, line, i64::checked_rem, |a, b| a % b)
            }
        }
    }

    fn eval_ordering(
        &self,
        left: &Expr,
        right: &Expr,
        line: u32,
        scope: &Scope<'_>,
        recorder: &mut dyn LineRecorder,
        holds: fn(Ordering) -> bool,
    ) -> Result<Value, RuntimeError> {
        let lhs = self.eval(left, line, scope, recorder)?;
        let rhs = self.eval(right, line, scope, recorder)?;
        let ordering = match (&lhs, &rhs) {
            (Value::Int(a), Value::Int(b)) => a.partial_cmp(b),
            (Value::Str(a), Value::Str(b)) => a.partial_cmp(b),
            _ => match as_float_pair(&lhs, &rhs) {
                Some((a, b)) => a.partial_cmp(&b),
                None => {
                    return Err(RuntimeError::TypeMismatch {
                        line,
                        expected: "two numbers or two strings".into(),
                        got: format!("{} and {}", lhs.type_name(), rhs.type_name()),
                    })
                }
            },
        };
        // A NaN operand orders as none of less, equal, or greater.
        Ok(Value::Bool(ordering.is_some_and(holds)))
    }

    fn eval_call(
        &self,
        function: &str,
        args: &[Expr],
        keywords: &[(String, Expr)],
        line: u32,
        scope: &Scope<'_>,
        recorder: &mut dyn LineRecorder,
    ) -> Result<Value, RuntimeError> {
        // A script function named `len` shadows the builtin.
        if function == "len" && self.script().get("len").is_none() {
            return self.eval_len(args, keywords, line, scope, recorder);
        }
        let def = self
            .script()
            .get(function)
            .ok_or_else(|| RuntimeError::UnknownFunction {
                line,
                name: function.to_string(),
            })?;
        let mut arguments = Arguments::default();
        for arg in args {
            arguments
                .positional
                .push(self.eval(arg, line, scope, recorder)?);
        }
        for (name, expr) in keywords {
            let value = self.eval(expr, line, scope, recorder)?;
            arguments.keyword.insert(name.clone(), value);
        }
        let locals = bind_arguments(def, &arguments, line)?;
        self.run(def, locals, scope.depth + 1, recorder)
    }

    /// The one builtin. Behaves as `def len(item)` would for binding
    /// diagnostics.
    fn eval_len(
        &self,
        args: &[Expr],
        keywords: &[(String, Expr)],
        line: u32,
        scope: &Scope<'_>,
        recorder: &mut dyn LineRecorder,
    ) -> Result<Value, RuntimeError> {
        if let Some((name, _)) = keywords.first() {
            return Err(RuntimeError::UnknownKeyword {
                line,
                function: "len".into(),
                name: name.clone(),
            });
        }
        if args.len() > 1 {
            return Err(RuntimeError::TooManyArguments {
                line,
                function: "len".into(),
                expected: 1,
                got: args.len(),
            });
        }
        let Some(arg) = args.first() else {
            return Err(RuntimeError::MissingArgument {
                line,
                function: "len".into(),
                name: "item".into(),
            });
        };
        let value = self.eval(arg, line, scope, recorder)?;
        let len = match &value {
            Value::Str(s) => s.chars().count(),
            Value::List(items) | Value::Tuple(items) => items.len(),
            other => {
                return Err(RuntimeError::TypeMismatch {
                    line,
                    expected: "str, list, or tuple".into(),
                    got: other.type_name().into(),
                })
            }
        };
        Ok(Value::Int(len as i64))
    }
}

/// Numeric pair with `Float` promotion. `None` when either side is not a
/// number or both are `Int` (the caller's checked path handles that).
fn as_float_pair(lhs: &Value, rhs: &Value) -> Option<(f64, f64)> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Float(b)) => Some((*a as f64, *b)),
        (Value::Float(a), Value::Int(b)) => Some((*a, *b as f64)),
        (Value::Float(a), Value::Float(b)) => Some((*a, *b)),
        _ => None,
    }
}

/// Operator equality. Numbers compare across `Int`/`Float` by promotion,
/// recursively inside sequences; everything else is strict structural
/// equality, and mismatched types are simply unequal.
fn values_equal(lhs: &Value, rhs: &Value) -> bool {
    if let Some((a, b)) = as_float_pair(lhs, rhs) {
        return a == b;
    }
    match (lhs, rhs) {
        (Value::List(a), Value::List(b)) | (Value::Tuple(a), Value::Tuple(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
        }
        _ => lhs == rhs,
    }
}

fn eval_neg(value: Value, line: u32) -> Result<Value, RuntimeError> {
    match value {
        Value::Int(v) => v
            .checked_neg()
            .map(Value::Int)
            .ok_or(RuntimeError::IntegerOverflow { line }),
        Value::Float(v) => Ok(Value::Float(-v)),
        other => Err(RuntimeError::TypeMismatch {
            line,
            expected: "a number".into(),
            got: other.type_name().into(),
        }),
    }
}

/// `+` also concatenates strings, lists, and tuples.
fn eval_add(lhs: Value, rhs: Value, line: u32) -> Result<Value, RuntimeError> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => a
            .checked_add(b)
            .map(Value::Int)
            .ok_or(RuntimeError::IntegerOverflow { line }),
        (Value::Str(a), Value::Str(b)) => Ok(Value::Str(a + &b)),
        (Value::List(mut a), Value::List(b)) => {
            a.extend(b);
            Ok(Value::List(a))
        }
        (Value::Tuple(mut a), Value::Tuple(b)) => {
            a.extend(b);
            Ok(Value::Tuple(a))
        }
        (lhs, rhs) => match as_float_pair(&lhs, &rhs) {
            Some((a, b)) => Ok(Value::Float(a + b)),
            None => Err(RuntimeError::TypeMismatch {
                line,
                expected: "two numbers or matching sequences".into(),
                got: format!("{} and {}", lhs.type_name(), rhs.type_name()),
            }),
        },
    }
}

/// Shared `-`, `*`, `/`, `%` evaluation. Two `Int`s stay in `Int` through
/// the checked operation; any `Float` operand promotes both sides, and
/// float arithmetic follows IEEE semantics without trapping. Callers check
/// integer division by zero before the checked op so `checked_div`'s
/// `None` always means overflow here.
fn eval_numeric(
    lhs: Value,
    rhs: Value,
    line: u32,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value, RuntimeError> {
    match (&lhs, &rhs) {
        (Value::Int(a), Value::Int(b)) => int_op(*a, *b)
            .map(Value::Int)
            .ok_or(RuntimeError::IntegerOverflow { line }),
        _ => match as_float_pair(&lhs, &rhs) {
            Some((a, b)) => Ok(Value::Float(float_op(a, b))),
            None => Err(RuntimeError::TypeMismatch {
                line,
                expected: "two numbers".into(),
                got: format!("{} and {}", lhs.type_name(), rhs.type_name()),
            }),
        },
    }
}

fn eval_index(object: Value, index: Value, line: u32) -> Result<Value, RuntimeError> {
    let Value::Int(raw) = index else {
        return Err(RuntimeError::TypeMismatch {
            line,
            expected: "int".into(),
            got: index.type_name().into(),
        });
    };
    match object {
        Value::List(items) | Value::Tuple(items) => {
            let idx = resolve_index(raw, items.len()).ok_or(RuntimeError::OutOfBounds {
                line,
                index: raw,
                len: items.len(),
            })?;
            Ok(items[idx].clone())
        }
        Value::Str(s) => {
            let chars: Vec<char> = s.chars().collect();
            let idx = resolve_index(raw, chars.len()).ok_or(RuntimeError::OutOfBounds {
                line,
                index: raw,
                len: chars.len(),
            })?;
            Ok(Value::Str(chars[idx].to_string()))
        }
        other => Err(RuntimeError::TypeMismatch {
            line,
            expected: "list, tuple, or str".into(),
            got: other.type_name().into(),
        }),
    }
}

/// Maps a possibly negative index onto `0..len`. Negative indices count
/// from the end, one wrap only.
fn resolve_index(index: i64, len: usize) -> Option<usize> {
    let len = len as i64;
    let adjusted = if index < 0 { index + len } else { index };
    if (0..len).contains(&adjusted) {
        Some(adjusted as usize)
    } else {
        None
    }
}
