//! Function definitions and their printable signatures.

use serde::{Deserialize, Serialize};

use crate::ast::Block;
use crate::literal::Literal;

/// One formal parameter. A `default` makes the parameter optional at call
/// time; the parser guarantees defaulted parameters come after required
/// ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub default: Option<Literal>,
}

/// A top-level `def` with its body and source position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<Parameter>,
    pub body: Block,
    /// Line of the `def` header.
    pub def_line: u32,
}

impl FunctionDef {
    /// Renders the callable surface of this function as a call template,
    /// e.g. `foo(a, b, c = None, d = 5)`.
    ///
    /// Defaults are rendered through [`Literal`]'s source form, so the
    /// output feeds straight back into the call parser.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.name);
        out.push('(');
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&param.name);
            if let Some(default) = &param.default {
                out.push_str(" = ");
                out.push_str(&default.to_string());
            }
        }
        out.push(')');
        out
    }
}
