//! Interpreter state: configuration, call scopes, argument binding, and
//! the statement execution loop.

use indexmap::IndexMap;
use linelens_core::{Block, CallSpec, FunctionDef, Script, Stmt};

use super::error::RuntimeError;
use super::hook::{LineEvent, LineRecorder};
use super::value::Value;

/// Interpreter limits.
#[derive(Debug, Clone)]
pub struct InterpreterConfig {
    /// Maximum call depth. Default: 256.
    pub max_recursion_depth: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            max_recursion_depth: 256,
        }
    }
}

/// Concrete argument values for one call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Arguments {
    pub positional: Vec<Value>,
    pub keyword: IndexMap<String, Value>,
}

impl Arguments {
    /// Converts a parsed call specification's literal arguments to runtime
    /// values.
    pub fn from_spec(spec: &CallSpec) -> Arguments {
        Arguments {
            positional: spec.positional.iter().map(Value::from_literal).collect(),
            keyword: spec
                .keyword
                .iter()
                .map(|(name, lit)| (name.clone(), Value::from_literal(lit)))
                .collect(),
        }
    }
}

/// One executing call frame.
pub(crate) struct Scope<'a> {
    /// Name of the function this frame runs.
    pub(crate) function: &'a str,
    /// Local bindings: parameters first in declaration order, then other
    /// names in first-assignment order.
    pub(crate) locals: IndexMap<String, Value>,
    /// 1-based call depth.
    pub(crate) depth: usize,
}

/// How a statement finished.
pub(crate) enum Flow {
    Normal,
    Break,
    Continue,
    Return(Value),
}

/// Tree-walking interpreter over a parsed [`Script`].
///
/// Holds no mutable state of its own. Each call gets a fresh scope, and
/// every line event goes to the recorder the caller passes in, so two
/// interpreters (or two calls through one) can never interfere.
pub struct Interpreter<'a> {
    script: &'a Script,
    config: InterpreterConfig,
}

impl<'a> Interpreter<'a> {
    pub fn new(script: &'a Script, config: InterpreterConfig) -> Self {
        Interpreter { script, config }
    }

    pub(crate) fn script(&self) -> &'a Script {
        self.script
    }

    /// Runs `def` with `arguments`, reporting every line event to
    /// `recorder` before the corresponding statement executes.
    pub fn call(
        &self,
        def: &FunctionDef,
        arguments: Arguments,
        recorder: &mut dyn LineRecorder,
    ) -> Result<Value, RuntimeError> {
        let locals = bind_arguments(def, &arguments, def.def_line)?;
        self.run(def, locals, 1, recorder)
    }

    /// Executes a bound frame at the given call depth.
    pub(crate) fn run(
        &self,
        def: &FunctionDef,
        locals: IndexMap<String, Value>,
        depth: usize,
        recorder: &mut dyn LineRecorder,
    ) -> Result<Value, RuntimeError> {
        if depth > self.config.max_recursion_depth {
            return Err(RuntimeError::RecursionLimitExceeded {
                line: def.def_line,
                limit: self.config.max_recursion_depth,
            });
        }
        let mut scope = Scope {
            function: &def.name,
            locals,
            depth,
        };
        match self.exec_block(&def.body, &mut scope, recorder)? {
            Flow::Return(value) => Ok(value),
            // Falling off the end returns None. Break/continue cannot
            // escape a function body; the parser rejects them outside a
            // loop.
            _ => Ok(Value::None),
        }
    }

    fn exec_block(
        &self,
        block: &Block,
        scope: &mut Scope<'_>,
        recorder: &mut dyn LineRecorder,
    ) -> Result<Flow, RuntimeError> {
        for stmt in block {
            match self.exec_stmt(stmt, scope, recorder)? {
                Flow::Normal => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_stmt(
        &self,
        stmt: &Stmt,
        scope: &mut Scope<'_>,
        recorder: &mut dyn LineRecorder,
    ) -> Result<Flow, RuntimeError> {
        match stmt {
            Stmt::Assign {
                target,
                value,
                line,
            } => {
                self.event(*line, scope, recorder);
                let value = self.eval(value, *line, scope, recorder)?;
                scope.locals.insert(target.clone(), value);
                Ok(Flow::Normal)
            }
            Stmt::Expr { expr, line } => {
                self.event(*line, scope, recorder);
                self.eval(expr, *line, scope, recorder)?;
                Ok(Flow::Normal)
            }
            Stmt::If {
                branches,
                else_body,
            } => {
                // Each tested header is its own line event; a bare `else`
                // has no condition and no event.
                for branch in branches {
                    self.event(branch.line, scope, recorder);
                    if self.eval_condition(&branch.condition, branch.line, scope, recorder)? {
                        return self.exec_block(&branch.body, scope, recorder);
                    }
                }
                match else_body {
                    Some(body) => self.exec_block(body, scope, recorder),
                    None => Ok(Flow::Normal),
                }
            }
            Stmt::While {
                condition,
                body,
                line,
            } => {
                loop {
                    // Every condition check is a visit to the `while`
                    // line, including the final failing one.
                    self.event(*line, scope, recorder);
                    if !self.eval_condition(condition, *line, scope, recorder)? {
                        break;
                    }
                    match self.exec_block(body, scope, recorder)? {
                        Flow::Break => break,
                        Flow::Return(value) => return Ok(Flow::Return(value)),
                        Flow::Normal | Flow::Continue => {}
                    }
                }
                Ok(Flow::Normal)
            }
            Stmt::Return { value, line } => {
                self.event(*line, scope, recorder);
                let value = match value {
                    Some(expr) => self.eval(expr, *line, scope, recorder)?,
                    None => Value::None,
                };
                Ok(Flow::Return(value))
            }
            Stmt::Pass { line } => {
                self.event(*line, scope, recorder);
                Ok(Flow::Normal)
            }
            Stmt::Break { line } => {
                self.event(*line, scope, recorder);
                Ok(Flow::Break)
            }
            Stmt::Continue { line } => {
                self.event(*line, scope, recorder);
                Ok(Flow::Continue)
            }
        }
    }

    fn event(&self, line: u32, scope: &Scope<'_>, recorder: &mut dyn LineRecorder) {
        recorder.record_line(LineEvent {
            line,
            depth: scope.depth,
            function: scope.function,
            bindings: &scope.locals,
        });
    }
}

/// Binds call arguments to a function's parameters, producing the initial
/// locals for a frame in parameter declaration order.
///
/// `line` is the call site (the callee's `def` line for an entry call),
/// used for error reporting.
pub(crate) fn bind_arguments(
    def: &FunctionDef,
    arguments: &Arguments,
    line: u32,
) -> Result<IndexMap<String, Value>, RuntimeError> {
    if arguments.positional.len() > def.params.len() {
        return Err(RuntimeError::TooManyArguments {
            line,
            function: def.name.clone(),
            expected: def.params.len(),
            got: arguments.positional.len(),
        });
    }
    for name in arguments.keyword.keys() {
        if !def.params.iter().any(|p| p.name == *name) {
            return Err(RuntimeError::UnknownKeyword {
                line,
                function: def.name.clone(),
                name: name.clone(),
            });
        }
    }

    let mut locals = IndexMap::new();
    for (i, param) in def.params.iter().enumerate() {
        let value = if i < arguments.positional.len() {
            if arguments.keyword.contains_key(&param.name) {
                return Err(RuntimeError::DuplicateArgument {
                    line,
                    function: def.name.clone(),
                    name: param.name.clone(),
                });
            }
            arguments.positional[i].clone()
        } else if let Some(value) = arguments.keyword.get(&param.name) {
            value.clone()
        } else if let Some(default) = &param.default {
            Value::from_literal(default)
        } else {
            return Err(RuntimeError::MissingArgument {
                line,
                function: def.name.clone(),
                name: param.name.clone(),
            });
        };
        locals.insert(param.name.clone(), value);
    }
    Ok(locals)
}
