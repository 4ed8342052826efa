//! Frame snapshot recorder: runs one call under instrumentation and
//! collects a [`LineSnapshot`] per executed line of the traced function.
//!
//! # Architecture
//!
//! A [`TraceSession`] is a plain value implementing
//! [`LineRecorder`](crate::interpreter::LineRecorder): the interpreter is
//! handed `&mut session` for exactly one call, so hook installation and
//! teardown are scoped by construction. There is no global state to
//! collide on; two recordings use two sessions.
//!
//! The session keeps only depth-1 events. Lines of functions called *by*
//! the traced function run at greater depth and are excluded; only the
//! outermost activation of the traced function is captured, so recursive
//! re-entries are excluded like any other callee.
//!
//! # Usage
//!
//! ```ignore
//! let trace = record(&script, def, arguments)?;
//! let changes = attribute(&trace);
//! ```

use linelens_core::{CallSpec, FunctionDef, Script};
use serde::{Deserialize, Serialize};

use crate::interpreter::{
    Arguments, Interpreter, InterpreterConfig, LineEvent, LineRecorder, RuntimeError,
};
use crate::snapshot::{ExecutionTrace, LineSnapshot};

/// Why a recording produced no usable trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum TraceError {
    #[error("unknown function '{name}'")]
    UnknownFunction { name: String },

    /// The traced call trapped. The snapshots gathered before the failing
    /// line are preserved so attribution can still run on executed lines.
    #[error("execution failed: {error}")]
    Execution {
        error: RuntimeError,
        partial: ExecutionTrace,
    },
}

/// One recording in progress. Collects a snapshot per depth-1 line event.
#[derive(Debug, Default)]
pub struct TraceSession {
    snapshots: Vec<LineSnapshot>,
}

impl TraceSession {
    pub fn new() -> Self {
        TraceSession::default()
    }

    pub fn into_snapshots(self) -> Vec<LineSnapshot> {
        self.snapshots
    }
}

impl LineRecorder for TraceSession {
    fn record_line(&mut self, event: LineEvent<'_>) {
        if event.depth != 1 {
            return;
        }
        self.snapshots.push(LineSnapshot {
            line: event.line,
            bindings: event.bindings.clone(),
        });
    }
}

/// Runs `def` with `arguments` under a fresh [`TraceSession`] and returns
/// the completed trace.
pub fn record(
    script: &Script,
    def: &FunctionDef,
    arguments: Arguments,
) -> Result<ExecutionTrace, TraceError> {
    record_with_config(script, def, arguments, InterpreterConfig::default())
}

/// [`record`] with explicit interpreter limits.
pub fn record_with_config(
    script: &Script,
    def: &FunctionDef,
    arguments: Arguments,
    config: InterpreterConfig,
) -> Result<ExecutionTrace, TraceError> {
    tracing::debug!(function = %def.name, "trace session started");
    let interp = Interpreter::new(script, config);
    let mut session = TraceSession::new();
    match interp.call(def, arguments, &mut session) {
        Ok(result) => {
            let snapshots = session.into_snapshots();
            tracing::debug!(
                function = %def.name,
                snapshots = snapshots.len(),
                "trace session finished"
            );
            Ok(ExecutionTrace {
                function: def.name.clone(),
                snapshots,
                result: Some(result),
            })
        }
        Err(error) => {
            let mut snapshots = session.into_snapshots();
            // The last event belongs to the statement that trapped. That
            // line never completed, so its snapshot leaves the trace. A
            // binding failure has an empty session and nothing to drop.
            snapshots.pop();
            tracing::debug!(
                function = %def.name,
                error = %error,
                snapshots = snapshots.len(),
                "trace session trapped"
            );
            Err(TraceError::Execution {
                error,
                partial: ExecutionTrace {
                    function: def.name.clone(),
                    snapshots,
                    result: None,
                },
            })
        }
    }
}

/// Resolves a parsed call specification against the script and records it.
pub fn record_call(script: &Script, spec: &CallSpec) -> Result<ExecutionTrace, TraceError> {
    let def = script
        .get(&spec.function)
        .ok_or_else(|| TraceError::UnknownFunction {
            name: spec.function.clone(),
        })?;
    record(script, def, Arguments::from_spec(spec))
}
