//! Tree-walking interpreter for lens scripts.
//!
//! Executes one function of a parsed script with provided arguments,
//! producing correct values for arithmetic, comparison, control flow,
//! indexing, and function calls, and reporting a line event immediately
//! before each statement executes.
//!
//! # Architecture
//!
//! - [`Interpreter`] borrows a [`Script`](linelens_core::Script) plus an
//!   [`InterpreterConfig`] and holds no mutable state of its own; each call
//!   gets a fresh frame.
//! - [`Value`] is the runtime representation of all values.
//! - [`RuntimeError`] captures trap conditions (overflow, divide by zero,
//!   unknown names, argument mismatches) with the line that caused them.
//! - [`LineRecorder`] is the hook trait the interpreter drives;
//!   [`LineEvent`] carries the line number, call depth, and a view of the
//!   frame's locals at the moment the line is reached.
//!
//! # Usage
//!
//! ```ignore
//! let script = linelens_core::parse(source)?;
//! let interp = Interpreter::new(&script, InterpreterConfig::default());
//! let def = script.get("target").unwrap();
//! let result = interp.call(def, arguments, &mut recorder)?;
//! ```

pub mod error;
pub mod eval;
pub mod hook;
pub mod state;
pub mod value;

pub use error::RuntimeError;
pub use hook::{LineEvent, LineRecorder, NullRecorder};
pub use state::{Arguments, Interpreter, InterpreterConfig};
pub use value::{Incomparable, Value};
