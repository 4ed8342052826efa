pub mod attribute;
pub mod interpreter;
pub mod recorder;
pub mod snapshot;

// Re-export commonly used types
pub use attribute::{attribute, ChangeSet};
pub use interpreter::{
    Arguments, Incomparable, Interpreter, InterpreterConfig, LineEvent, LineRecorder, NullRecorder,
    RuntimeError, Value,
};
pub use recorder::{record, record_call, record_with_config, TraceError, TraceSession};
pub use snapshot::{ExecutionTrace, LineSnapshot};
