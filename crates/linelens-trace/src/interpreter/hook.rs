//! Line-event hook interface.
//!
//! The interpreter reports a [`LineEvent`] to a [`LineRecorder`] at the
//! moment control reaches a statement header, before the statement runs.
//! The event borrows the live scope; a recorder that wants to keep the
//! bindings must clone them, because they keep mutating after the hook
//! returns.

use indexmap::IndexMap;

use super::value::Value;

/// One line-execution event, observed before the statement executes.
#[derive(Debug)]
pub struct LineEvent<'a> {
    /// 1-based source line of the statement header.
    pub line: u32,
    /// Call depth: 1 for the function the run was started on, +1 per
    /// nested call.
    pub depth: usize,
    /// Name of the function whose frame produced the event.
    pub function: &'a str,
    /// The frame's locals at this moment, in binding order.
    pub bindings: &'a IndexMap<String, Value>,
}

/// Receives every line event of a run, across all call depths.
pub trait LineRecorder {
    fn record_line(&mut self, event: LineEvent<'_>);
}

/// Recorder that drops every event, for uninstrumented execution.
pub struct NullRecorder;

impl LineRecorder for NullRecorder {
    fn record_line(&mut self, _event: LineEvent<'_>) {}
}
