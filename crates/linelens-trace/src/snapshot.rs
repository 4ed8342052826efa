//! Captured frame state, one snapshot per line-execution event.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::interpreter::Value;

/// The traced frame's bindings at the moment a line was reached, before
/// the line executed. The map is an independent copy in binding order
/// (parameters first), never a view into the live scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSnapshot {
    pub line: u32,
    pub bindings: IndexMap<String, Value>,
}

/// Everything one recording produced: the traced function's name, the
/// snapshots in event order, and the return value when the call completed.
/// A trapped call travels with `result: None` inside the trace error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionTrace {
    pub function: String,
    pub snapshots: Vec<LineSnapshot>,
    pub result: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_roundtrip_preserves_binding_order() {
        let trace = ExecutionTrace {
            function: "f".to_string(),
            snapshots: vec![LineSnapshot {
                line: 2,
                bindings: [
                    ("b".to_string(), Value::Int(1)),
                    ("a".to_string(), Value::Str("x".to_string())),
                ]
                .into_iter()
                .collect(),
            }],
            result: Some(Value::None),
        };
        let json = serde_json::to_string(&trace).unwrap();
        assert_eq!(
            json,
            r#"{"function":"f","snapshots":[{"line":2,"bindings":{"b":{"Int":1},"a":{"Str":"x"}}}],"result":"None"}"#
        );
        let back: ExecutionTrace = serde_json::from_str(&json).unwrap();
        assert_eq!(back, trace);
    }
}
