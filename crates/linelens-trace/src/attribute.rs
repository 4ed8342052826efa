//! Change attribution: turns a snapshot sequence into a per-line map of
//! variable changes.
//!
//! Consecutive snapshots are compared with an explicit per-name equality
//! pass over the two bindings maps. A binding counts as changed when its
//! name is new or its value is unequal; the change is attributed to the
//! *earlier* snapshot's line, the line whose execution produced it. The
//! first snapshot has no predecessor and contributes nothing, so N
//! snapshots yield N-1 examined transitions.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::interpreter::Value;
use crate::snapshot::ExecutionTrace;

/// Maps each line number to the variables it changed and the values they
/// took, one value per visit that changed the variable, in visitation order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeSet(pub BTreeMap<u32, IndexMap<String, Vec<Value>>>);

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Attributes every binding change in `trace` to the line that produced
/// it. Bindings whose equality is not well-defined (NaN somewhere) are
/// skipped for that transition and treated as unchanged.
pub fn attribute(trace: &ExecutionTrace) -> ChangeSet {
    let mut changes = ChangeSet::default();
    for pair in trace.snapshots.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        for (name, value) in &next.bindings {
            let changed = match prev.bindings.get(name) {
                None => true,
                Some(previous) => match previous.try_eq(value) {
                    Ok(equal) => !equal,
                    Err(incomparable) => {
                        tracing::debug!(
                            variable = %name,
                            line = prev.line,
                            %incomparable,
                            "skipping incomparable binding"
                        );
                        false
                    }
                },
            };
            if changed {
                changes
                    .0
                    .entry(prev.line)
                    .or_default()
                    .entry(name.clone())
                    .or_default()
                    .push(value.clone());
            }
        }
    }
    tracing::debug!(
        function = %trace.function,
        snapshots = trace.snapshots.len(),
        changed_lines = changes.0.len(),
        "attribution complete"
    );
    changes
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::interpreter::Arguments;
    use crate::recorder::{record, TraceError};
    use crate::snapshot::LineSnapshot;

    use super::*;

    fn traced(source: &str, function: &str, positional: Vec<Value>) -> ExecutionTrace {
        let script = linelens_core::parse(source).unwrap();
        let def = script.get(function).unwrap();
        record(
            &script,
            def,
            Arguments {
                positional,
                ..Arguments::default()
            },
        )
        .unwrap()
    }

    fn snapshot(line: u32, bindings: Vec<(&str, Value)>) -> LineSnapshot {
        LineSnapshot {
            line,
            bindings: bindings
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        }
    }

    fn expected(entries: Vec<(u32, Vec<(&str, Vec<Value>)>)>) -> ChangeSet {
        ChangeSet(
            entries
                .into_iter()
                .map(|(line, vars)| {
                    (
                        line,
                        vars.into_iter()
                            .map(|(name, values)| (name.to_string(), values))
                            .collect(),
                    )
                })
                .collect(),
        )
    }

    #[test]
    fn straight_line_changes_attribute_to_their_lines() {
        let source = "\
def double_shift(x):
    y = x + 1
    y = y * 2
    return y
";
        let trace = traced(source, "double_shift", vec![Value::Int(1)]);
        let changes = attribute(&trace);
        assert_eq!(
            changes,
            expected(vec![
                (2, vec![("y", vec![Value::Int(2)])]),
                (3, vec![("y", vec![Value::Int(4)])]),
            ])
        );
    }

    #[test]
    fn loop_line_collects_one_value_per_changing_visit() {
        let source = "\
def count(n):
    total = 0
    i = 1
    while i <= n:
        total = total + i
        i = i + 1
    return total
";
        let trace = traced(source, "count", vec![Value::Int(3)]);
        let changes = attribute(&trace);
        assert_eq!(
            changes,
            expected(vec![
                (2, vec![("total", vec![Value::Int(0)])]),
                (3, vec![("i", vec![Value::Int(1)])]),
                (
                    5,
                    vec![("total", vec![Value::Int(1), Value::Int(3), Value::Int(6)])],
                ),
                (
                    6,
                    vec![("i", vec![Value::Int(2), Value::Int(3), Value::Int(4)])],
                ),
            ])
        );
    }

    #[test]
    fn unchanged_parameter_never_appears() {
        let source = "\
def touch(n):
    a = n + 1
    b = a + 1
    return b
";
        let trace = traced(source, "touch", vec![Value::Int(1)]);
        let changes = attribute(&trace);
        for vars in changes.0.values() {
            assert!(!vars.contains_key("n"), "n never changes: {:?}", changes);
        }
    }

    #[test]
    fn single_snapshot_partial_attributes_nothing() {
        let source = "\
def boom(x):
    y = 1
    z = x / 0
    return z
";
        let script = linelens_core::parse(source).unwrap();
        let def = script.get("boom").unwrap();
        let err = record(
            &script,
            def,
            Arguments {
                positional: vec![Value::Int(1)],
                ..Arguments::default()
            },
        )
        .unwrap_err();
        let partial = match err {
            TraceError::Execution { partial, .. } => partial,
            other => panic!("Expected Execution error, got {:?}", other),
        };
        assert_eq!(partial.snapshots.len(), 1);
        assert!(attribute(&partial).is_empty());
    }

    #[test]
    fn incomparable_binding_is_skipped() {
        let trace = ExecutionTrace {
            function: "f".to_string(),
            snapshots: vec![
                snapshot(1, vec![("a", Value::Float(f64::NAN))]),
                snapshot(
                    2,
                    vec![("a", Value::Float(f64::NAN)), ("b", Value::Int(1))],
                ),
            ],
            result: None,
        };
        let changes = attribute(&trace);
        // `a` cannot be compared, so only `b` lands on line 1.
        assert_eq!(changes, expected(vec![(1, vec![("b", vec![Value::Int(1)])])]));
    }

    #[test]
    fn rebinding_to_equal_value_is_not_a_change() {
        let trace = ExecutionTrace {
            function: "f".to_string(),
            snapshots: vec![
                snapshot(1, vec![("a", Value::Int(5))]),
                snapshot(2, vec![("a", Value::Int(5))]),
                snapshot(3, vec![("a", Value::Int(6))]),
            ],
            result: None,
        };
        let changes = attribute(&trace);
        assert_eq!(changes, expected(vec![(2, vec![("a", vec![Value::Int(6)])])]));
    }

    #[test]
    fn changeset_serializes_as_nested_json_object() {
        let changes = expected(vec![(2, vec![("y", vec![Value::Int(2), Value::Int(4)])])]);
        let json = serde_json::to_string(&changes).unwrap();
        assert_eq!(json, r#"{"2":{"y":[{"Int":2},{"Int":4}]}}"#);
    }

    fn snapshots_strategy() -> impl Strategy<Value = Vec<LineSnapshot>> {
        prop::collection::vec(
            (
                1u32..12,
                prop::collection::btree_map("[abc]", -4i64..4, 0..3),
            ),
            0..8,
        )
        .prop_map(|raw| {
            raw.into_iter()
                .map(|(line, bindings)| LineSnapshot {
                    line,
                    bindings: bindings
                        .into_iter()
                        .map(|(name, value)| (name, Value::Int(value)))
                        .collect(),
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn changes_only_attribute_to_predecessor_lines(snapshots in snapshots_strategy()) {
            let trace = ExecutionTrace {
                function: "f".to_string(),
                snapshots,
                result: None,
            };
            let changes = attribute(&trace);
            let predecessors: Vec<u32> = trace
                .snapshots
                .iter()
                .rev()
                .skip(1)
                .map(|s| s.line)
                .collect();
            for (line, vars) in &changes.0 {
                prop_assert!(predecessors.contains(line));
                for values in vars.values() {
                    prop_assert!(!values.is_empty());
                }
            }
        }

        #[test]
        fn identical_snapshots_never_change(line_count in 2usize..6, value in -10i64..10) {
            let bindings: IndexMap<String, Value> =
                [("v".to_string(), Value::Int(value))].into_iter().collect();
            let snapshots = (1..=line_count)
                .map(|i| LineSnapshot {
                    line: i as u32,
                    bindings: bindings.clone(),
                })
                .collect();
            let trace = ExecutionTrace {
                function: "f".to_string(),
                snapshots,
                result: None,
            };
            prop_assert!(attribute(&trace).is_empty());
        }
    }
}
