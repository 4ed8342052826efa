//! Rendering for the `trace` subcommand.
//!
//! Three views over a [`ChangeSet`]:
//!
//! - `annotated` appends `# name = value` comments to each source line
//!   that changed something.
//! - `panel` prints only the changes, padded with blank rows so each
//!   entry sits on the same row as its source line. Shown beside the
//!   script, the values line up with the statements that produced them.
//! - `json` emits the `{line: {name: [values]}}` mapping as JSON.

use indexmap::IndexMap;

use linelens_trace::{ChangeSet, Value};

/// Output format for `trace`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Annotated,
    Panel,
    Json,
}

/// Parse a `--format` argument.
pub fn parse_format(s: &str) -> Result<Format, String> {
    match s {
        "annotated" => Ok(Format::Annotated),
        "panel" => Ok(Format::Panel),
        "json" => Ok(Format::Json),
        _ => Err(format!(
            "invalid format '{}', expected annotated/panel/json",
            s
        )),
    }
}

/// Render the change mapping in the requested format.
///
/// The returned string carries no trailing newline.
pub fn render(format: Format, source: &str, changes: &ChangeSet) -> String {
    match format {
        Format::Annotated => annotated(source, changes),
        Format::Panel => panel(changes),
        Format::Json => json(changes),
    }
}

/// One line's changes as `name = v1, v2; other = v3`. Names keep
/// first-change order, values keep visit order.
fn format_changes(entries: &IndexMap<String, Vec<Value>>) -> String {
    let mut parts = Vec::new();
    for (name, values) in entries {
        let joined = values
            .iter()
            .map(|value| value.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        parts.push(format!("{} = {}", name, joined));
    }
    parts.join("; ")
}

/// The source listing with changes appended as comments.
fn annotated(source: &str, changes: &ChangeSet) -> String {
    let mut lines = Vec::new();
    for (i, line) in source.lines().enumerate() {
        let number = i as u32 + 1;
        match changes.0.get(&number) {
            Some(entries) => lines.push(format!("{}  # {}", line, format_changes(entries))),
            None => lines.push(line.to_string()),
        }
    }
    lines.join("\n")
}

/// Blank rows pad each entry down to its source row: the entry for line
/// `n` lands on row `n`, counting from 1.
fn panel(changes: &ChangeSet) -> String {
    let mut out = String::new();
    let mut prev = 1;
    for (line, entries) in &changes.0 {
        for _ in prev..*line {
            out.push('\n');
        }
        out.push_str(&format_changes(entries));
        prev = *line;
    }
    out
}

fn json(changes: &ChangeSet) -> String {
    serde_json::to_string_pretty(changes)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize changes: {}\"}}", e))
}
