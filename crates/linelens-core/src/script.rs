//! A fully parsed source file.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::function::FunctionDef;

/// The functions of one source file, keyed by name in definition order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Script {
    pub functions: IndexMap<String, FunctionDef>,
}

impl Script {
    /// Looks up a function by name.
    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(name)
    }

    /// Function names in the order they were defined.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(|s| s.as_str())
    }

    /// The function whose `def` line is closest at or before `line`, the
    /// way an editor resolves "the function under the cursor". `None` when
    /// `line` sits before the first definition.
    pub fn function_at(&self, line: u32) -> Option<&FunctionDef> {
        self.functions
            .values()
            .filter(|def| def.def_line <= line)
            .last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_preserve_definition_order() {
        let mut functions = IndexMap::new();
        for name in ["zeta", "alpha", "mid"] {
            functions.insert(
                name.to_string(),
                FunctionDef {
                    name: name.into(),
                    params: vec![],
                    body: vec![],
                    def_line: 1,
                },
            );
        }
        let script = Script { functions };
        let names: Vec<&str> = script.names().collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert!(script.get("alpha").is_some());
        assert!(script.get("omega").is_none());
    }

    #[test]
    fn function_at_picks_the_closest_preceding_def() {
        let source = "\
def first():
    pass

def second():
    pass
    pass
";
        let script = crate::parse(source).unwrap();
        assert_eq!(script.function_at(1).unwrap().name, "first");
        // Anywhere inside or after a function body resolves to it.
        assert_eq!(script.function_at(2).unwrap().name, "first");
        assert_eq!(script.function_at(3).unwrap().name, "first");
        assert_eq!(script.function_at(4).unwrap().name, "second");
        assert_eq!(script.function_at(100).unwrap().name, "second");
        assert!(script.function_at(0).is_none());
    }
}
