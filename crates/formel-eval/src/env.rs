use std::collections::HashMap;

use formel_ast::value::Value;

use crate::builtins::Builtin;

/// Mutable binding store consulted and updated during evaluation. One
/// store may back many formulas sequentially; it is not synchronized, so
/// callers sharing it across threads must serialize access themselves.
///
/// Whether names match case-sensitively is fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<String, Value>,
    fold_case: bool,
}

impl Environment {
    /// Case-sensitive name matching.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds every name to ASCII lowercase on access, so `Foo` and `foo`
    /// are the same binding.
    pub fn case_folding() -> Self {
        Self {
            vars: HashMap::new(),
            fold_case: true,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        if self.fold_case {
            self.vars.get(name.to_ascii_lowercase().as_str())
        } else {
            self.vars.get(name)
        }
    }

    /// Creates the binding if absent.
    pub fn set(&mut self, name: &str, value: Value) {
        let key = if self.fold_case {
            name.to_ascii_lowercase()
        } else {
            name.to_string()
        };
        self.vars.insert(key, value);
    }

    pub fn resolve_function(&self, name: &str) -> Option<Builtin> {
        if self.fold_case {
            Builtin::resolve(name.to_ascii_lowercase().as_str())
        } else {
            Builtin::resolve(name)
        }
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
