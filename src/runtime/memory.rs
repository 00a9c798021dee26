use std::collections::HashMap;

use crate::runtime::Value;

/// Global variable store
///
/// A single flat name-to-value table that lives as long as the interpreter.
/// Blocks and loops introduce no scopes: every declaration and assignment
/// writes into this table.
#[derive(Debug, Clone, Default)]
pub struct Memory {
    variables: HashMap<String, Value>,
}

impl Memory {
    /// Creates an empty store
    pub fn new() -> Self {
        Memory::default()
    }

    /// Reads a variable; `None` when the name was never written
    pub fn read(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Reads a variable, treating an unknown name as Null
    pub fn get(&self, name: &str) -> Value {
        self.read(name).cloned().unwrap_or(Value::Null)
    }

    /// Writes (or overwrites) a variable
    pub fn write(&mut self, name: &str, value: Value) {
        tracing::trace!(name, %value, "store write");
        self.variables.insert(name.to_string(), value);
    }

    /// True if the name has been written at least once
    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Number of stored variables
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}
