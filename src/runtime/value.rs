use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Runtime value representation
///
/// Values are immutable once built. Operations that "change" a container
/// build a new one; the `Arc` makes copies of untouched containers cheap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Absence of a value
    Null,
    /// Boolean value
    Boolean(bool),
    /// 32-bit signed integer value
    Number(i32),
    /// Text value
    Text(String),
    /// Ordered sequence of values (reference-counted)
    Array(Arc<Vec<Value>>),
    /// Text-keyed mapping (reference-counted, iterated in key order)
    Map(Arc<BTreeMap<String, Value>>),
}

impl Value {
    /// Creates an array value from a vector of values
    pub fn array(values: Vec<Value>) -> Self {
        Value::Array(Arc::new(values))
    }

    /// Creates a map value from its entries
    pub fn map(entries: BTreeMap<String, Value>) -> Self {
        Value::Map(Arc::new(entries))
    }

    /// Creates a text value
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    /// Number(1) for true, Number(0) for false
    pub fn flag(b: bool) -> Self {
        Value::Number(if b { 1 } else { 0 })
    }

    /// Returns the type name as used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Boolean(_) => "Boolean",
            Value::Number(_) => "Number",
            Value::Text(_) => "Text",
            Value::Array(_) => "Array",
            Value::Map(_) => "Map",
        }
    }

    /// Truthiness used by conditions, `!` and `as Boolean`
    ///
    /// Null, Number(0), Boolean(false) and Text("") are false; everything
    /// else, including empty containers, is true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Number(n) => *n != 0,
            Value::Text(s) => !s.is_empty(),
            Value::Array(_) | Value::Map(_) => true,
        }
    }

    /// Integer conversion used by `as Integer`
    ///
    /// Text that is not a signed decimal integer within 32 bits converts to 0.
    pub fn to_integer(&self) -> i32 {
        match self {
            Value::Number(n) => *n,
            Value::Boolean(b) => i32::from(*b),
            Value::Text(s) => s.parse().unwrap_or(0),
            Value::Null | Value::Array(_) | Value::Map(_) => 0,
        }
    }

    /// Element count of an Array or Map, character count of Text
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Array(items) => Some(items.len()),
            Value::Map(entries) => Some(entries.len()),
            Value::Text(s) => Some(s.chars().count()),
            _ => None,
        }
    }

    /// Reads `index` out of an Array or `key` out of a Map.
    ///
    /// Returns `None` when the container/index combination is not valid and
    /// `Some(Value::Null)` when the position is simply absent.
    pub fn lookup(&self, index: &Value) -> Option<Value> {
        match (self, index) {
            (Value::Array(items), Value::Number(i)) => Some(
                usize::try_from(*i)
                    .ok()
                    .and_then(|i| items.get(i))
                    .cloned()
                    .unwrap_or(Value::Null),
            ),
            (Value::Map(entries), Value::Text(key)) => {
                Some(entries.get(key).cloned().unwrap_or(Value::Null))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, val) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", val)?;
                }
                write!(f, "]")
            }
            Value::Map(entries) if entries.is_empty() => write!(f, "[:]"),
            Value::Map(entries) => {
                write!(f, "[")?;
                for (i, (key, val)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, val)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::array(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Null.type_name(), "Null");
        assert_eq!(Value::Boolean(true).type_name(), "Boolean");
        assert_eq!(Value::Number(42).type_name(), "Number");
        assert_eq!(Value::text("test").type_name(), "Text");
        assert_eq!(Value::array(vec![]).type_name(), "Array");
        assert_eq!(Value::map(BTreeMap::new()).type_name(), "Map");
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Boolean(false).is_truthy());
        assert!(Value::Boolean(true).is_truthy());
        assert!(!Value::Number(0).is_truthy());
        assert!(Value::Number(-3).is_truthy());
        assert!(!Value::text("").is_truthy());
        assert!(Value::text("0").is_truthy());
        assert!(Value::array(vec![]).is_truthy());
    }

    #[test]
    fn test_integer_conversion() {
        assert_eq!(Value::Null.to_integer(), 0);
        assert_eq!(Value::Boolean(true).to_integer(), 1);
        assert_eq!(Value::text("-17").to_integer(), -17);
        assert_eq!(Value::text("12abc").to_integer(), 0);
        assert_eq!(Value::text("99999999999").to_integer(), 0);
        assert_eq!(Value::array(vec![Value::Number(1)]).to_integer(), 0);
    }

    #[test]
    fn test_display() {
        let arr = Value::array(vec![Value::Number(1), Value::Null, Value::text("x")]);
        assert_eq!(arr.to_string(), "[1, null, x]");

        let mut entries = BTreeMap::new();
        entries.insert("b".to_string(), Value::Number(2));
        entries.insert("a".to_string(), Value::Boolean(true));
        assert_eq!(Value::map(entries).to_string(), "[a: true, b: 2]");
        assert_eq!(Value::map(BTreeMap::new()).to_string(), "[:]");
        assert_eq!(Value::array(vec![]).to_string(), "[]");
    }

    #[test]
    fn test_lookup() {
        let arr = Value::array(vec![Value::Number(1), Value::Number(2), Value::Number(3)]);
        assert_eq!(arr.lookup(&Value::Number(1)), Some(Value::Number(2)));
        assert_eq!(arr.lookup(&Value::Number(10)), Some(Value::Null));
        assert_eq!(arr.lookup(&Value::Number(-1)), Some(Value::Null));
        assert_eq!(arr.lookup(&Value::text("1")), None);

        let mut entries = BTreeMap::new();
        entries.insert("k".to_string(), Value::Number(7));
        let map = Value::map(entries);
        assert_eq!(map.lookup(&Value::text("k")), Some(Value::Number(7)));
        assert_eq!(map.lookup(&Value::text("missing")), Some(Value::Null));
        assert_eq!(map.lookup(&Value::Number(0)), None);
        assert_eq!(Value::Number(3).lookup(&Value::Number(0)), None);
    }

    #[test]
    fn test_structural_equality() {
        let a = Value::array(vec![Value::Number(1), Value::Null]);
        let b = Value::array(vec![Value::Number(1), Value::Null]);
        assert_eq!(a, b);
        assert_ne!(Value::Number(1), Value::Boolean(true));
        assert_ne!(Value::Null, Value::Number(0));
    }
}
