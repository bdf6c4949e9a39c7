//! Loosely typed property and metadata values

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A property or metadata value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric addition. Integers stay integers; any float promotes.
    /// Returns `None` when either side is text.
    pub fn checked_add(&self, other: &Value) -> Option<Value> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(Value::Int(a.saturating_add(*b))),
            (a, b) => Some(Value::Float(a.as_f64()? + b.as_f64()?)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

/// Emergent properties of an entity (`mass`, `energy`, `group_id`, ...)
pub type Properties = BTreeMap<String, Value>;

/// Parameters an interaction carries for its effect
pub type Metadata = BTreeMap<String, Value>;

/// Well-known property and metadata keys
pub mod keys {
    pub const MASS: &str = "mass";
    pub const ENERGY: &str = "energy";
    pub const GROUP_ID: &str = "group_id";
    pub const MASS_CHANGE: &str = "mass_change";
    pub const ENERGY_GAIN: &str = "energy_gain";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_addition_stays_int() {
        let sum = Value::Int(3).checked_add(&Value::Int(2));
        assert_eq!(sum, Some(Value::Int(5)));
    }

    #[test]
    fn test_float_promotes() {
        let sum = Value::Int(3).checked_add(&Value::Float(0.5));
        assert_eq!(sum, Some(Value::Float(3.5)));
    }

    #[test]
    fn test_text_is_not_numeric() {
        assert!(Value::from("abc").checked_add(&Value::Int(1)).is_none());
    }

    #[test]
    fn test_untagged_serialization() {
        let json = serde_json::to_string(&Value::Int(4)).unwrap();
        assert_eq!(json, "4");
        let json = serde_json::to_string(&Value::from("g")).unwrap();
        assert_eq!(json, "\"g\"");
    }
}
