use std::fmt;

use serde::{Deserialize, Serialize};

/// Storage for TEXT attributes; the executor enforces the tighter 30-character
/// limit on INSERT literals (see spec §6), this is the wider at-rest bound.
pub const MAX_TEXT_LEN: usize = 100;

/// A single cell value. `Null` stands for "no value" for any domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Integer(i32),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// True for NULL and for text values that are empty after trimming —
    /// the "blank" condition entity integrity checks against.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            Value::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Text(text) => write!(f, "{}", text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_detects_whitespace_only_text() {
        assert!(Value::Text("   ".to_string()).is_blank());
        assert!(!Value::Text("x".to_string()).is_blank());
    }

    #[test]
    fn null_is_blank() {
        assert!(Value::Null.is_blank());
    }

    #[test]
    fn display_matches_plain_text() {
        assert_eq!(Value::Integer(3).to_string(), "3");
        assert_eq!(Value::Text("hi".to_string()).to_string(), "hi");
        assert_eq!(Value::Null.to_string(), "NULL");
    }

    #[test]
    fn round_trips_through_json() {
        for value in [
            Value::Integer(-7),
            Value::Float(3.5),
            Value::Text("hello".to_string()),
            Value::Null,
        ] {
            let json = serde_json::to_string(&value).unwrap();
            let back: Value = serde_json::from_str(&json).unwrap();
            assert_eq!(value, back);
        }
    }
}
