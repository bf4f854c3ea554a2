use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::value::{MAX_TEXT_LEN, Value};

/// The three declared domains an attribute may take (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Domain {
    Integer,
    Float,
    Text,
}

impl Domain {
    pub fn name(&self) -> &'static str {
        match self {
            Domain::Integer => "INTEGER",
            Domain::Float => "FLOAT",
            Domain::Text => "TEXT",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_uppercase().as_str() {
            "INTEGER" => Some(Domain::Integer),
            "FLOAT" => Some(Domain::Float),
            "TEXT" => Some(Domain::Text),
            _ => None,
        }
    }

    /// Parses a raw literal (already stripped of surrounding quotes) into a
    /// `Value` matching this domain, or `Null` for an empty/blank raw value.
    /// Does not check primary-key blankness — callers check that separately.
    pub fn parse_value(&self, column: &str, raw: &str) -> Result<Value, StorageError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") {
            return Ok(Value::Null);
        }
        match self {
            Domain::Integer => trimmed
                .parse::<i32>()
                .map(Value::Integer)
                .map_err(|_| StorageError::DomainViolation {
                    column: column.to_string(),
                    domain: *self,
                    value: raw.to_string(),
                }),
            Domain::Float => trimmed
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| StorageError::DomainViolation {
                    column: column.to_string(),
                    domain: *self,
                    value: raw.to_string(),
                }),
            Domain::Text => {
                if trimmed.chars().count() > MAX_TEXT_LEN {
                    return Err(StorageError::TextOverflow {
                        column: column.to_string(),
                        max: MAX_TEXT_LEN,
                    });
                }
                Ok(Value::Text(trimmed.to_string()))
            }
        }
    }
}

/// A column definition: name, declared domain, and whether it is the table's
/// single primary key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub domain: Domain,
    pub primary_key: bool,
}

impl Attribute {
    pub fn new(name: impl Into<String>, domain: Domain, primary_key: bool) -> Self {
        Self {
            name: name.into(),
            domain,
            primary_key,
        }
    }

    pub fn matches_name(&self, other: &str) -> bool {
        self.name.eq_ignore_ascii_case(other)
    }
}

/// Checks the identifier grammar from spec §3: a leading letter followed by
/// up to 19 alphanumeric characters.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    let rest: Vec<char> = chars.collect();
    rest.len() <= 19 && rest.iter().all(|c| c.is_ascii_alphanumeric())
}

/// The ordered attribute list describing a table's shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub attributes: Vec<Attribute>,
}

impl Schema {
    pub fn new(attributes: Vec<Attribute>) -> Result<Self, StorageError> {
        let key_count = attributes.iter().filter(|a| a.primary_key).count();
        if key_count > 1 {
            return Err(StorageError::MultiplePrimaryKeys);
        }
        Ok(Self { attributes })
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// The position of the primary-key attribute, if this schema has one.
    pub fn key_index(&self) -> Option<usize> {
        self.attributes.iter().position(|a| a.primary_key)
    }

    /// Looks an attribute up by exact (case-insensitive) name, falling back
    /// to a suffix match on the part after a `.` qualifier — used when the
    /// schema is a combined join schema (`"table.attr"` field names).
    pub fn attribute_index(&self, name: &str) -> Option<usize> {
        if let Some(index) = self.attributes.iter().position(|a| a.matches_name(name)) {
            return Some(index);
        }
        self.attributes.iter().position(|a| {
            a.name
                .rsplit('.')
                .next()
                .map(|suffix| suffix.eq_ignore_ascii_case(name))
                .unwrap_or(false)
        })
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attribute_index(name).map(|idx| &self.attributes[idx])
    }

    /// Builds the combined schema for a multi-table SELECT/LET cross
    /// product: every attribute name qualified as `"<table>.<attr>"`.
    pub fn combine(tables: &[(&str, &Schema)]) -> Schema {
        let mut attributes = Vec::new();
        for (table_name, schema) in tables {
            for attribute in &schema.attributes {
                attributes.push(Attribute::new(
                    format!("{}.{}", table_name, attribute.name),
                    attribute.domain,
                    false,
                ));
            }
        }
        Schema { attributes }
    }

    pub fn rename(&mut self, new_names: &[String]) -> Result<(), StorageError> {
        if new_names.len() != self.attributes.len() {
            return Err(StorageError::RenameArityMismatch {
                expected: self.attributes.len(),
                given: new_names.len(),
            });
        }
        for (attribute, new_name) in self.attributes.iter_mut().zip(new_names.iter()) {
            attribute.name = new_name.clone();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_rejects_leading_digit() {
        assert!(!is_valid_identifier("1abc"));
        assert!(is_valid_identifier("a1"));
    }

    #[test]
    fn identifier_rejects_too_long() {
        let ok = "a".to_string() + &"b".repeat(19);
        let too_long = "a".to_string() + &"b".repeat(20);
        assert!(is_valid_identifier(&ok));
        assert!(!is_valid_identifier(&too_long));
    }

    #[test]
    fn parse_value_rejects_overflowing_integer() {
        let domain = Domain::Integer;
        assert!(domain.parse_value("id", "99999999999999").is_err());
        assert!(domain.parse_value("id", "42").is_ok());
    }

    #[test]
    fn parse_value_rejects_overlong_text() {
        let domain = Domain::Text;
        let long = "x".repeat(MAX_TEXT_LEN + 1);
        assert!(domain.parse_value("name", &long).is_err());
    }

    #[test]
    fn schema_rejects_two_primary_keys() {
        let attrs = vec![
            Attribute::new("a", Domain::Integer, true),
            Attribute::new("b", Domain::Integer, true),
        ];
        assert!(Schema::new(attrs).is_err());
    }

    #[test]
    fn attribute_index_matches_case_insensitively() {
        let schema = Schema::new(vec![Attribute::new("Id", Domain::Integer, true)]).unwrap();
        assert_eq!(schema.attribute_index("id"), Some(0));
    }

    #[test]
    fn combined_schema_qualifies_names() {
        let a = Schema::new(vec![Attribute::new("x", Domain::Integer, true)]).unwrap();
        let b = Schema::new(vec![Attribute::new("y", Domain::Integer, false)]).unwrap();
        let combined = Schema::combine(&[("a", &a), ("b", &b)]);
        assert_eq!(combined.attributes[0].name, "a.x");
        assert_eq!(combined.attributes[1].name, "b.y");
        assert_eq!(combined.attribute_index("y"), Some(1));
    }
}
