use serde::{Deserialize, Serialize};

use crate::value::Value;

/// A single row: an ordered list of cell values, one per schema attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuple {
    values: Vec<Value>,
}

impl Tuple {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Builds a wider tuple for a cross product by appending `other`'s cells
    /// after this tuple's own, matching the attribute order `Schema::combine`
    /// produces.
    pub fn concat(&self, other: &Tuple) -> Tuple {
        let mut values = self.values.clone();
        values.extend(other.values.iter().cloned());
        Tuple::new(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concat_appends_in_order() {
        let a = Tuple::new(vec![Value::Integer(1)]);
        let b = Tuple::new(vec![Value::Text("x".into())]);
        let combined = a.concat(&b);
        assert_eq!(combined.len(), 2);
        assert_eq!(combined.get(0), Some(&Value::Integer(1)));
        assert_eq!(combined.get(1), Some(&Value::Text("x".into())));
    }
}
