use crate::error::StorageError;
use crate::index::{IndexKey, OrderedIndex, checked_insert};
use crate::schema::{Attribute, Domain, Schema};
use crate::tuple::Tuple;
use crate::value::Value;

/// An in-memory named relation: a schema, its tuples in insertion order, and
/// (when the schema declares one) a primary-key index over them.
///
/// Tuple positions double as rids. Any operation that removes tuples from
/// the middle of the sequence invalidates those positions, so `delete` and
/// key-changing `update`s rebuild the index afterward rather than trying to
/// patch individual entries into a structure keyed by a moving position.
pub struct Table {
    name: String,
    schema: Schema,
    tuples: Vec<Tuple>,
    index: Option<OrderedIndex>,
}

impl Table {
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        let index = schema.key_index().map(|_| OrderedIndex::new());
        Self {
            name: name.into(),
            schema,
            tuples: Vec::new(),
            index,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn tuples(&self) -> &[Tuple] {
        &self.tuples
    }

    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    pub fn has_primary_key(&self) -> bool {
        self.index.is_some()
    }

    fn check_domains(&self, tuple: &Tuple) -> Result<(), StorageError> {
        for (attribute, value) in self.schema.attributes.iter().zip(tuple.values()) {
            check_domain(attribute, value)?;
        }
        Ok(())
    }

    /// Appends an already-typed tuple, enforcing arity, then — position by
    /// position — primary-key non-blankness before domain conformance, then
    /// key uniqueness (spec §4.1's validation order: first failure
    /// terminates). Values are assumed already parsed per the schema's
    /// declared domains; callers holding raw literal text should go through
    /// [`Table::insert_literals`] instead, which parses per-domain in this
    /// same order.
    pub fn insert(&mut self, tuple: Tuple) -> Result<(), StorageError> {
        if tuple.len() != self.schema.len() {
            return Err(StorageError::ArityMismatch {
                expected: self.schema.len(),
                actual: tuple.len(),
            });
        }

        let key_index = self.schema.key_index();
        for (i, (attribute, value)) in self.schema.attributes.iter().zip(tuple.values()).enumerate() {
            if Some(i) == key_index && value.is_blank() {
                return Err(StorageError::NullKey {
                    column: attribute.name.clone(),
                });
            }
            check_domain(attribute, value)?;
        }

        if let Some(key_index) = key_index {
            let key_value = tuple.get(key_index).expect("checked arity above");
            let key = IndexKey::from_value(key_value).expect("blank check excludes Null");
            let rid = self.tuples.len();
            checked_insert(self.index.as_mut().unwrap(), &self.name, key, rid)?;
        }

        self.tuples.push(tuple);
        Ok(())
    }

    /// Parses one row of raw literal text against this table's schema and
    /// inserts it — spec §3: "the textual representation of a literal is
    /// parsed into one of these per the owning attribute's declared
    /// domain," not per the literal's own lexical shape. Validation runs in
    /// the same position-by-position order as `insert` (primary-key
    /// blankness checked directly on the trimmed raw text before the domain
    /// parse for that position is even attempted), so a blank key is always
    /// reported ahead of a domain issue at a later column.
    pub fn insert_literals(&mut self, raw_values: &[String]) -> Result<(), StorageError> {
        if raw_values.len() != self.schema.len() {
            return Err(StorageError::ArityMismatch {
                expected: self.schema.len(),
                actual: raw_values.len(),
            });
        }
        let key_index = self.schema.key_index();
        let mut values = Vec::with_capacity(raw_values.len());
        for (i, (attribute, raw)) in self.schema.attributes.iter().zip(raw_values).enumerate() {
            if Some(i) == key_index && raw.trim().is_empty() {
                return Err(StorageError::NullKey {
                    column: attribute.name.clone(),
                });
            }
            values.push(attribute.domain.parse_value(&attribute.name, raw)?);
        }
        self.insert(Tuple::new(values))
    }

    /// Ascending primary-key order when the table has a key; insertion order
    /// otherwise. `predicate` is the already-evaluated WHERE test for each
    /// candidate tuple.
    pub fn select(&self, predicate: impl Fn(&Tuple) -> bool) -> Vec<&Tuple> {
        let mut out = Vec::new();
        match &self.index {
            Some(index) => {
                for rid in index.iter_in_order() {
                    if let Some(tuple) = self.tuples.get(rid) {
                        if predicate(tuple) {
                            out.push(tuple);
                        }
                    }
                }
            }
            None => {
                for tuple in &self.tuples {
                    if predicate(tuple) {
                        out.push(tuple);
                    }
                }
            }
        }
        out
    }

    /// Applies `apply` to every tuple matching `predicate`, reindexing when
    /// the primary-key cell changes. A tuple whose new value fails a
    /// constraint (domain, blank key, duplicate key) is left unmodified and
    /// not counted as updated, with a diagnostic recorded for it; every
    /// other matching tuple is still processed. Returns the number of
    /// tuples actually updated alongside the diagnostics collected.
    pub fn update(
        &mut self,
        predicate: impl Fn(&Tuple) -> bool,
        mut apply: impl FnMut(&Tuple) -> Tuple,
    ) -> (usize, Vec<StorageError>) {
        let rids: Vec<usize> = if let Some(index) = &self.index {
            index
                .iter_in_order()
                .into_iter()
                .filter(|&rid| predicate(&self.tuples[rid]))
                .collect()
        } else {
            (0..self.tuples.len())
                .filter(|&rid| predicate(&self.tuples[rid]))
                .collect()
        };

        let key_index = self.schema.key_index();
        let mut updated = 0;
        let mut diagnostics = Vec::new();
        for rid in rids {
            let old_tuple = self.tuples[rid].clone();
            let new_tuple = apply(&old_tuple);
            if new_tuple.len() != self.schema.len() {
                diagnostics.push(StorageError::ArityMismatch {
                    expected: self.schema.len(),
                    actual: new_tuple.len(),
                });
                continue;
            }
            if let Err(err) = self.check_domains(&new_tuple) {
                diagnostics.push(err);
                continue;
            }

            if let Some(key_index) = key_index {
                let old_value = old_tuple.get(key_index).expect("checked arity above");
                let new_value = new_tuple.get(key_index).expect("checked arity above");
                if new_value != old_value {
                    if new_value.is_blank() {
                        diagnostics.push(StorageError::NullKey {
                            column: self.schema.attributes[key_index].name.clone(),
                        });
                        continue;
                    }
                    let new_key = IndexKey::from_value(new_value).expect("blank check above");
                    let index = self.index.as_mut().unwrap();
                    if index.contains(&new_key) {
                        diagnostics.push(StorageError::DuplicateKey {
                            table: self.name.clone(),
                            key: new_value.to_string(),
                        });
                        continue;
                    }
                    if let Some(old_key) = IndexKey::from_value(old_value) {
                        index.delete(&old_key);
                    }
                    if checked_insert(index, &self.name, new_key, rid).is_err() {
                        diagnostics.push(StorageError::DuplicateKey {
                            table: self.name.clone(),
                            key: new_value.to_string(),
                        });
                        continue;
                    }
                }
            }

            self.tuples[rid] = new_tuple;
            updated += 1;
        }
        (updated, diagnostics)
    }

    /// Removes matching tuples and rebuilds the index afterward. `None`
    /// clears the table entirely (tuples and index), used only for the
    /// internal "wipe and keep the schema" operation — the executor's
    /// bare `DELETE table;` instead drops the whole table from the
    /// database, schema included.
    pub fn delete(&mut self, predicate: Option<impl Fn(&Tuple) -> bool>) -> usize {
        match predicate {
            None => {
                let removed = self.tuples.len();
                self.tuples.clear();
                if let Some(index) = &mut self.index {
                    index.clear();
                }
                removed
            }
            Some(predicate) => {
                let before = self.tuples.len();
                self.tuples.retain(|tuple| !predicate(tuple));
                let removed = before - self.tuples.len();
                if removed > 0 {
                    self.rebuild_index();
                }
                removed
            }
        }
    }

    /// Clears and repopulates the index from the current tuple order. Used
    /// after any structural mutation that shifts tuple positions.
    fn rebuild_index(&mut self) {
        let Some(key_index) = self.schema.key_index() else {
            return;
        };
        let mut index = OrderedIndex::new();
        for (rid, tuple) in self.tuples.iter().enumerate() {
            if let Some(key) = tuple.get(key_index).and_then(IndexKey::from_value) {
                let _ = index.insert(key, rid);
            }
        }
        self.index = Some(index);
    }

    pub fn rename_attributes(&mut self, new_names: &[String]) -> Result<(), StorageError> {
        self.schema.rename(new_names)
    }
}

/// Whether `value` conforms to `attribute`'s declared domain — `Null`
/// conforms everywhere, otherwise the value's variant must match the
/// domain.
fn check_domain(attribute: &Attribute, value: &Value) -> Result<(), StorageError> {
    let conforms = match (attribute.domain, value) {
        (_, Value::Null) => true,
        (Domain::Integer, Value::Integer(_)) => true,
        (Domain::Float, Value::Float(_)) => true,
        (Domain::Text, Value::Text(_)) => true,
        _ => false,
    };
    if !conforms {
        return Err(StorageError::DomainViolation {
            column: attribute.name.clone(),
            domain: attribute.domain,
            value: value.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_table() -> Table {
        let schema = Schema::new(vec![
            Attribute::new("id", Domain::Integer, true),
            Attribute::new("name", Domain::Text, false),
        ])
        .unwrap();
        Table::new("people", schema)
    }

    #[test]
    fn insert_rejects_duplicate_key() {
        let mut table = make_table();
        table
            .insert(Tuple::new(vec![Value::Integer(1), Value::Text("a".into())]))
            .unwrap();
        let err = table
            .insert(Tuple::new(vec![Value::Integer(1), Value::Text("b".into())]))
            .unwrap_err();
        assert!(matches!(err, StorageError::DuplicateKey { .. }));
    }

    #[test]
    fn insert_rejects_blank_key() {
        let mut table = make_table();
        let err = table
            .insert(Tuple::new(vec![Value::Null, Value::Text("a".into())]))
            .unwrap_err();
        assert!(matches!(err, StorageError::NullKey { .. }));
    }

    #[test]
    fn select_returns_ascending_key_order() {
        let mut table = make_table();
        for (id, name) in [(3, "c"), (1, "a"), (2, "b")] {
            table
                .insert(Tuple::new(vec![Value::Integer(id), Value::Text(name.into())]))
                .unwrap();
        }
        let rows = table.select(|_| true);
        let ids: Vec<i32> = rows.iter().map(|t| t.get(0).unwrap().as_i32().unwrap()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn update_rekeys_on_primary_key_change() {
        let mut table = make_table();
        table
            .insert(Tuple::new(vec![Value::Integer(1), Value::Text("a".into())]))
            .unwrap();
        let (updated, diagnostics) = table.update(
            |t| t.get(0) == Some(&Value::Integer(1)),
            |t| Tuple::new(vec![Value::Integer(9), t.get(1).unwrap().clone()]),
        );
        assert_eq!(updated, 1);
        assert!(diagnostics.is_empty());
        let rows = table.select(|_| true);
        assert_eq!(rows[0].get(0), Some(&Value::Integer(9)));
    }

    #[test]
    fn update_rejects_key_collision() {
        let mut table = make_table();
        table
            .insert(Tuple::new(vec![Value::Integer(1), Value::Text("a".into())]))
            .unwrap();
        table
            .insert(Tuple::new(vec![Value::Integer(2), Value::Text("b".into())]))
            .unwrap();
        let (updated, diagnostics) = table.update(
            |t| t.get(0) == Some(&Value::Integer(1)),
            |t| Tuple::new(vec![Value::Integer(2), t.get(1).unwrap().clone()]),
        );
        assert_eq!(updated, 0);
        assert!(matches!(diagnostics[0], StorageError::DuplicateKey { .. }));
    }

    #[test]
    fn delete_with_predicate_rebuilds_index() {
        let mut table = make_table();
        for id in [1, 2, 3] {
            table
                .insert(Tuple::new(vec![Value::Integer(id), Value::Text("x".into())]))
                .unwrap();
        }
        let removed = table.delete(Some(|t: &Tuple| t.get(0) == Some(&Value::Integer(2))));
        assert_eq!(removed, 1);
        let rows = table.select(|_| true);
        let ids: Vec<i32> = rows.iter().map(|t| t.get(0).unwrap().as_i32().unwrap()).collect();
        assert_eq!(ids, vec![1, 3]);
        table
            .insert(Tuple::new(vec![Value::Integer(2), Value::Text("y".into())]))
            .unwrap();
        let rows = table.select(|_| true);
        let ids: Vec<i32> = rows.iter().map(|t| t.get(0).unwrap().as_i32().unwrap()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn delete_without_predicate_clears_table() {
        let mut table = make_table();
        table
            .insert(Tuple::new(vec![Value::Integer(1), Value::Text("a".into())]))
            .unwrap();
        let removed = table.delete(None::<fn(&Tuple) -> bool>);
        assert_eq!(removed, 1);
        assert!(table.is_empty());
        table
            .insert(Tuple::new(vec![Value::Integer(1), Value::Text("a".into())]))
            .unwrap();
    }

    fn keyed_text_float_table() -> Table {
        let schema = Schema::new(vec![
            Attribute::new("id", Domain::Text, true),
            Attribute::new("score", Domain::Float, false),
        ])
        .unwrap();
        Table::new("t", schema)
    }

    #[test]
    fn insert_reports_blank_key_before_domain_violation_at_later_position() {
        let mut table = keyed_text_float_table();
        let err = table
            .insert(Tuple::new(vec![Value::Null, Value::Text("not-a-float".into())]))
            .unwrap_err();
        assert!(matches!(err, StorageError::NullKey { .. }));
    }

    #[test]
    fn insert_literals_parses_per_declared_domain_not_lexical_shape() {
        let mut table = keyed_text_float_table();
        table
            .insert_literals(&["x".to_string(), "5".to_string()])
            .unwrap();
        let rows = table.select(|_| true);
        assert_eq!(rows[0].get(1), Some(&Value::Float(5.0)));
    }

    #[test]
    fn insert_literals_reports_blank_key_before_later_domain_check() {
        let mut table = keyed_text_float_table();
        let err = table
            .insert_literals(&["".to_string(), "5".to_string()])
            .unwrap_err();
        assert!(matches!(err, StorageError::NullKey { .. }));
    }
}
