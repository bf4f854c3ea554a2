use std::cmp::Ordering;

use crate::error::StorageError;
use crate::value::Value;

/// A primary-key value lifted out of `Value` with a total order defined over
/// it. Mirrors `Value`'s domains minus `Null` — callers reject null/blank
/// keys before ever constructing one.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexKey {
    Integer(i32),
    Float(f64),
    Text(String),
}

impl IndexKey {
    pub fn from_value(value: &Value) -> Option<IndexKey> {
        match value {
            Value::Integer(n) => Some(IndexKey::Integer(*n)),
            Value::Float(n) => Some(IndexKey::Float(*n)),
            Value::Text(text) => Some(IndexKey::Text(text.clone())),
            Value::Null => None,
        }
    }
}

impl Eq for IndexKey {}

impl Ord for IndexKey {
    /// Keys only ever compare within a single column's domain in practice,
    /// but a total order must still be defined across variants to satisfy
    /// `Ord`; cross-domain comparisons fall back to a stable discriminant
    /// ordering (Integer < Float < Text) that never panics.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (IndexKey::Integer(a), IndexKey::Integer(b)) => a.cmp(b),
            (IndexKey::Float(a), IndexKey::Float(b)) => a.total_cmp(b),
            (IndexKey::Text(a), IndexKey::Text(b)) => a.cmp(b),
            (IndexKey::Integer(_), _) => Ordering::Less,
            (_, IndexKey::Integer(_)) => Ordering::Greater,
            (IndexKey::Float(_), IndexKey::Text(_)) => Ordering::Less,
            (IndexKey::Text(_), IndexKey::Float(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for IndexKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct Node {
    key: IndexKey,
    rid: usize,
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
}

/// Unbalanced binary search tree mapping a unique primary-key value to the
/// position ("rid") of its tuple in the owning table's storage. No
/// rebalancing is performed; spec §4.2 permits any ordered structure with
/// an ascending in-order enumeration contract, and this table's access
/// pattern never needs worst-case height guarantees.
#[derive(Default)]
pub struct OrderedIndex {
    root: Option<Box<Node>>,
}

impl OrderedIndex {
    pub fn new() -> Self {
        Self { root: None }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn insert(&mut self, key: IndexKey, rid: usize) -> Result<(), ()> {
        Self::insert_node(&mut self.root, key, rid)
    }

    fn insert_node(slot: &mut Option<Box<Node>>, key: IndexKey, rid: usize) -> Result<(), ()> {
        match slot {
            None => {
                *slot = Some(Box::new(Node {
                    key,
                    rid,
                    left: None,
                    right: None,
                }));
                Ok(())
            }
            Some(node) => match key.cmp(&node.key) {
                Ordering::Equal => Err(()),
                Ordering::Less => Self::insert_node(&mut node.left, key, rid),
                Ordering::Greater => Self::insert_node(&mut node.right, key, rid),
            },
        }
    }

    pub fn get(&self, key: &IndexKey) -> Option<usize> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            match key.cmp(&node.key) {
                Ordering::Equal => return Some(node.rid),
                Ordering::Less => current = node.left.as_deref(),
                Ordering::Greater => current = node.right.as_deref(),
            }
        }
        None
    }

    pub fn contains(&self, key: &IndexKey) -> bool {
        self.get(key).is_some()
    }

    pub fn delete(&mut self, key: &IndexKey) {
        Self::delete_node(&mut self.root, key);
    }

    fn delete_node(slot: &mut Option<Box<Node>>, key: &IndexKey) {
        let Some(node) = slot else { return };
        match key.cmp(&node.key) {
            Ordering::Less => Self::delete_node(&mut node.left, key),
            Ordering::Greater => Self::delete_node(&mut node.right, key),
            Ordering::Equal => {
                match (node.left.take(), node.right.take()) {
                    (None, None) => {
                        *slot = None;
                    }
                    (Some(left), None) => {
                        *slot = Some(left);
                    }
                    (None, Some(right)) => {
                        *slot = Some(right);
                    }
                    (Some(left), Some(right)) => {
                        let mut right = right;
                        let (successor_key, successor_rid) = Self::take_min(&mut right);
                        node.left = Some(left);
                        node.right = Some(right);
                        node.key = successor_key;
                        node.rid = successor_rid;
                    }
                }
            }
        }
    }

    /// Removes and returns the minimum-keyed node under `slot`, splicing the
    /// remainder of its subtree back into place.
    fn take_min(slot: &mut Box<Node>) -> (IndexKey, usize) {
        if slot.left.is_none() {
            let taken = std::mem::replace(
                slot,
                Box::new(Node {
                    key: IndexKey::Integer(0),
                    rid: 0,
                    left: None,
                    right: None,
                }),
            );
            return (taken.key, taken.rid);
        }
        let left = slot.left.as_mut().unwrap();
        if left.left.is_none() {
            let mut taken = slot.left.take().unwrap();
            slot.left = taken.right.take();
            (taken.key, taken.rid)
        } else {
            Self::take_min(left)
        }
    }

    /// Ascending-key in-order traversal, yielding rids in primary-key order.
    pub fn iter_in_order(&self) -> Vec<usize> {
        let mut out = Vec::new();
        Self::walk(&self.root, &mut out);
        out
    }

    fn walk(slot: &Option<Box<Node>>, out: &mut Vec<usize>) {
        if let Some(node) = slot {
            Self::walk(&node.left, out);
            out.push(node.rid);
            Self::walk(&node.right, out);
        }
    }

    pub fn clear(&mut self) {
        self.root = None;
    }
}

/// Checked insert that converts the tree's plain duplicate signal into the
/// table-facing `StorageError`.
pub fn checked_insert(
    index: &mut OrderedIndex,
    table: &str,
    key: IndexKey,
    rid: usize,
) -> Result<(), StorageError> {
    let display = match &key {
        IndexKey::Integer(n) => n.to_string(),
        IndexKey::Float(n) => n.to_string(),
        IndexKey::Text(text) => text.clone(),
    };
    index.insert(key, rid).map_err(|_| StorageError::DuplicateKey {
        table: table.to_string(),
        key: display,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_order_is_ascending() {
        let mut index = OrderedIndex::new();
        for (key, rid) in [(5, 0), (1, 1), (3, 2), (9, 3), (2, 4)] {
            index.insert(IndexKey::Integer(key), rid).unwrap();
        }
        let rids = index.iter_in_order();
        let keys: Vec<i32> = rids
            .iter()
            .map(|rid| match rid {
                0 => 5,
                1 => 1,
                2 => 3,
                3 => 9,
                4 => 2,
                _ => unreachable!(),
            })
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn rejects_duplicate_key() {
        let mut index = OrderedIndex::new();
        index.insert(IndexKey::Integer(1), 0).unwrap();
        assert!(index.insert(IndexKey::Integer(1), 1).is_err());
    }

    #[test]
    fn delete_removes_key_and_preserves_others() {
        let mut index = OrderedIndex::new();
        for key in [5, 1, 3, 9, 2] {
            index.insert(IndexKey::Integer(key), key as usize).unwrap();
        }
        index.delete(&IndexKey::Integer(5));
        assert!(!index.contains(&IndexKey::Integer(5)));
        let mut remaining: Vec<usize> = index.iter_in_order();
        remaining.sort();
        assert_eq!(remaining, vec![1, 2, 3, 9]);
    }

    #[test]
    fn delete_node_with_two_children_keeps_bst_order() {
        let mut index = OrderedIndex::new();
        for key in [10, 5, 15, 3, 7, 12, 20] {
            index.insert(IndexKey::Integer(key), key as usize).unwrap();
        }
        index.delete(&IndexKey::Integer(10));
        let rids = index.iter_in_order();
        let mut sorted = rids.clone();
        sorted.sort();
        assert_eq!(rids, sorted);
        assert_eq!(rids.len(), 6);
    }

    #[test]
    fn float_keys_order_via_total_cmp() {
        let mut index = OrderedIndex::new();
        index.insert(IndexKey::Float(1.5), 0).unwrap();
        index.insert(IndexKey::Float(-2.25), 1).unwrap();
        index.insert(IndexKey::Float(0.0), 2).unwrap();
        assert_eq!(index.iter_in_order(), vec![1, 2, 0]);
    }
}
