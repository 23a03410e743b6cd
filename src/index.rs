use crate::document::{Document, Value};
use crate::types::DocumentId;
use ordered_float::OrderedFloat;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub keys: usize,
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub build_time_ms: u128,
}

/// Scalar index key. Null, arrays and documents are never indexed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndexKey {
    Str(String),
    F64(OrderedFloat<f64>),
    Bool(bool),
}

#[must_use]
pub fn key_from_value(v: &Value) -> Option<IndexKey> {
    match v {
        Value::String(s) => Some(IndexKey::Str(s.clone())),
        Value::Number(n) => Some(IndexKey::F64(OrderedFloat(*n))),
        Value::Bool(b) => Some(IndexKey::Bool(*b)),
        Value::Null | Value::Array(_) | Value::Document(_) => None,
    }
}

/// Equality index over one top-level field.
#[derive(Debug)]
pub struct HashIndex {
    pub field: String,
    pub map: HashMap<IndexKey, HashSet<DocumentId>>,
    build_time_ms: u128,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl HashIndex {
    #[must_use]
    pub fn new(field: String) -> Self {
        Self {
            field,
            map: HashMap::new(),
            build_time_ms: 0,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    fn key_of(&self, doc: &Document) -> Option<IndexKey> {
        doc.get(&self.field).and_then(key_from_value)
    }

    pub fn insert(&mut self, doc: &Document, id: &str) {
        if let Some(k) = self.key_of(doc) {
            self.map.entry(k).or_default().insert(id.to_string());
        }
    }

    pub fn remove(&mut self, doc: &Document, id: &str) {
        if let Some(k) = self.key_of(doc)
            && let Some(set) = self.map.get_mut(&k)
        {
            set.remove(id);
            if set.is_empty() {
                self.map.remove(&k);
            }
        }
    }

    /// Ids stored under `v`. `None` when `v` is not an indexable scalar; an empty
    /// vector when no document holds it.
    pub fn lookup_eq(&self, v: &Value) -> Option<Vec<DocumentId>> {
        let k = key_from_value(v)?;
        if let Some(set) = self.map.get(&k) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            Some(set.iter().cloned().collect())
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            Some(Vec::new())
        }
    }

    /// Bucket contents for `v`, without touching the hit counters.
    #[must_use]
    pub fn bucket(&self, v: &Value) -> Option<&HashSet<DocumentId>> {
        key_from_value(v).and_then(|k| self.map.get(&k))
    }

    #[must_use]
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            keys: self.map.len(),
            entries: self.map.values().map(HashSet::len).sum(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            build_time_ms: self.build_time_ms,
        }
    }
}

#[derive(Debug, Default)]
pub struct IndexManager {
    pub indexes: HashMap<String, HashIndex>, // key: field name
}

impl IndexManager {
    #[must_use]
    pub fn new() -> Self {
        Self { indexes: HashMap::new() }
    }

    /// (Re)builds the index on `field` from `docs`.
    pub fn create_index<'a>(&mut self, field: &str, docs: impl IntoIterator<Item = (&'a str, &'a Document)>) {
        let start = Instant::now();
        let mut idx = HashIndex::new(field.to_string());
        for (id, doc) in docs {
            idx.insert(doc, id);
        }
        idx.build_time_ms = start.elapsed().as_millis();
        self.indexes.insert(field.to_string(), idx);
    }

    pub fn drop_index(&mut self, field: &str) -> bool {
        self.indexes.remove(field).is_some()
    }

    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.indexes.contains_key(field)
    }

    /// Indexed field names, sorted.
    #[must_use]
    pub fn fields(&self) -> Vec<String> {
        let mut out: Vec<String> = self.indexes.keys().cloned().collect();
        out.sort();
        out
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&HashIndex> {
        self.indexes.get(field)
    }

    #[must_use]
    pub fn stats(&self, field: &str) -> Option<IndexStats> {
        self.indexes.get(field).map(HashIndex::stats)
    }

    pub fn insert_all(&mut self, doc: &Document, id: &str) {
        for idx in self.indexes.values_mut() {
            idx.insert(doc, id);
        }
    }

    pub fn remove_all(&mut self, doc: &Document, id: &str) {
        for idx in self.indexes.values_mut() {
            idx.remove(doc, id);
        }
    }

    pub fn lookup_eq(&self, field: &str, v: &Value) -> Option<Vec<DocumentId>> {
        self.indexes.get(field)?.lookup_eq(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(v: serde_json::Value) -> Document {
        Document::from_json(v).unwrap()
    }

    #[test]
    fn buckets_follow_insert_and_remove() {
        let a = doc(json!({"k": "x"}));
        let b = doc(json!({"k": "x"}));
        let mut mgr = IndexManager::new();
        mgr.create_index("k", [("a", &a), ("b", &b)]);
        assert_eq!(mgr.stats("k").map(|s| (s.keys, s.entries)), Some((1, 2)));
        mgr.remove_all(&a, "a");
        mgr.remove_all(&b, "b");
        assert!(mgr.get("k").unwrap().map.is_empty());
    }

    #[test]
    fn null_and_composites_are_not_indexed() {
        let mut idx = HashIndex::new("k".into());
        idx.insert(&doc(json!({"k": null})), "1");
        idx.insert(&doc(json!({"k": [1]})), "2");
        idx.insert(&doc(json!({"other": 1})), "3");
        assert!(idx.map.is_empty());
        assert!(idx.lookup_eq(&Value::Null).is_none());
    }

    #[test]
    fn zero_signs_share_a_bucket() {
        let mut idx = HashIndex::new("k".into());
        idx.insert(&doc(json!({"k": -0.0})), "1");
        assert_eq!(idx.lookup_eq(&Value::from(0.0)), Some(vec!["1".to_string()]));
        assert_eq!(idx.lookup_eq(&Value::from(5)), Some(vec![]));
        let stats = idx.stats();
        assert_eq!((stats.hits, stats.misses), (1, 1));
    }
}
