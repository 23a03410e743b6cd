use litedoc::collection::Collection;
use litedoc::query::{FindOptions, SortSpec};
use litedoc::types::{DocumentId, IdGenerator};
use litedoc::{DbError, Document, Value};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

struct Seq(AtomicUsize);

impl IdGenerator for Seq {
    fn generate(&self) -> DocumentId {
        format!("gen-{}", self.0.fetch_add(1, Ordering::Relaxed))
    }
}

fn people() -> Collection {
    let mut c = Collection::with_id_generator("people", Arc::new(Seq(AtomicUsize::new(0))));
    for p in [
        json!({"name": "cara", "age": 30, "city": "Oslo"}),
        json!({"name": "abe", "age": 25, "city": "Rome"}),
        json!({"name": "Bea", "age": 30}),
        json!({"name": "dan", "age": 41, "city": "Oslo"}),
    ] {
        c.insert(p).unwrap();
    }
    c
}

fn names(docs: &[Document]) -> Vec<&str> {
    docs.iter().filter_map(|d| d.get("name").and_then(Value::as_str)).collect()
}

#[test]
fn test_insert_assigns_ids() {
    let c = people();
    assert_eq!(c.len(), 4);
    assert_eq!(c.get("gen-2").and_then(|d| d.get("name")), Some(&Value::from("Bea")));
}

#[test]
fn test_duplicate_id_leaves_store_unchanged() {
    let mut c = people();
    let err = c.insert(json!({"_id": "gen-0", "name": "copy"})).unwrap_err();
    assert!(matches!(err, DbError::DuplicateId(ref id) if id == "gen-0"));
    assert_eq!(c.len(), 4);
    assert_eq!(c.get("gen-0").and_then(|d| d.get("name")), Some(&Value::from("cara")));
}

#[test]
fn test_find_sort_skip_limit() {
    let c = people();
    let opts = FindOptions { sort: vec![SortSpec::desc("age"), SortSpec::asc("name")], skip: Some(1), limit: Some(2) };
    let out = c.find(&Value::Null, &opts).unwrap();
    assert_eq!(names(&out), vec!["Bea", "cara"]);
}

#[test]
fn test_sort_puts_missing_last_ascending() {
    let c = people();
    let asc = c.find(&Value::Null, &FindOptions { sort: vec![SortSpec::asc("city")], ..FindOptions::default() }).unwrap();
    assert_eq!(names(&asc).last(), Some(&"Bea"));
    let desc = c.find(&Value::Null, &FindOptions { sort: vec![SortSpec::desc("city")], ..FindOptions::default() }).unwrap();
    assert_eq!(names(&desc).first(), Some(&"Bea"));
}

#[test]
fn test_string_sort_ignores_case_first() {
    let c = people();
    let out = c.find(&Value::Null, &FindOptions { sort: vec![SortSpec::asc("name")], ..FindOptions::default() }).unwrap();
    assert_eq!(names(&out), vec!["abe", "Bea", "cara", "dan"]);
}

#[test]
fn test_find_one_and_count() {
    let c = people();
    let q = Value::from(json!({"city": "Oslo"}));
    assert_eq!(c.count(&q).unwrap(), 2);
    assert_eq!(c.find_one(&q).unwrap().and_then(|d| d.id().map(str::to_owned)), Some("gen-0".into()));
    assert!(c.find_one(&Value::from(json!({"city": "Paris"}))).unwrap().is_none());
}

#[test]
fn test_update_reports_matched_and_modified() {
    let mut c = people();
    let report = c.update(&Value::from(json!({"age": 30})), &Value::from(json!({"$set": {"city": "Oslo"}}))).unwrap();
    assert_eq!((report.matched, report.modified), (2, 1));
    let report = c.update_one(&Value::from(json!({"city": "Oslo"})), &Value::from(json!({"$inc": {"age": 1}}))).unwrap();
    assert_eq!((report.matched, report.modified), (1, 1));
    assert_eq!(c.get("gen-0").and_then(|d| d.get("age")), Some(&Value::from(31)));
}

#[test]
fn test_replacement_update_keeps_id() {
    let mut c = people();
    c.update_one(&Value::from(json!({"name": "dan"})), &Value::from(json!({"name": "daniel"}))).unwrap();
    assert_eq!(c.get("gen-3"), Some(&Document::from_json(json!({"_id": "gen-3", "name": "daniel"})).unwrap()));
}

#[test]
fn test_delete_one_and_many() {
    let mut c = people();
    assert_eq!(c.delete_one(&Value::from(json!({"city": "Oslo"}))).unwrap().deleted, 1);
    assert!(c.get("gen-0").is_none());
    assert_eq!(c.delete(&Value::from(json!({"age": {"$gte": 30}}))).unwrap().deleted, 2);
    assert_eq!(names(&c.find(&Value::Null, &FindOptions::default()).unwrap()), vec!["abe"]);
}

#[test]
fn test_invalid_query_is_reported() {
    let mut c = people();
    let bad = Value::from(json!({"age": {"$between": [1, 2]}}));
    assert!(matches!(c.find(&bad, &FindOptions::default()), Err(DbError::UnknownOperator(_))));
    assert!(matches!(c.delete(&bad), Err(DbError::UnknownOperator(_))));
    assert_eq!(c.len(), 4);
}

#[test]
fn test_sort_breaks_ties_with_every_key() {
    let mut c = Collection::new("wide");
    let mut a = serde_json::Map::new();
    let mut b = serde_json::Map::new();
    let mut spec = serde_json::Map::new();
    for i in 0..8 {
        a.insert(format!("k{i}"), json!(0));
        b.insert(format!("k{i}"), json!(0));
        spec.insert(format!("k{i}"), json!(1));
    }
    a.insert("_id".into(), json!("a"));
    a.insert("k8".into(), json!(2));
    b.insert("_id".into(), json!("b"));
    b.insert("k8".into(), json!(1));
    spec.insert("k8".into(), json!(1));
    c.insert(serde_json::Value::Object(a)).unwrap();
    c.insert(serde_json::Value::Object(b)).unwrap();

    let spec = serde_json::Value::Object(spec);
    let opts = FindOptions::try_from(&Value::from(json!({ "sort": spec.clone() }))).unwrap();
    assert_eq!(opts.sort.len(), 9);
    let found = c.find(&Value::Null, &opts).unwrap();
    let ids: Vec<&str> = found.iter().filter_map(Document::id).collect();
    assert_eq!(ids, vec!["b", "a"]);

    let staged = c.aggregate(&Value::from(json!([{ "$sort": spec }]))).unwrap();
    let ids: Vec<&str> = staged.iter().filter_map(Document::id).collect();
    assert_eq!(ids, vec!["b", "a"]);
}
