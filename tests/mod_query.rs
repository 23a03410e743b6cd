use litedoc::query::{Filter, FindOptions, Order, SortSpec, matches, parse_filter_json, parse_find_options_json};
use litedoc::{DbError, Document, Value};
use serde_json::json;

fn doc(v: serde_json::Value) -> Document {
    Document::from_json(v).unwrap()
}

fn q(v: serde_json::Value) -> Value {
    Value::from(v)
}

#[test]
fn test_implicit_conjunction_across_keys() {
    let d = doc(json!({"name": "ann", "age": 31, "addr": {"city": "Oslo"}}));
    assert!(matches(&d, &q(json!({"name": "ann", "addr.city": "Oslo"}))).unwrap());
    assert!(!matches(&d, &q(json!({"name": "ann", "addr.city": "Rome"}))).unwrap());
    assert!(matches(&d, &q(json!({"age": {"$gt": 30, "$lte": 31}}))).unwrap());
    assert!(!matches(&d, &q(json!({"age": {"$gt": 30, "$lt": 31}}))).unwrap());
}

#[test]
fn test_nested_combinators() {
    let d = doc(json!({"a": 1, "b": 2}));
    let query = q(json!({"$or": [{"a": 5}, {"$and": [{"a": 1}, {"$nor": [{"b": 3}]}]}]}));
    assert!(matches(&d, &query).unwrap());
    assert!(!matches(&d, &q(json!({"$nor": [{"a": 1}]}))).unwrap());
}

#[test]
fn test_exists_distinguishes_null_from_absent() {
    let d = doc(json!({"a": null}));
    assert!(matches(&d, &q(json!({"a": {"$exists": true}}))).unwrap());
    assert!(matches(&d, &q(json!({"b": {"$exists": false}}))).unwrap());
    assert!(!matches(&d, &q(json!({"b": null}))).unwrap());
}

#[test]
fn test_path_stops_at_non_documents() {
    let d = doc(json!({"a": 5, "b": null}));
    assert!(!matches(&d, &q(json!({"a.x": {"$exists": true}}))).unwrap());
    assert!(!matches(&d, &q(json!({"b.x": {"$exists": true}}))).unwrap());
}

#[test]
fn test_path_longer_than_document_is_absent() {
    let mut nested = json!(1);
    for _ in 0..32 {
        nested = json!({ "a": nested });
    }
    let d = doc(nested);
    let too_deep = vec!["a"; 33].join(".");
    let exact = vec!["a"; 32].join(".");
    assert!(!matches(&d, &q(json!({ too_deep.clone(): {"$exists": true} }))).unwrap());
    assert!(matches(&d, &q(json!({ too_deep: {"$exists": false} }))).unwrap());
    assert!(matches(&d, &q(json!({ exact: 1 }))).unwrap());
}

#[test]
fn test_unknown_operators_are_errors() {
    let d = doc(json!({"a": 1}));
    assert!(matches!(matches(&d, &q(json!({"a": {"$near": 1}}))), Err(DbError::UnknownOperator(ref op)) if op == "$near"));
    assert!(matches!(matches(&d, &q(json!({"$xor": []}))), Err(DbError::UnknownOperator(_))));
    assert!(matches!(matches(&d, &q(json!({"a": {"$in": 1}}))), Err(DbError::TypeMismatch(_))));
}

#[test]
fn test_string_ordering_is_locale_style() {
    let d = doc(json!({"s": "banana"}));
    assert!(matches(&d, &q(json!({"s": {"$gt": "Apple"}}))).unwrap());
    assert!(matches(&d, &q(json!({"s": {"$lt": "Cherry"}}))).unwrap());
}

#[cfg(feature = "regex")]
#[test]
fn test_regex_only_matches_strings() {
    let f = parse_filter_json(r#"{"v": {"$regex": "^1"}}"#).unwrap();
    assert!(matches!(&f, Filter::Regex { .. }));
    assert!(litedoc::query::eval_filter(&doc(json!({"v": "12"})), &f));
    assert!(!litedoc::query::eval_filter(&doc(json!({"v": 12})), &f));
    assert!(matches!(parse_filter_json(r#"{"v": {"$regex": "("}}"#), Err(DbError::QueryError(_))));
}

#[test]
fn test_find_options_parse() {
    let opts = parse_find_options_json(r#"{"sort": {"a": 1, "b": -1}, "skip": 2, "limit": 5}"#).unwrap();
    assert_eq!(
        opts,
        FindOptions { sort: vec![SortSpec::asc("a"), SortSpec::desc("b")], skip: Some(2), limit: Some(5) }
    );
    assert_eq!(opts.sort[1].order, Order::Desc);
    assert!(parse_find_options_json(r#"{"projection": {}}"#).is_err());
}

#[test]
fn test_null_query_matches_everything() {
    assert!(matches(&doc(json!({"a": 1})), &Value::Null).unwrap());
    assert!(matches!(Filter::try_from(&Value::from(3)), Err(DbError::InvalidArgument(_))));
}
