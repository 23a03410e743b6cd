use std::cmp::Ordering;

use crate::document::{Document, Value, compare_values, get_path, sort_cmp_opt};

use super::types::{CmpOp, Filter, Order, SortSpec};

/// Tests `doc` against a parsed filter. Evaluation never fails; every error is
/// reported when the filter is parsed.
#[must_use]
pub fn eval_filter(doc: &Document, filter: &Filter) -> bool {
    match filter {
        Filter::And(fs) => fs.iter().all(|f| eval_filter(doc, f)),
        Filter::Or(fs) => fs.iter().any(|f| eval_filter(doc, f)),
        Filter::Nor(fs) => !fs.iter().any(|f| eval_filter(doc, f)),
        Filter::Exists { path, exists } => get_path(doc, path).is_some() == *exists,
        Filter::In { path, values } => get_path(doc, path).is_some_and(|v| is_in_set(v, values)),
        Filter::Nin { path, values } => !get_path(doc, path).is_some_and(|v| is_in_set(v, values)),
        Filter::Cmp { path, op, value } => {
            let found = get_path(doc, path);
            match op {
                CmpOp::Eq => found.is_some_and(|v| strict_eq(v, value)),
                CmpOp::Ne => !found.is_some_and(|v| strict_eq(v, value)),
                CmpOp::Gt => ordering(found, value) == Some(Ordering::Greater),
                CmpOp::Gte => matches!(ordering(found, value), Some(Ordering::Greater | Ordering::Equal)),
                CmpOp::Lt => ordering(found, value) == Some(Ordering::Less),
                CmpOp::Lte => matches!(ordering(found, value), Some(Ordering::Less | Ordering::Equal)),
            }
        }
        #[cfg(feature = "regex")]
        Filter::Regex { path, regex } => {
            matches!(get_path(doc, path), Some(Value::String(s)) if regex.is_match(s))
        }
    }
}

fn ordering(found: Option<&Value>, literal: &Value) -> Option<Ordering> {
    found.and_then(|v| compare_values(v, literal))
}

/// Equality with no type coercion. Numbers follow IEEE rules so NaN never matches.
fn strict_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x == y,
        _ => a == b,
    }
}

/// Array values match when any element is in the set.
fn is_in_set(v: &Value, set: &[Value]) -> bool {
    match v {
        Value::Array(items) => items.iter().any(|item| set.contains(item)),
        _ => set.contains(v),
    }
}

/// Multi-key document comparison for sorting. Fields are nested paths; absent values
/// sort after present ones ascending and before them descending.
#[must_use]
pub fn compare_docs(a: &Document, b: &Document, sort: &[SortSpec]) -> Ordering {
    for s in sort {
        let ord = sort_cmp_opt(get_path(a, &s.field), get_path(b, &s.field));
        if ord != Ordering::Equal {
            return if s.order == Order::Asc { ord } else { ord.reverse() };
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::parse_filter_json;
    use serde_json::json;

    fn doc(v: serde_json::Value) -> Document {
        Document::from_json(v).unwrap()
    }

    fn hit(d: &Document, q: &str) -> bool {
        eval_filter(d, &parse_filter_json(q).unwrap())
    }

    #[test]
    fn null_matches_null_but_not_absent() {
        let with_null = doc(json!({"a": null}));
        let without = doc(json!({"b": 1}));
        assert!(hit(&with_null, r#"{"a": null}"#));
        assert!(!hit(&without, r#"{"a": null}"#));
        assert!(hit(&without, r#"{"a": {"$ne": 1}}"#));
        assert!(!hit(&without, r#"{"a": {"$gte": 0}}"#));
    }

    #[test]
    fn combinators_on_empty_lists() {
        let d = doc(json!({"x": 1}));
        assert!(hit(&d, r#"{"$and": []}"#));
        assert!(!hit(&d, r#"{"$or": []}"#));
        assert!(hit(&d, r#"{"$nor": []}"#));
        assert!(hit(&d, r#"{"$nor": [{"x": 2}, {"y": 1}]}"#));
    }

    #[test]
    fn membership_over_arrays() {
        let d = doc(json!({"tags": ["a", "b"], "n": 3}));
        assert!(hit(&d, r#"{"tags": {"$in": ["b", "z"]}}"#));
        assert!(!hit(&d, r#"{"tags": {"$nin": ["b"]}}"#));
        assert!(hit(&d, r#"{"missing": {"$nin": [1]}}"#));
        assert!(!hit(&d, r#"{"missing": {"$in": [1]}}"#));
        assert!(hit(&d, r#"{"n": {"$in": [1, 3]}}"#));
    }

    #[test]
    fn array_literal_is_deep_equality() {
        let d = doc(json!({"tags": ["a", "b"]}));
        assert!(hit(&d, r#"{"tags": ["a", "b"]}"#));
        assert!(!hit(&d, r#"{"tags": ["b", "a"]}"#));
        assert!(!hit(&d, r#"{"tags": "a"}"#));
    }

    #[cfg(feature = "regex")]
    #[test]
    fn regex_only_matches_strings() {
        let d = doc(json!({"name": "Alice", "n": 12}));
        assert!(hit(&d, r#"{"name": {"$regex": "^Al"}}"#));
        assert!(!hit(&d, r#"{"n": {"$regex": "1"}}"#));
    }

    #[test]
    fn sort_places_absent_last_ascending() {
        let a = doc(json!({"k": 1}));
        let b = doc(json!({}));
        assert_eq!(compare_docs(&a, &b, &[SortSpec::asc("k")]), Ordering::Less);
        assert_eq!(compare_docs(&a, &b, &[SortSpec::desc("k")]), Ordering::Greater);
    }
}
