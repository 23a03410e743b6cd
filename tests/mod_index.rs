use litedoc::collection::Collection;
use litedoc::query::FindOptions;
use litedoc::utils::devlog;
use litedoc::{DbError, Value};
use serde_json::json;

fn users() -> Collection {
    let mut c = Collection::new("users");
    for (i, (role, n)) in [("admin", 1), ("user", 2), ("user", 3), ("guest", 4)].into_iter().enumerate() {
        c.insert(json!({"_id": format!("u{i}"), "role": role, "n": n, "active": n % 2 == 0})).unwrap();
    }
    c
}

fn ids(c: &Collection, query: serde_json::Value) -> Vec<String> {
    c.find(&Value::from(query), &FindOptions::default())
        .unwrap()
        .iter()
        .filter_map(|d| d.id().map(str::to_owned))
        .collect()
}

fn bucket(c: &Collection, field: &str, v: serde_json::Value) -> Vec<String> {
    let mut out: Vec<String> = c
        .indexes()
        .get(field)
        .and_then(|idx| idx.bucket(&Value::from(v)))
        .map(|set| set.iter().cloned().collect())
        .unwrap_or_default();
    out.sort();
    out
}

#[test]
fn test_indexed_find_matches_full_scan() {
    let plain = users();
    let queries = [
        json!({"role": "user"}),
        json!({"role": {"$eq": "user"}}),
        json!({"role": "user", "n": {"$gt": 2}}),
        json!({"role": {"$in": ["admin", "guest"]}}),
        json!({"n": 1, "role": "admin"}),
        json!({"role": "nobody"}),
        json!({"n": 3}),
        json!({"n": {"$eq": 3.0}}),
        json!({"n": {"$eq": 9}}),
        json!({"active": true}),
        json!({"active": {"$eq": false}, "role": "user"}),
    ];
    for field in ["role", "n", "active"] {
        let mut indexed = users();
        indexed.create_index(field).unwrap();
        for q in &queries {
            assert_eq!(ids(&plain, q.clone()), ids(&indexed, q.clone()), "index on {field}, query {q}");
        }
    }
}

#[test]
fn test_operator_equality_uses_the_index() {
    let mut c = users();
    c.create_index("n").unwrap();
    c.create_index("active").unwrap();
    let cap = devlog::capture();
    assert_eq!(ids(&c, json!({"n": {"$eq": 2}})), vec!["u1"]);
    assert_eq!(ids(&c, json!({"active": {"$eq": true}})), vec!["u1", "u3"]);
    assert_eq!(ids(&c, json!({"n": {"$gte": 2}})).len(), 3);
    let used: Vec<serde_json::Value> = cap
        .take()
        .iter()
        .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap()["used_index"].clone())
        .collect();
    assert_eq!(used, vec![json!(true), json!(true), json!(false)]);
}

#[test]
fn test_find_reports_index_use() {
    let mut c = users();
    c.create_index("role").unwrap();
    let cap = devlog::capture();
    ids(&c, json!({"role": "user"}));
    ids(&c, json!({"n": 2}));
    let lines: Vec<serde_json::Value> =
        cap.take().iter().map(|l| serde_json::from_str(l).unwrap()).collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["used_index"], json!(true));
    assert_eq!(lines[0]["result_count"], json!(2));
    assert_eq!(lines[1]["used_index"], json!(false));
}

#[test]
fn test_buckets_follow_mutations() {
    let mut c = users();
    c.create_index("role").unwrap();
    c.insert(json!({"_id": "u9", "role": "user"})).unwrap();
    c.insert(json!({"_id": "u10", "role": null})).unwrap();
    assert_eq!(bucket(&c, "role", json!("user")), vec!["u1", "u2", "u9"]);

    c.update(&Value::from(json!({"_id": "u1"})), &Value::from(json!({"$set": {"role": "admin"}}))).unwrap();
    assert_eq!(bucket(&c, "role", json!("admin")), vec!["u0", "u1"]);
    assert_eq!(bucket(&c, "role", json!("user")), vec!["u2", "u9"]);

    c.update(&Value::from(json!({"_id": "u2"})), &Value::from(json!({"$unset": {"role": 1}}))).unwrap();
    c.delete(&Value::from(json!({"role": "user"}))).unwrap();
    assert!(bucket(&c, "role", json!("user")).is_empty());
    assert!(!c.indexes().get("role").unwrap().map.keys().any(|k| matches!(k, litedoc::index::IndexKey::Str(s) if s == "user")));
    assert_eq!(ids(&c, json!({"role": "admin"})), vec!["u0", "u1"]);
}

#[test]
fn test_index_admin() {
    let mut c = users();
    assert!(matches!(c.create_index(""), Err(DbError::InvalidArgument(_))));
    assert!(matches!(c.create_index("a.b"), Err(DbError::InvalidArgument(_))));
    c.create_index("role").unwrap();
    c.create_index("n").unwrap();
    assert_eq!(c.index_fields(), vec!["n", "role"]);
    let stats = c.index_stats("role").unwrap();
    assert_eq!((stats.keys, stats.entries), (3, 4));
    assert!(c.drop_index("n"));
    assert!(!c.drop_index("n"));
    assert!(c.index_stats("n").is_none());
}
