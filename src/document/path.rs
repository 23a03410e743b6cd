//! Dotted-path addressing into documents.

use super::value::{Document, Value};

/// Resolves `path` inside `doc`. Returns `None` (absent) as soon as an intermediate
/// segment is missing, null, or not a document.
#[must_use]
pub fn get_path<'a>(doc: &'a Document, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    let mut cur = doc;
    let mut parts = path.split('.').peekable();
    while let Some(part) = parts.next() {
        let v = cur.get(part)?;
        if parts.peek().is_none() {
            return Some(v);
        }
        match v {
            Value::Document(d) => cur = d,
            _ => return None,
        }
    }
    None
}

/// Splits `path` into its parent segments and the final field name.
fn split_last(path: &str) -> (Vec<&str>, &str) {
    let mut parts: Vec<&str> = path.split('.').collect();
    let last = parts.pop().unwrap_or_default();
    (parts, last)
}

/// Assigns `value` at `path`, creating intermediate documents for missing segments and
/// replacing non-document intermediates.
pub fn set_path(doc: &mut Document, path: &str, value: Value) {
    let (parents, last) = split_last(path);
    let mut cur = doc;
    for seg in parents {
        cur = cur.subdocument_mut(seg);
    }
    cur.insert(last, value);
}

/// Removes the value at `path`. No-op when any intermediate segment is missing or not a
/// document. Returns the removed value.
pub fn unset_path(doc: &mut Document, path: &str) -> Option<Value> {
    let (parents, last) = split_last(path);
    let mut cur = doc;
    for seg in parents {
        match cur.get_mut(seg) {
            Some(Value::Document(d)) => cur = d,
            _ => return None,
        }
    }
    cur.remove(last)
}

/// Mutable access to the value at `path`, if it exists.
pub fn get_path_mut<'a>(doc: &'a mut Document, path: &str) -> Option<&'a mut Value> {
    let (parents, last) = split_last(path);
    let mut cur = doc;
    for seg in parents {
        match cur.get_mut(seg) {
            Some(Value::Document(d)) => cur = d,
            _ => return None,
        }
    }
    cur.get_mut(last)
}
