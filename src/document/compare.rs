use std::cmp::Ordering;
use std::fmt::Write;

use super::value::{Document, Value};

/// Ordering used by `$gt`/`$gte`/`$lt`/`$lte` and by `$max`/`$min`.
///
/// Same-kind numbers use IEEE ordering and strings use [`locale_cmp`]. Across kinds,
/// null, booleans and numbers coerce to numbers and a string facing one of those is
/// parsed as a number. Anything involving an array or a document has no ordering.
#[must_use]
pub fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::String(x), Value::String(y)) => Some(locale_cmp(x, y)),
        (Value::Array(_) | Value::Document(_), _) | (_, Value::Array(_) | Value::Document(_)) => {
            None
        }
        _ => coerce_number(a)?.partial_cmp(&coerce_number(b)?),
    }
}

fn coerce_number(v: &Value) -> Option<f64> {
    match v {
        Value::Null => Some(0.0),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => Some(*n),
        Value::String(s) => {
            let t = s.trim();
            if t.is_empty() { Some(0.0) } else { Some(t.parse::<f64>().unwrap_or(f64::NAN)) }
        }
        Value::Array(_) | Value::Document(_) => None,
    }
}

/// Locale-style string order: case-insensitive first, lowercase before uppercase on
/// ties, code points last.
#[must_use]
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let folded = a.chars().flat_map(char::to_lowercase).cmp(b.chars().flat_map(char::to_lowercase));
    if folded != Ordering::Equal {
        return folded;
    }
    for (x, y) in a.chars().zip(b.chars()) {
        if x != y {
            match (x.is_lowercase(), y.is_lowercase()) {
                (true, false) => return Ordering::Less,
                (false, true) => return Ordering::Greater,
                _ => return x.cmp(&y),
            }
        }
    }
    a.len().cmp(&b.len())
}

const fn type_rank(v: &Value) -> u8 {
    match v {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Document(_) => 5,
    }
}

/// Total order used for sorting. Kinds rank null < bool < number < string < array <
/// document; within a kind the natural order applies.
#[must_use]
pub fn sort_cmp(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            if x == y { Ordering::Equal } else { x.total_cmp(y) }
        }
        (Value::String(x), Value::String(y)) => locale_cmp(x, y),
        (Value::Array(x), Value::Array(y)) => {
            for (l, r) in x.iter().zip(y) {
                let ord = sort_cmp(l, r);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            x.len().cmp(&y.len())
        }
        (Value::Document(x), Value::Document(y)) => canonical_doc(x).cmp(&canonical_doc(y)),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Sort comparison of two optional values where absent sorts after every value.
#[must_use]
pub fn sort_cmp_opt(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => sort_cmp(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Deterministic rendering of a value with document keys sorted. Two values have the
/// same canonical form exactly when they are deep-equal.
#[must_use]
pub fn canonical(v: &Value) -> String {
    let mut out = String::new();
    write_canonical(v, &mut out);
    out
}

fn canonical_doc(d: &Document) -> String {
    let mut out = String::new();
    write_canonical_doc(d, &mut out);
    out
}

fn write_canonical(v: &Value, out: &mut String) {
    match v {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => {
            let _ = write!(out, "{b}");
        }
        Value::Number(n) => {
            // 0.0 and -0.0 compare equal so they must render the same
            let n = if *n == 0.0 { 0.0 } else { *n };
            let _ = write!(out, "{n}");
        }
        Value::String(s) => {
            let _ = write!(out, "{s:?}");
        }
        Value::Array(a) => {
            out.push('[');
            for (i, item) in a.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::Document(d) => write_canonical_doc(d, out),
    }
}

fn write_canonical_doc(d: &Document, out: &mut String) {
    let mut entries: Vec<(&String, &Value)> = d.iter().collect();
    entries.sort_by(|x, y| x.0.cmp(y.0));
    out.push('{');
    for (i, (k, v)) in entries.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "{k:?}:");
        write_canonical(v, out);
    }
    out.push('}');
}
