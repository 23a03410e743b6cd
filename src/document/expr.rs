use super::path::get_path;
use super::value::{Document, Value};

/// Prefix marking a string expression as a field reference (`"$author"`).
pub const FIELD_REF_SIGIL: char = '$';

/// Evaluates a projection/grouping expression against `doc`.
///
/// `"$a.b"` resolves the path `a.b` (absent resolves to null), a document evaluates
/// each of its values, and any other literal is returned unchanged.
#[must_use]
pub fn expression_eval(expr: &Value, doc: &Document) -> Value {
    match expr {
        Value::String(s) => match s.strip_prefix(FIELD_REF_SIGIL) {
            Some(path) => get_path(doc, path).cloned().unwrap_or(Value::Null),
            None => expr.clone(),
        },
        Value::Document(spec) => Value::Document(
            spec.iter().map(|(k, v)| (k.clone(), expression_eval(v, doc))).collect(),
        ),
        _ => expr.clone(),
    }
}
