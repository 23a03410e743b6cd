use crate::document::{Document, Value, get_path, get_path_mut, set_path, unset_path};
use crate::errors::DbError;
use crate::types::ID_FIELD;

use super::types::{PullCondition, UpdateDoc, UpdateOp};

/// Applies `update` to a copy of `doc` and returns the copy.
///
/// # Errors
/// Fails on the first operator that hits an incompatible field; `doc` itself is never
/// modified.
pub fn apply_update(doc: &Document, update: &UpdateDoc) -> Result<Document, DbError> {
    match update {
        UpdateDoc::Replace(fields) => {
            let mut out = Document::new();
            if let Some(id) = doc.get(ID_FIELD) {
                out.insert(ID_FIELD, id.clone());
            }
            for (k, v) in fields.iter().filter(|(k, _)| k.as_str() != ID_FIELD) {
                out.insert(k.clone(), v.clone());
            }
            Ok(out)
        }
        UpdateDoc::Operators(ops) => {
            let mut out = doc.clone();
            for op in ops {
                apply_op(&mut out, op)?;
            }
            Ok(out)
        }
    }
}

fn apply_op(doc: &mut Document, op: &UpdateOp) -> Result<(), DbError> {
    match op {
        UpdateOp::Set(pairs) => {
            for (path, v) in pairs {
                set_path(doc, path, v.clone());
            }
        }
        UpdateOp::Unset(paths) => {
            for path in paths {
                unset_path(doc, path);
            }
        }
        UpdateOp::Inc(pairs) => {
            for (path, amount) in pairs {
                let current = match get_path(doc, path) {
                    None => 0.0,
                    Some(Value::Number(n)) => *n,
                    Some(_) => {
                        return Err(DbError::TypeMismatch(format!(
                            "Cannot apply $inc to non-numeric field: {path}"
                        )));
                    }
                };
                set_path(doc, path, Value::Number(current + amount));
            }
        }
        UpdateOp::Push(pairs) => {
            for (path, v) in pairs {
                append(doc, path, v, op.name(), false)?;
            }
        }
        UpdateOp::AddToSet(pairs) => {
            for (path, v) in pairs {
                append(doc, path, v, op.name(), true)?;
            }
        }
        UpdateOp::Pull(conds) => {
            for (path, cond) in conds {
                let Some(Value::Array(items)) = get_path_mut(doc, path) else {
                    return Err(DbError::TypeMismatch(format!(
                        "Cannot apply $pull to non-array field: {path}"
                    )));
                };
                if let PullCondition::Equals(target) = cond {
                    items.retain(|item| item != target);
                }
            }
        }
    }
    Ok(())
}

fn append(doc: &mut Document, path: &str, v: &Value, op: &str, unique: bool) -> Result<(), DbError> {
    match get_path_mut(doc, path) {
        Some(Value::Array(items)) => {
            if !unique || !items.contains(v) {
                items.push(v.clone());
            }
        }
        Some(_) => {
            return Err(DbError::TypeMismatch(format!(
                "Cannot apply {op} to non-array field: {path}"
            )));
        }
        None => set_path(doc, path, Value::Array(vec![v.clone()])),
    }
    Ok(())
}
