use crate::document::{Document, Value};
use crate::errors::DbError;

use super::types::{CmpOp, FindOptions, Filter, LOGICAL_OPERATORS, Order, SortSpec};

impl TryFrom<&Value> for Filter {
    type Error = DbError;

    /// A null query matches everything; any other query must be a document.
    fn try_from(query: &Value) -> Result<Self, Self::Error> {
        match query {
            Value::Null => Ok(Self::all()),
            Value::Document(d) => Self::try_from(d),
            other => Err(DbError::InvalidArgument(format!(
                "query must be a document, got {}",
                other.kind()
            ))),
        }
    }
}

impl TryFrom<&Document> for Filter {
    type Error = DbError;

    fn try_from(query: &Document) -> Result<Self, Self::Error> {
        let mut conjuncts = Vec::with_capacity(query.len());
        for (key, cond) in query.iter() {
            conjuncts.push(parse_entry(key, cond)?);
        }
        Ok(Self::And(conjuncts))
    }
}

fn parse_entry(key: &str, cond: &Value) -> Result<Filter, DbError> {
    if LOGICAL_OPERATORS.contains(&key) {
        let Value::Array(items) = cond else {
            return Err(DbError::InvalidArgument(format!("{key} requires an array of queries")));
        };
        let subs = items
            .iter()
            .map(|item| match item {
                Value::Document(d) => Filter::try_from(d),
                other => Err(DbError::InvalidArgument(format!(
                    "{key} entries must be documents, got {}",
                    other.kind()
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(match key {
            "$and" => Filter::And(subs),
            "$or" => Filter::Or(subs),
            _ => Filter::Nor(subs),
        });
    }
    if key.starts_with('$') {
        return Err(DbError::UnknownOperator(key.to_string()));
    }
    match cond {
        Value::Document(ops) => {
            let mut parsed = Vec::with_capacity(ops.len());
            for (op, arg) in ops.iter() {
                parsed.push(parse_operator(key, op, arg)?);
            }
            if parsed.len() == 1 { Ok(parsed.remove(0)) } else { Ok(Filter::And(parsed)) }
        }
        literal => Ok(Filter::Cmp { path: key.to_string(), op: CmpOp::Eq, value: literal.clone() }),
    }
}

fn parse_operator(path: &str, op: &str, arg: &Value) -> Result<Filter, DbError> {
    let path = path.to_string();
    let cmp = |op: CmpOp| -> Result<Filter, DbError> {
        Ok(Filter::Cmp { path: path.clone(), op, value: arg.clone() })
    };
    match op {
        "$eq" => cmp(CmpOp::Eq),
        "$ne" => cmp(CmpOp::Ne),
        "$gt" => cmp(CmpOp::Gt),
        "$gte" => cmp(CmpOp::Gte),
        "$lt" => cmp(CmpOp::Lt),
        "$lte" => cmp(CmpOp::Lte),
        "$in" | "$nin" => {
            let Value::Array(values) = arg else {
                return Err(DbError::TypeMismatch(format!(
                    "{op} operator requires an array as its query value."
                )));
            };
            let values = values.clone();
            Ok(if op == "$in" {
                Filter::In { path: path.clone(), values }
            } else {
                Filter::Nin { path: path.clone(), values }
            })
        }
        "$exists" => Ok(Filter::Exists { path: path.clone(), exists: arg.is_truthy() }),
        "$regex" => parse_regex(path.clone(), arg),
        other => Err(DbError::UnknownOperator(other.to_string())),
    }
}

#[cfg(feature = "regex")]
fn parse_regex(path: String, arg: &Value) -> Result<Filter, DbError> {
    let Value::String(pattern) = arg else {
        return Err(DbError::TypeMismatch(format!(
            "$regex requires a string pattern, got {}",
            arg.kind()
        )));
    };
    let regex = regex::Regex::new(pattern).map_err(|e| DbError::QueryError(e.to_string()))?;
    Ok(Filter::Regex { path, regex })
}

#[cfg(not(feature = "regex"))]
fn parse_regex(_path: String, _arg: &Value) -> Result<Filter, DbError> {
    Err(DbError::UnknownOperator("$regex".into()))
}

impl TryFrom<&Value> for FindOptions {
    type Error = DbError;

    /// Accepts `{ "sort": {field: 1|-1, ...}, "skip": n, "limit": n }`; every key is optional.
    fn try_from(v: &Value) -> Result<Self, Self::Error> {
        let mut out = Self::default();
        let opts = match v {
            Value::Null => return Ok(out),
            Value::Document(d) => d,
            other => {
                return Err(DbError::InvalidArgument(format!(
                    "find options must be a document, got {}",
                    other.kind()
                )));
            }
        };
        for (key, val) in opts.iter() {
            match key.as_str() {
                "sort" => out.sort = parse_sort_spec(val)?,
                "skip" => out.skip = Some(parse_count("skip", val)?),
                "limit" => out.limit = Some(parse_count("limit", val)?),
                other => {
                    return Err(DbError::InvalidArgument(format!("unknown find option '{other}'")));
                }
            }
        }
        Ok(out)
    }
}

pub(crate) fn parse_sort_spec(v: &Value) -> Result<Vec<SortSpec>, DbError> {
    let Value::Document(spec) = v else {
        return Err(DbError::InvalidArgument("sort must be a document of field directions".into()));
    };
    spec.iter()
        .map(|(field, dir)| match dir.as_f64() {
            Some(n) if n > 0.0 => Ok(SortSpec { field: field.clone(), order: Order::Asc }),
            Some(n) if n < 0.0 => Ok(SortSpec { field: field.clone(), order: Order::Desc }),
            _ => Err(DbError::InvalidArgument(format!(
                "sort direction for '{field}' must be a positive or negative number"
            ))),
        })
        .collect()
}

/// Non-negative count for skip/limit style arguments. Fractions truncate.
pub(crate) fn parse_count(name: &str, v: &Value) -> Result<usize, DbError> {
    match v.as_f64() {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Some(n) if n.is_finite() && n >= 0.0 => Ok(n.trunc() as usize),
        _ => Err(DbError::InvalidArgument(format!("{name} must be a non-negative number"))),
    }
}

/// # Errors
/// Returns an error if the string is not valid JSON or does not describe a valid query.
pub fn parse_filter_json(json: &str) -> Result<Filter, DbError> {
    let v: serde_json::Value = serde_json::from_str(json)?;
    Filter::try_from(&Value::from(v))
}

/// # Errors
/// Returns an error if the string is not valid JSON or holds invalid find options.
pub fn parse_find_options_json(json: &str) -> Result<FindOptions, DbError> {
    let v: serde_json::Value = serde_json::from_str(json)?;
    FindOptions::try_from(&Value::from(v))
}
