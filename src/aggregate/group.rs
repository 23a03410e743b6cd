use std::cmp::Ordering;
use std::collections::HashMap;

use crate::document::{Document, Value, canonical, compare_values, expression_eval};
use crate::errors::DbError;
use crate::types::ID_FIELD;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accumulator {
    Sum,
    Avg,
    Max,
    Min,
    First,
    Last,
}

impl Accumulator {
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "$sum" => Self::Sum,
            "$avg" => Self::Avg,
            "$max" => Self::Max,
            "$min" => Self::Min,
            "$first" => Self::First,
            "$last" => Self::Last,
            _ => return None,
        })
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Sum => "$sum",
            Self::Avg => "$avg",
            Self::Max => "$max",
            Self::Min => "$min",
            Self::First => "$first",
            Self::Last => "$last",
        }
    }

    fn init(self) -> AccState {
        match self {
            Self::Sum => AccState::Sum(0.0),
            Self::Avg => AccState::Avg { sum: 0.0, count: 0 },
            Self::Max | Self::Min | Self::First | Self::Last => AccState::Value(Value::Null),
        }
    }
}

/// Parsed `$group` argument: the key expression plus named accumulators in spec order.
#[derive(Debug, Clone)]
pub struct GroupSpec {
    pub id: Value,
    pub accumulators: Vec<(String, Accumulator, Value)>,
}

#[derive(Debug, Clone)]
enum AccState {
    Sum(f64),
    Avg { sum: f64, count: u64 },
    Value(Value),
}

impl AccState {
    fn fold(&mut self, acc: Accumulator, v: Value) -> Result<(), DbError> {
        match self {
            Self::Sum(total) => *total += numeric(acc, &v)?,
            Self::Avg { sum, count } => {
                *sum += numeric(acc, &v)?;
                *count += 1;
            }
            // a null slot is reseeded by the next value, matching unseeded state
            Self::Value(cur) => {
                let replace = match acc {
                    Accumulator::Max => cur.is_null() || compare_values(&v, cur) == Some(Ordering::Greater),
                    Accumulator::Min => cur.is_null() || compare_values(&v, cur) == Some(Ordering::Less),
                    Accumulator::First => cur.is_null(),
                    _ => true,
                };
                if replace {
                    *cur = v;
                }
            }
        }
        Ok(())
    }

    fn finish(self) -> Value {
        match self {
            Self::Sum(total) => Value::Number(total),
            #[allow(clippy::cast_precision_loss)]
            Self::Avg { sum, count } => {
                if count == 0 { Value::Null } else { Value::Number(sum / count as f64) }
            }
            Self::Value(v) => v,
        }
    }
}

fn numeric(acc: Accumulator, v: &Value) -> Result<f64, DbError> {
    match v {
        Value::Number(n) => Ok(*n),
        other => Err(DbError::TypeMismatch(format!(
            "{} requires numeric values, but got: {}",
            acc.name(),
            other.to_json()
        ))),
    }
}

/// Buckets `documents` by the evaluated `_id` expression. Output documents hold `_id`
/// then each accumulator, in first-seen group order.
///
/// # Errors
/// Returns `TypeMismatch` when `$sum`/`$avg` meet a non-numeric value.
pub fn group(documents: &[Document], spec: &GroupSpec) -> Result<Vec<Document>, DbError> {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(Value, Vec<AccState>)> = Vec::new();
    for doc in documents {
        let key = expression_eval(&spec.id, doc);
        let idx = *slots.entry(canonical(&key)).or_insert_with(|| {
            let states = spec.accumulators.iter().map(|(_, acc, _)| acc.init()).collect();
            groups.push((key, states));
            groups.len() - 1
        });
        let states = &mut groups[idx].1;
        for ((_, acc, expr), state) in spec.accumulators.iter().zip(states.iter_mut()) {
            state.fold(*acc, expression_eval(expr, doc))?;
        }
    }
    Ok(groups
        .into_iter()
        .map(|(key, states)| {
            let mut out = Document::new();
            out.insert(ID_FIELD, key);
            for ((field, _, _), state) in spec.accumulators.iter().zip(states) {
                out.insert(field.clone(), state.finish());
            }
            out
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec(v: serde_json::Value) -> GroupSpec {
        let Value::Document(d) = Value::from(v) else { unreachable!() };
        GroupSpec {
            id: d.get("_id").cloned().unwrap_or_default(),
            accumulators: d
                .iter()
                .filter(|(k, _)| k.as_str() != "_id")
                .map(|(k, v)| {
                    let (op, expr) = v.as_document().unwrap().iter().next().unwrap();
                    (k.clone(), Accumulator::from_name(op).unwrap(), expr.clone())
                })
                .collect(),
        }
    }

    fn docs(v: serde_json::Value) -> Vec<Document> {
        let serde_json::Value::Array(items) = v else { unreachable!() };
        items.into_iter().map(|d| Document::from_json(d).unwrap()).collect()
    }

    #[test]
    fn max_min_first_last() {
        let d = docs(json!([{"v": 3}, {"v": 9}, {"v": 1}]));
        let out = group(
            &d,
            &spec(json!({"_id": null, "hi": {"$max": "$v"}, "lo": {"$min": "$v"}, "f": {"$first": "$v"}, "l": {"$last": "$v"}})),
        )
        .unwrap();
        assert_eq!(Value::Document(out[0].clone()), Value::from(json!({"_id": null, "hi": 9, "lo": 1, "f": 3, "l": 1})));
    }

    #[test]
    fn structurally_equal_keys_share_a_group() {
        let d = docs(json!([{"k": {"a": 1, "b": 2}}, {"k": {"b": 2, "a": 1}}, {"k": 1}]));
        let out = group(&d, &spec(json!({"_id": "$k", "n": {"$sum": 1}}))).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].get("n"), Some(&Value::from(2)));
    }

    #[test]
    fn sum_rejects_non_numbers() {
        let d = docs(json!([{"v": "x"}]));
        assert!(matches!(group(&d, &spec(json!({"_id": null, "s": {"$sum": "$v"}}))), Err(DbError::TypeMismatch(_))));
        assert!(matches!(group(&d, &spec(json!({"_id": null, "s": {"$avg": "$v"}}))), Err(DbError::TypeMismatch(_))));
    }
}
