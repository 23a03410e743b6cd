use crate::document::{Document, Value};
use crate::errors::DbError;

use super::types::{PullCondition, UPDATE_OPERATORS, UpdateDoc, UpdateOp};

impl TryFrom<&Value> for UpdateDoc {
    type Error = DbError;

    fn try_from(v: &Value) -> Result<Self, Self::Error> {
        match v {
            Value::Document(d) => Self::try_from(d),
            other => Err(DbError::InvalidArgument(format!(
                "update must be a document, got {}",
                other.kind()
            ))),
        }
    }
}

impl TryFrom<&Document> for UpdateDoc {
    type Error = DbError;

    /// Any `$` key switches the whole expression to operator form, where every key must
    /// then be a known operator.
    fn try_from(update: &Document) -> Result<Self, Self::Error> {
        if !update.keys().any(|k| k.starts_with('$')) {
            return Ok(Self::Replace(update.clone()));
        }
        let mut ops = Vec::with_capacity(update.len());
        for (name, arg) in update.iter() {
            ops.push(parse_op(name, arg)?);
        }
        Ok(Self::Operators(ops))
    }
}

fn parse_op(name: &str, arg: &Value) -> Result<UpdateOp, DbError> {
    let fields = match name {
        known if UPDATE_OPERATORS.contains(&known) => match arg {
            Value::Document(d) => d,
            other => {
                return Err(DbError::InvalidArgument(format!(
                    "{name} requires a document of paths, got {}",
                    other.kind()
                )));
            }
        },
        other => return Err(DbError::UnsupportedOperator(other.to_string())),
    };
    let pairs = || fields.iter().map(|(k, v)| (k.clone(), v.clone()));
    Ok(match name {
        "$set" => UpdateOp::Set(pairs().collect()),
        "$unset" => UpdateOp::Unset(fields.keys().cloned().collect()),
        "$inc" => UpdateOp::Inc(
            fields
                .iter()
                .map(|(path, amount)| match amount {
                    Value::Number(n) => Ok((path.clone(), *n)),
                    other => Err(DbError::TypeMismatch(format!(
                        "$inc value must be a number: {}",
                        other.to_json()
                    ))),
                })
                .collect::<Result<_, _>>()?,
        ),
        "$push" => UpdateOp::Push(pairs().collect()),
        "$pull" => UpdateOp::Pull(pairs().map(|(k, v)| (k, pull_condition(v))).collect()),
        _ => UpdateOp::AddToSet(pairs().collect()),
    })
}

fn pull_condition(v: Value) -> PullCondition {
    match v {
        Value::Document(cond) => match cond.get("$eq") {
            Some(target) => PullCondition::Equals(target.clone()),
            None => PullCondition::Nothing,
        },
        literal => PullCondition::Equals(literal),
    }
}

/// # Errors
/// Returns an error if the string is not valid JSON or does not describe a valid update.
pub fn parse_update_json(json: &str) -> Result<UpdateDoc, DbError> {
    let v: serde_json::Value = serde_json::from_str(json)?;
    UpdateDoc::try_from(&Value::from(v))
}
