use crate::document::{FIELD_REF_SIGIL, Value};
use crate::errors::DbError;
use crate::query::{Filter, SortSpec, parse_count, parse_sort_spec};
use crate::types::ID_FIELD;

use super::group::{Accumulator, GroupSpec};

/// One parsed pipeline stage.
#[derive(Debug, Clone)]
pub enum PipelineStage {
    Match(Filter),
    Project(Vec<(String, Projection)>),
    Sort(Vec<SortSpec>),
    Limit(usize),
    Skip(usize),
    Group(GroupSpec),
}

/// Source of one `$project` output field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// `1` or `true`: copy the same-named field.
    Include,
    /// `"$other"`: copy the top-level field `other`.
    Field(String),
}

impl PipelineStage {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Match(_) => "$match",
            Self::Project(_) => "$project",
            Self::Sort(_) => "$sort",
            Self::Limit(_) => "$limit",
            Self::Skip(_) => "$skip",
            Self::Group(_) => "$group",
        }
    }
}

impl TryFrom<&Value> for PipelineStage {
    type Error = DbError;

    fn try_from(v: &Value) -> Result<Self, Self::Error> {
        let Value::Document(stage) = v else {
            return Err(DbError::InvalidArgument(format!(
                "pipeline stage must be a document, got {}",
                v.kind()
            )));
        };
        let mut entries = stage.iter();
        let (Some((name, arg)), None) = (entries.next(), entries.next()) else {
            return Err(DbError::InvalidArgument(format!(
                "pipeline stage must have exactly one key, got {}",
                stage.len()
            )));
        };
        match name.as_str() {
            "$match" => Ok(Self::Match(Filter::try_from(arg)?)),
            "$project" => parse_project(arg).map(Self::Project),
            "$sort" => Ok(Self::Sort(parse_sort_spec(arg)?)),
            "$limit" => Ok(Self::Limit(parse_count("$limit", arg)?)),
            "$skip" => Ok(Self::Skip(parse_count("$skip", arg)?)),
            "$group" => parse_group(arg).map(Self::Group),
            other => Err(DbError::UnknownStage(other.to_string())),
        }
    }
}

fn parse_project(arg: &Value) -> Result<Vec<(String, Projection)>, DbError> {
    let Value::Document(spec) = arg else {
        return Err(DbError::InvalidArgument("$project requires a document".into()));
    };
    let mut out = Vec::with_capacity(spec.len());
    for (key, v) in spec.iter() {
        let projection = match v {
            Value::Bool(true) => Projection::Include,
            Value::Number(n) if *n == 1.0 => Projection::Include,
            Value::String(s) if s.starts_with(FIELD_REF_SIGIL) => {
                Projection::Field(s[FIELD_REF_SIGIL.len_utf8()..].to_string())
            }
            _ => continue,
        };
        out.push((key.clone(), projection));
    }
    Ok(out)
}

fn parse_group(arg: &Value) -> Result<GroupSpec, DbError> {
    let Value::Document(spec) = arg else {
        return Err(DbError::InvalidArgument("$group requires a document".into()));
    };
    let mut group = GroupSpec {
        id: spec.get(ID_FIELD).cloned().unwrap_or(Value::Null),
        accumulators: Vec::new(),
    };
    for (field, acc) in spec.iter().filter(|(k, _)| k.as_str() != ID_FIELD) {
        let Value::Document(acc) = acc else {
            return Err(DbError::InvalidArgument(format!(
                "accumulator for '{field}' must be a document"
            )));
        };
        let mut entries = acc.iter();
        let (Some((op, expr)), None) = (entries.next(), entries.next()) else {
            return Err(DbError::InvalidArgument(format!(
                "accumulator for '{field}' must have exactly one operator"
            )));
        };
        let kind = Accumulator::from_name(op)
            .ok_or_else(|| DbError::UnknownAccumulator(op.clone()))?;
        group.accumulators.push((field.clone(), kind, expr.clone()));
    }
    Ok(group)
}

/// # Errors
/// Fails on the first stage that is malformed or unknown.
pub fn parse_pipeline(pipeline: &Value) -> Result<Vec<PipelineStage>, DbError> {
    let Value::Array(stages) = pipeline else {
        return Err(DbError::InvalidArgument(format!(
            "pipeline must be an array of stages, got {}",
            pipeline.kind()
        )));
    };
    stages.iter().map(PipelineStage::try_from).collect()
}

/// # Errors
/// Returns an error if the string is not valid JSON or holds an invalid pipeline.
pub fn parse_pipeline_json(json: &str) -> Result<Vec<PipelineStage>, DbError> {
    let v: serde_json::Value = serde_json::from_str(json)?;
    parse_pipeline(&Value::from(v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_stage_anywhere_fails_parse() {
        let err = parse_pipeline_json(r#"[{"$limit": 1}, {"$bogus": {}}]"#).unwrap_err();
        assert!(matches!(err, DbError::UnknownStage(s) if s == "$bogus"));
    }

    #[test]
    fn stage_shape_checks() {
        assert!(matches!(
            parse_pipeline_json(r#"[{"$limit": 1, "$skip": 1}]"#),
            Err(DbError::InvalidArgument(_))
        ));
        assert!(matches!(parse_pipeline_json(r#"[{"$limit": -2}]"#), Err(DbError::InvalidArgument(_))));
        assert!(matches!(
            parse_pipeline_json(r#"[{"$group": {"_id": null, "x": {"$median": "$a"}}}]"#),
            Err(DbError::UnknownAccumulator(a)) if a == "$median"
        ));
    }

    #[test]
    fn project_keeps_only_producing_keys() {
        let stages = parse_pipeline_json(r#"[{"$project": {"a": 1, "b": true, "c": 0, "d": "$x", "e": "lit"}}]"#)
            .unwrap();
        let PipelineStage::Project(p) = &stages[0] else { panic!("expected $project") };
        assert_eq!(
            p,
            &vec![
                ("a".to_string(), Projection::Include),
                ("b".to_string(), Projection::Include),
                ("d".to_string(), Projection::Field("x".into())),
            ]
        );
    }
}
