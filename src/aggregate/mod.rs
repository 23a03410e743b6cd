//! Aggregation pipelines: `$match`, `$project`, `$sort`, `$limit`, `$skip` and `$group`.
//!
//! A pipeline is parsed in full before any stage runs, so a malformed or unknown stage
//! never leaves a partially transformed result behind.

mod exec;
mod group;
mod stage;

pub use exec::execute;
pub use group::{Accumulator, GroupSpec, group};
pub use stage::{PipelineStage, Projection, parse_pipeline, parse_pipeline_json};

use crate::document::{Document, Value};
use crate::errors::DbError;

/// Parses `pipeline` and runs it over `documents`.
///
/// # Errors
/// Returns parse errors (`UnknownStage`, `UnknownAccumulator`, `InvalidArgument`, ...)
/// before touching the input, or `TypeMismatch` from `$group`.
pub fn aggregate(documents: Vec<Document>, pipeline: &Value) -> Result<Vec<Document>, DbError> {
    let stages = parse_pipeline(pipeline)?;
    execute(documents, &stages)
}
