use crate::document::Document;
use crate::errors::DbError;
use crate::query::{compare_docs, eval_filter};

use super::group::group;
use super::stage::{PipelineStage, Projection};

/// Runs `stages` over `documents` left to right.
///
/// # Errors
/// Only `$group` can fail at this point, on non-numeric `$sum`/`$avg` input.
pub fn execute(documents: Vec<Document>, stages: &[PipelineStage]) -> Result<Vec<Document>, DbError> {
    let mut docs = documents;
    for stage in stages {
        docs = match stage {
            PipelineStage::Match(filter) => docs.into_iter().filter(|d| eval_filter(d, filter)).collect(),
            PipelineStage::Project(fields) => docs.iter().map(|d| project(d, fields)).collect(),
            PipelineStage::Sort(spec) => {
                docs.sort_by(|a, b| compare_docs(a, b, spec));
                docs
            }
            PipelineStage::Limit(n) => {
                docs.truncate(*n);
                docs
            }
            PipelineStage::Skip(n) => docs.into_iter().skip(*n).collect(),
            PipelineStage::Group(spec) => group(&docs, spec)?,
        };
        log::trace!("aggregate stage {} -> {} documents", stage.name(), docs.len());
    }
    Ok(docs)
}

fn project(doc: &Document, fields: &[(String, Projection)]) -> Document {
    let mut out = Document::new();
    for (key, projection) in fields {
        let source = match projection {
            Projection::Include => key.as_str(),
            Projection::Field(src) => src.as_str(),
        };
        if let Some(v) = doc.get(source) {
            out.insert(key.clone(), v.clone());
        }
    }
    out
}
