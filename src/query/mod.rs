// Submodules for separation of concerns
mod eval;
mod parse;
mod types;

pub use eval::{compare_docs, eval_filter};
pub(crate) use parse::{parse_count, parse_sort_spec};
pub use parse::{parse_filter_json, parse_find_options_json};
pub use types::{
    CmpOp, DeleteReport, Filter, FindOptions, LOGICAL_OPERATORS, Order, SortSpec, UpdateReport,
};

use crate::document::{Document, Value};
use crate::errors::DbError;

/// Parses `query` and tests it against `doc`.
///
/// # Errors
/// Returns the parse error for malformed queries or unknown operators.
pub fn matches(doc: &Document, query: &Value) -> Result<bool, DbError> {
    let filter = Filter::try_from(query)?;
    Ok(eval_filter(doc, &filter))
}
