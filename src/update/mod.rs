//! Update expressions: `$set`, `$unset`, `$inc`, `$push`, `$pull`, `$addToSet` and
//! full replacement.

mod apply;
mod parse;
mod types;

pub use apply::apply_update;
pub use parse::parse_update_json;
pub use types::{PullCondition, UPDATE_OPERATORS, UpdateDoc, UpdateOp};
