//! Document value model: the recursive [`Value`] type, dotted-path addressing,
//! ordering/equality helpers and expression evaluation shared by every other module.

mod compare;
mod expr;
mod path;
mod value;

pub use compare::{canonical, compare_values, locale_cmp, sort_cmp, sort_cmp_opt};
pub use expr::{FIELD_REF_SIGIL, expression_eval};
pub use path::{get_path, get_path_mut, set_path, unset_path};
pub use value::{Document, Value};
