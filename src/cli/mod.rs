//! Programmatic runner behind the `litedoc` binary.
mod command;
mod runner;
mod util;

pub use command::Command;
pub use runner::{OutputMode, run, run_with_format};
pub use util::{load_ndjson, load_ndjson_file, parse_json_arg, write_docs};
