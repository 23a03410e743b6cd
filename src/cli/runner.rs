use crate::collection::Collection;
use crate::query::{FindOptions, parse_sort_spec};
use std::error::Error;
use std::io::Write;

use super::command::Command;
use super::util::{parse_json_arg, write_docs};

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum OutputMode {
    #[default]
    Ndjson,
    Pretty,
}

/// Runs `cmd` against `coll`, writing NDJSON to `out`.
///
/// # Errors
/// Returns parse, operation and write errors.
pub fn run(coll: &mut Collection, cmd: Command, out: &mut impl Write) -> Result<(), Box<dyn Error>> {
    run_with_format(coll, cmd, OutputMode::Ndjson, out)
}

/// # Errors
/// Returns parse, operation and write errors.
pub fn run_with_format(
    coll: &mut Collection,
    cmd: Command,
    mode: OutputMode,
    out: &mut impl Write,
) -> Result<(), Box<dyn Error>> {
    match cmd {
        Command::Find { filter_json, sort_json, skip, limit } => {
            let filter = parse_json_arg(&filter_json)?;
            let sort = match sort_json {
                Some(s) => parse_sort_spec(&parse_json_arg(&s)?)?,
                None => Vec::new(),
            };
            let docs = coll.find(&filter, &FindOptions { sort, skip, limit })?;
            write_docs(out, &docs, mode)?;
        }
        Command::Count { filter_json } => {
            let n = coll.count(&parse_json_arg(&filter_json)?)?;
            writeln!(out, "{}", serde_json::json!({ "count": n }))?;
        }
        Command::Aggregate { pipeline_json } => {
            let docs = coll.aggregate(&parse_json_arg(&pipeline_json)?)?;
            write_docs(out, &docs, mode)?;
        }
        Command::Update { filter_json, update_json, one } => {
            let filter = parse_json_arg(&filter_json)?;
            let update = parse_json_arg(&update_json)?;
            let report =
                if one { coll.update_one(&filter, &update)? } else { coll.update(&filter, &update)? };
            writeln!(
                out,
                "{}",
                serde_json::json!({ "matched": report.matched, "modified": report.modified })
            )?;
        }
        Command::Delete { filter_json, one } => {
            let filter = parse_json_arg(&filter_json)?;
            let report = if one { coll.delete_one(&filter)? } else { coll.delete(&filter)? };
            writeln!(out, "{}", serde_json::json!({ "deleted": report.deleted }))?;
        }
        Command::Dump => write_docs(out, coll.documents(), mode)?,
    }
    Ok(())
}
