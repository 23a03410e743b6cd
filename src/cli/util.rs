use crate::collection::Collection;
use crate::document::{Document, Value};
use crate::errors::DbError;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use super::runner::OutputMode;

/// Parses one JSON command-line argument.
///
/// # Errors
/// Returns `Json` for malformed input.
pub fn parse_json_arg(s: &str) -> Result<Value, DbError> {
    let v: serde_json::Value = serde_json::from_str(s)?;
    Ok(Value::from(v))
}

/// Inserts one document per non-blank line. Returns the number inserted.
///
/// # Errors
/// Stops at the first unreadable, malformed or rejected line, naming its line number.
pub fn load_ndjson(reader: impl BufRead, coll: &mut Collection) -> Result<usize, DbError> {
    let mut inserted = 0;
    for (n, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let at_line = |e: DbError| DbError::InvalidArgument(format!("line {}: {e}", n + 1));
        let doc = parse_json_arg(&line).map_err(at_line)?;
        coll.insert(doc).map_err(at_line)?;
        inserted += 1;
    }
    log::info!("loaded {inserted} documents into {}", coll.name());
    Ok(inserted)
}

/// # Errors
/// `Io` when the file cannot be opened, otherwise see [`load_ndjson`].
pub fn load_ndjson_file(path: &Path, coll: &mut Collection) -> Result<usize, DbError> {
    let file = File::open(path).map_err(|e| DbError::Io(format!("{}: {e}", path.display())))?;
    load_ndjson(BufReader::new(file), coll)
}

/// # Errors
/// Returns the first write or serialisation failure.
pub fn write_docs<'a>(
    out: &mut impl Write,
    docs: impl IntoIterator<Item = &'a Document>,
    mode: OutputMode,
) -> Result<(), DbError> {
    for doc in docs {
        let line = match mode {
            OutputMode::Ndjson => serde_json::to_string(doc)?,
            OutputMode::Pretty => serde_json::to_string_pretty(doc)?,
        };
        writeln!(out, "{line}")?;
    }
    Ok(())
}
