use super::core::Collection;
use crate::aggregate::{execute, parse_pipeline};
use crate::dev_trace;
use crate::document::{Document, Value};
use crate::errors::DbError;
use crate::query::{CmpOp, DeleteReport, Filter, FindOptions, UpdateReport, compare_docs, eval_filter};
use crate::types::{DocumentId, ID_FIELD};
use crate::update::{UpdateDoc, apply_update};
use crate::utils::logger::log_audit;

impl Collection {
    /// Stores a document, generating an `_id` when it is missing, null or empty.
    ///
    /// # Errors
    /// `MissingDocument` for null, `TypeMismatch` for a non-document, `InvalidDocumentId`
    /// for a non-string `_id` and `DuplicateId` when the id is taken. Nothing is stored
    /// on error.
    pub fn insert(&mut self, doc: impl Into<Value>) -> Result<DocumentId, DbError> {
        let doc = match doc.into() {
            Value::Null => return Err(DbError::MissingDocument),
            Value::Document(d) => d,
            other => {
                return Err(DbError::TypeMismatch(format!(
                    "cannot insert a {} as a document",
                    other.kind()
                )));
            }
        };
        let given = match doc.get(ID_FIELD) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            None | Some(Value::Null | Value::String(_)) => None,
            Some(other) => {
                return Err(DbError::InvalidDocumentId(format!(
                    "_id must be a string, got {}",
                    other.kind()
                )));
            }
        };
        let (id, doc) = match given {
            Some(id) => (id, doc),
            None => {
                let id = self.id_gen.generate();
                let mut out = Document::new();
                out.insert(ID_FIELD, id.clone());
                for (k, v) in doc.into_iter().filter(|(k, _)| k != ID_FIELD) {
                    out.insert(k, v);
                }
                (id, out)
            }
        };
        if self.positions.contains_key(&id) {
            return Err(DbError::DuplicateId(id));
        }
        self.indexes.insert_all(&doc, &id);
        self.positions.insert(id.clone(), self.entries.len());
        self.entries.push((id.clone(), doc));
        log_audit("insert", &self.name, &id);
        Ok(id)
    }

    /// # Errors
    /// Returns the parse error for an invalid query.
    pub fn find(&self, query: &Value, options: &FindOptions) -> Result<Vec<Document>, DbError> {
        let filter = Filter::try_from(query)?;
        Ok(self.find_filtered(&filter, options))
    }

    /// Runs an already parsed filter: index or full scan, then sort, skip, limit.
    #[must_use]
    pub fn find_filtered(&self, filter: &Filter, options: &FindOptions) -> Vec<Document> {
        let planned = self.plan_index_candidates(filter);
        let used_index = planned.is_some();
        let mut results: Vec<&Document> = match planned {
            Some(positions) => positions
                .into_iter()
                .map(|pos| &self.entries[pos].1)
                .filter(|d| eval_filter(d, filter))
                .collect(),
            None => self.documents().filter(|d| eval_filter(d, filter)).collect(),
        };
        if !options.sort.is_empty() {
            results.sort_by(|a, b| compare_docs(a, b, &options.sort));
        }
        let out: Vec<Document> = results
            .into_iter()
            .skip(options.skip.unwrap_or(0))
            .take(options.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();
        dev_trace!(
            "{}",
            serde_json::json!({
                "bench": "query", "op": "find", "collection": self.name,
                "used_index": used_index, "result_count": out.len()
            })
        );
        out
    }

    /// Store positions to scan when the first top-level conjunct on an indexed field is
    /// an equality with a scalar. `None` means scan everything.
    fn plan_index_candidates(&self, filter: &Filter) -> Option<Vec<usize>> {
        let Filter::And(conjuncts) = filter else {
            return None;
        };
        let conjunct = conjuncts
            .iter()
            .find(|c| c.field_path().is_some_and(|p| self.indexes.contains(p)))?;
        let Filter::Cmp { path, op: CmpOp::Eq, value } = conjunct else {
            return None;
        };
        let ids = self.indexes.lookup_eq(path, value)?;
        let mut positions: Vec<usize> =
            ids.iter().filter_map(|id| self.positions.get(id).copied()).collect();
        positions.sort_unstable();
        Some(positions)
    }

    /// # Errors
    /// Returns the parse error for an invalid query.
    pub fn find_one(&self, query: &Value) -> Result<Option<Document>, DbError> {
        let options = FindOptions { limit: Some(1), ..FindOptions::default() };
        Ok(self.find(query, &options)?.into_iter().next())
    }

    /// # Errors
    /// Returns the parse error for an invalid query.
    pub fn count(&self, query: &Value) -> Result<usize, DbError> {
        let filter = Filter::try_from(query)?;
        Ok(self.documents().filter(|d| eval_filter(d, &filter)).count())
    }

    /// Applies `update` to every matching document.
    ///
    /// # Errors
    /// Parse errors, operator errors, or `ImmutableId` when the result would change an
    /// `_id`. Every result is computed before any document is replaced, so an error
    /// leaves the collection unchanged.
    pub fn update(&mut self, query: &Value, update: &Value) -> Result<UpdateReport, DbError> {
        self.update_matching(query, update, u64::MAX)
    }

    /// Applies `update` to the first matching document.
    ///
    /// # Errors
    /// See [`Collection::update`].
    pub fn update_one(&mut self, query: &Value, update: &Value) -> Result<UpdateReport, DbError> {
        self.update_matching(query, update, 1)
    }

    fn update_matching(&mut self, query: &Value, update: &Value, max: u64) -> Result<UpdateReport, DbError> {
        let filter = Filter::try_from(query)?;
        let upd = UpdateDoc::try_from(update)?;
        let mut report = UpdateReport::default();
        let mut staged = Vec::new();
        for (pos, (id, doc)) in self.entries.iter().enumerate() {
            if report.matched >= max {
                break;
            }
            if !eval_filter(doc, &filter) {
                continue;
            }
            report.matched += 1;
            let updated = apply_update(doc, &upd)?;
            if updated.id() != Some(id.as_str()) {
                return Err(DbError::ImmutableId(id.clone()));
            }
            if updated != *doc {
                staged.push((pos, updated));
            }
        }
        for (pos, updated) in staged {
            let (id, current) = &mut self.entries[pos];
            self.indexes.remove_all(current, id);
            self.indexes.insert_all(&updated, id);
            *current = updated;
            report.modified += 1;
            log_audit("update", &self.name, id);
        }
        Ok(report)
    }

    /// # Errors
    /// Returns the parse error for an invalid query.
    pub fn delete(&mut self, query: &Value) -> Result<DeleteReport, DbError> {
        self.delete_matching(query, u64::MAX)
    }

    /// # Errors
    /// Returns the parse error for an invalid query.
    pub fn delete_one(&mut self, query: &Value) -> Result<DeleteReport, DbError> {
        self.delete_matching(query, 1)
    }

    fn delete_matching(&mut self, query: &Value, max: u64) -> Result<DeleteReport, DbError> {
        let filter = Filter::try_from(query)?;
        let mut report = DeleteReport::default();
        let entries = std::mem::take(&mut self.entries);
        for (id, doc) in entries {
            if report.deleted < max && eval_filter(&doc, &filter) {
                self.indexes.remove_all(&doc, &id);
                log_audit("delete", &self.name, &id);
                report.deleted += 1;
            } else {
                self.entries.push((id, doc));
            }
        }
        if report.deleted > 0 {
            self.reindex_positions();
        }
        Ok(report)
    }

    /// Runs an aggregation pipeline over a snapshot of every document.
    ///
    /// # Errors
    /// Pipeline parse errors, or `TypeMismatch` from `$group`.
    pub fn aggregate(&self, pipeline: &Value) -> Result<Vec<Document>, DbError> {
        let stages = parse_pipeline(pipeline)?;
        execute(self.documents().cloned().collect(), &stages)
    }

    /// Replaces `field` in each of `docs` with the document of `other` whose `_id` it
    /// holds, or null when there is none. Documents without `field` pass through.
    #[allow(clippy::unused_self)]
    #[must_use]
    pub fn populate(&self, docs: &[Document], field: &str, other: &Self) -> Vec<Document> {
        docs.iter()
            .map(|doc| {
                let mut out = doc.clone();
                if let Some(reference) = doc.get(field) {
                    let target = reference
                        .as_str()
                        .and_then(|id| other.get(id))
                        .map_or(Value::Null, |d| Value::Document(d.clone()));
                    out.insert(field, target);
                }
                out
            })
            .collect()
    }
}
