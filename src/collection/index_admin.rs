use super::core::Collection;
use crate::errors::DbError;
use crate::index::IndexStats;

impl Collection {
    /// Builds an equality index on a top-level field from the current documents. An
    /// existing index on the field is rebuilt.
    ///
    /// # Errors
    /// `InvalidArgument` for an empty or dotted field name.
    pub fn create_index(&mut self, field: &str) -> Result<(), DbError> {
        if field.is_empty() || field.contains('.') {
            return Err(DbError::InvalidArgument(format!(
                "index field must be a non-empty top-level name, got '{field}'"
            )));
        }
        self.indexes.create_index(field, self.entries.iter().map(|(id, doc)| (id.as_str(), doc)));
        if let Some(stats) = self.indexes.stats(field) {
            log::info!(
                "built index {}.{field}: {} keys, {} entries in {}ms",
                self.name,
                stats.keys,
                stats.entries,
                stats.build_time_ms
            );
        }
        Ok(())
    }

    /// Returns whether an index existed.
    pub fn drop_index(&mut self, field: &str) -> bool {
        self.indexes.drop_index(field)
    }

    #[must_use]
    pub fn index_fields(&self) -> Vec<String> {
        self.indexes.fields()
    }

    #[must_use]
    pub fn index_stats(&self, field: &str) -> Option<IndexStats> {
        self.indexes.stats(field)
    }
}
