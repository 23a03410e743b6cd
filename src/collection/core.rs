use crate::document::Document;
use crate::index::IndexManager;
use crate::types::{CollectionName, DocumentId, IdGenerator, UuidIdGenerator};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// An in-memory collection of documents plus its equality indexes.
///
/// Documents keep insertion order; every stored document has a unique string `_id`.
pub struct Collection {
    pub(crate) name: CollectionName,
    pub(crate) entries: Vec<(DocumentId, Document)>,
    pub(crate) positions: HashMap<DocumentId, usize>,
    pub(crate) indexes: IndexManager,
    pub(crate) id_gen: Arc<dyn IdGenerator>,
}

impl Collection {
    #[must_use]
    pub fn new(name: impl Into<CollectionName>) -> Self {
        Self::with_id_generator(name, Arc::new(UuidIdGenerator))
    }

    #[must_use]
    pub fn with_id_generator(name: impl Into<CollectionName>, id_gen: Arc<dyn IdGenerator>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
            positions: HashMap::new(),
            indexes: IndexManager::new(),
            id_gen,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stored document with `_id == id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Document> {
        self.positions.get(id).map(|&pos| &self.entries[pos].1)
    }

    /// All documents in insertion order.
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.entries.iter().map(|(_, d)| d)
    }

    #[must_use]
    pub fn indexes(&self) -> &IndexManager {
        &self.indexes
    }

    pub(crate) fn reindex_positions(&mut self) {
        self.positions =
            self.entries.iter().enumerate().map(|(pos, (id, _))| (id.clone(), pos)).collect();
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("name", &self.name)
            .field("documents", &self.entries.len())
            .field("indexes", &self.indexes.fields())
            .finish_non_exhaustive()
    }
}
