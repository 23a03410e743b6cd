use crate::collection::Collection;
use crate::errors::DbError;
use crate::types::{CollectionName, IdGenerator, UuidIdGenerator};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Shared handle to one collection. Holding the write lock serialises mutations.
pub type CollectionHandle = Arc<RwLock<Collection>>;

/// Registry of named in-memory collections.
pub struct Engine {
    pub(crate) collections: RwLock<HashMap<CollectionName, CollectionHandle>>,
    id_gen: Arc<dyn IdGenerator>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine").field("collections", &self.list_collection_names()).finish_non_exhaustive()
    }
}

fn validate_name(name: &str) -> Result<(), DbError> {
    if name.trim().is_empty() {
        return Err(DbError::InvalidCollectionName);
    }
    Ok(())
}

impl Engine {
    #[must_use]
    pub fn new() -> Self {
        Self::with_id_generator(Arc::new(UuidIdGenerator))
    }

    /// Collections created by this engine draw their ids from `id_gen`.
    #[must_use]
    pub fn with_id_generator(id_gen: Arc<dyn IdGenerator>) -> Self {
        Self { collections: RwLock::new(HashMap::new()), id_gen }
    }

    /// # Errors
    /// `InvalidCollectionName` for a blank name, `CollectionAlreadyExists` for a taken one.
    pub fn create_collection(&self, name: &str) -> Result<CollectionHandle, DbError> {
        validate_name(name)?;
        let mut map = self.collections.write();
        if map.contains_key(name) {
            return Err(DbError::CollectionAlreadyExists(name.to_string()));
        }
        let handle = Arc::new(RwLock::new(Collection::with_id_generator(name, Arc::clone(&self.id_gen))));
        map.insert(name.to_string(), Arc::clone(&handle));
        log::info!("created collection {name}");
        Ok(handle)
    }

    /// # Errors
    /// `InvalidCollectionName` for a blank name, `NoSuchCollection` for an unknown one.
    pub fn get_collection(&self, name: &str) -> Result<CollectionHandle, DbError> {
        validate_name(name)?;
        self.collections
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| DbError::NoSuchCollection(name.to_string()))
    }

    /// Collection names, sorted.
    #[must_use]
    pub fn list_collection_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.collections.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Removes a collection from the registry. Outstanding handles stay usable.
    ///
    /// # Errors
    /// `InvalidCollectionName` for a blank name, `NoSuchCollection` for an unknown one.
    pub fn delete_collection(&self, name: &str) -> Result<(), DbError> {
        validate_name(name)?;
        if self.collections.write().remove(name).is_none() {
            return Err(DbError::NoSuchCollection(name.to_string()));
        }
        log::info!("deleted collection {name}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_lifecycle() {
        let engine = Engine::new();
        engine.create_collection("b").unwrap();
        engine.create_collection("a").unwrap();
        assert_eq!(engine.list_collection_names(), vec!["a", "b"]);
        assert!(matches!(engine.create_collection("a"), Err(DbError::CollectionAlreadyExists(_))));
        engine.delete_collection("a").unwrap();
        assert!(matches!(engine.get_collection("a"), Err(DbError::NoSuchCollection(_))));
        assert!(matches!(engine.delete_collection("a"), Err(DbError::NoSuchCollection(_))));
    }

    #[test]
    fn blank_names_are_rejected() {
        let engine = Engine::new();
        assert!(matches!(engine.create_collection("  "), Err(DbError::InvalidCollectionName)));
        assert!(matches!(engine.get_collection(""), Err(DbError::InvalidCollectionName)));
    }
}
