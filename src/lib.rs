pub mod aggregate;
pub mod cli;
pub mod collection;
pub mod config;
pub mod document;
pub mod engine;
pub mod errors;
pub mod index;
pub mod query;
pub mod types;
pub mod update;
pub mod utils;

pub use crate::collection::Collection;
pub use crate::document::{Document, Value};
pub use crate::engine::{CollectionHandle, Engine};
pub use crate::errors::DbError;
pub use crate::query::{DeleteReport, FindOptions, UpdateReport};

use crate::types::DocumentId;

/// Name-addressed facade over an [`Engine`].
#[derive(Debug, Default)]
pub struct Database {
    engine: Engine,
}

impl Database {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn engine(&self) -> &Engine {
        &self.engine
    }

    /// # Errors
    /// See [`Engine::create_collection`].
    pub fn create_collection(&self, name: &str) -> Result<CollectionHandle, DbError> {
        self.engine.create_collection(name)
    }

    /// # Errors
    /// See [`Engine::get_collection`].
    pub fn get_collection(&self, name: &str) -> Result<CollectionHandle, DbError> {
        self.engine.get_collection(name)
    }

    /// # Errors
    /// See [`Engine::delete_collection`].
    pub fn delete_collection(&self, name: &str) -> Result<(), DbError> {
        self.engine.delete_collection(name)
    }

    #[must_use]
    pub fn list_collection_names(&self) -> Vec<String> {
        self.engine.list_collection_names()
    }

    /// # Errors
    /// Registry errors, or any error from [`Collection::insert`].
    pub fn insert(&self, collection: &str, doc: impl Into<Value>) -> Result<DocumentId, DbError> {
        self.get_collection(collection)?.write().insert(doc)
    }

    /// # Errors
    /// Registry errors, or an invalid query.
    pub fn find(&self, collection: &str, query: &Value, options: &FindOptions) -> Result<Vec<Document>, DbError> {
        self.get_collection(collection)?.read().find(query, options)
    }

    /// # Errors
    /// Registry errors, or an invalid query.
    pub fn find_one(&self, collection: &str, query: &Value) -> Result<Option<Document>, DbError> {
        self.get_collection(collection)?.read().find_one(query)
    }

    /// # Errors
    /// Registry errors, or any error from [`Collection::update`].
    pub fn update(&self, collection: &str, query: &Value, update: &Value) -> Result<UpdateReport, DbError> {
        self.get_collection(collection)?.write().update(query, update)
    }

    /// # Errors
    /// Registry errors, or any error from [`Collection::update_one`].
    pub fn update_one(&self, collection: &str, query: &Value, update: &Value) -> Result<UpdateReport, DbError> {
        self.get_collection(collection)?.write().update_one(query, update)
    }

    /// # Errors
    /// Registry errors, or an invalid query.
    pub fn delete(&self, collection: &str, query: &Value) -> Result<DeleteReport, DbError> {
        self.get_collection(collection)?.write().delete(query)
    }

    /// # Errors
    /// Registry errors, or an invalid query.
    pub fn delete_one(&self, collection: &str, query: &Value) -> Result<DeleteReport, DbError> {
        self.get_collection(collection)?.write().delete_one(query)
    }

    /// # Errors
    /// Registry errors, or any error from [`Collection::aggregate`].
    pub fn aggregate(&self, collection: &str, pipeline: &Value) -> Result<Vec<Document>, DbError> {
        self.get_collection(collection)?.read().aggregate(pipeline)
    }

    /// # Errors
    /// Registry errors, or an invalid field name.
    pub fn create_index(&self, collection: &str, field: &str) -> Result<(), DbError> {
        self.get_collection(collection)?.write().create_index(field)
    }

    /// Resolves references in `field` of `docs` against collection `other`.
    ///
    /// Both collections are read-locked for the duration, in name order. A
    /// self-reference takes a single lock.
    ///
    /// # Errors
    /// Registry errors for either name.
    pub fn populate(
        &self,
        collection: &str,
        docs: &[Document],
        field: &str,
        other: &str,
    ) -> Result<Vec<Document>, DbError> {
        let source = self.get_collection(collection)?;
        if collection == other {
            let guard = source.read();
            return Ok(guard.populate(docs, field, &guard));
        }
        let target = self.get_collection(other)?;
        let (source_guard, target_guard) = if collection < other {
            let s = source.read();
            (s, target.read())
        } else {
            let t = target.read();
            (source.read(), t)
        };
        Ok(source_guard.populate(docs, field, &target_guard))
    }
}

/// Initializes logging from `log4rs.yaml` in the working directory when present.
///
/// # Errors
/// Returns an error if the file exists but cannot be loaded.
pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    utils::logger::init()?;
    Ok(())
}
