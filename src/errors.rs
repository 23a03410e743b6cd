use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serde JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Collection name must be provided.")]
    InvalidCollectionName,

    #[error("Collection \"{0}\" does not exist.")]
    NoSuchCollection(String),

    #[error("Collection \"{0}\" already exists.")]
    CollectionAlreadyExists(String),

    #[error("Document must be provided.")]
    MissingDocument,

    #[error("Duplicate _id '{0}' found.")]
    DuplicateId(String),

    #[error("Invalid document ID: {0}")]
    InvalidDocumentId(String),

    #[error("_id of document '{0}' cannot be modified")]
    ImmutableId(String),

    #[error("Unknown operator {0}")]
    UnknownOperator(String),

    #[error("Unsupported update operator: {0}")]
    UnsupportedOperator(String),

    #[error("Unknown aggregation stage operator: {0}")]
    UnknownStage(String),

    #[error("Unsupported accumulator operator: {0}")]
    UnknownAccumulator(String),

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Query error: {0}")]
    QueryError(String),
}

impl From<std::io::Error> for DbError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
