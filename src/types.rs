use uuid::Uuid;

pub type CollectionName = String;

/// The `_id` of a stored document.
pub type DocumentId = String;

/// Field name every stored document carries its identifier under.
pub const ID_FIELD: &str = "_id";

/// Source of fresh, opaque, unique document identifiers.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> DocumentId;
}

/// Generates 32-character lowercase hex ids from random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn generate(&self) -> DocumentId {
        Uuid::new_v4().simple().to_string()
    }
}
