use crate::document::{Document, Value};

/// Update operators recognised inside an operator-form update.
pub const UPDATE_OPERATORS: [&str; 6] = ["$set", "$unset", "$inc", "$push", "$pull", "$addToSet"];

/// What `$pull` removes from an array.
#[derive(Debug, Clone, PartialEq)]
pub enum PullCondition {
    /// Elements deep-equal to the value (plain literal or `{ "$eq": value }`).
    Equals(Value),
    /// A condition document without `$eq`; removes nothing.
    Nothing,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOp {
    Set(Vec<(String, Value)>),
    Unset(Vec<String>),
    Inc(Vec<(String, f64)>),
    Push(Vec<(String, Value)>),
    Pull(Vec<(String, PullCondition)>),
    AddToSet(Vec<(String, Value)>),
}

impl UpdateOp {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Set(_) => "$set",
            Self::Unset(_) => "$unset",
            Self::Inc(_) => "$inc",
            Self::Push(_) => "$push",
            Self::Pull(_) => "$pull",
            Self::AddToSet(_) => "$addToSet",
        }
    }
}

/// A parsed update expression.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateDoc {
    /// Replace every field except `_id`.
    Replace(Document),
    /// Apply the operators in order.
    Operators(Vec<UpdateOp>),
}
