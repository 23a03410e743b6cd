use crate::document::Value;

/// Logical combinators accepted at any level of a query.
pub const LOGICAL_OPERATORS: [&str; 3] = ["$and", "$or", "$nor"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub order: Order,
}

impl SortSpec {
    #[must_use]
    pub fn asc(field: impl Into<String>) -> Self {
        Self { field: field.into(), order: Order::Asc }
    }

    #[must_use]
    pub fn desc(field: impl Into<String>) -> Self {
        Self { field: field.into(), order: Order::Desc }
    }
}

/// Options for `Collection::find`. Sort runs first, then skip, then limit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindOptions {
    pub sort: Vec<SortSpec>,
    pub skip: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

/// A parsed query expression.
#[derive(Debug, Clone)]
pub enum Filter {
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Nor(Vec<Filter>),
    Exists { path: String, exists: bool },
    In { path: String, values: Vec<Value> },
    Nin { path: String, values: Vec<Value> },
    Cmp { path: String, op: CmpOp, value: Value },
    #[cfg(feature = "regex")]
    Regex { path: String, regex: regex::Regex },
}

impl Filter {
    /// A filter matching every document.
    #[must_use]
    pub const fn all() -> Self {
        Self::And(Vec::new())
    }

    /// The field path a conjunct constrains. Multi-operator conditions on one field
    /// report the path of their first operator.
    #[must_use]
    pub fn field_path(&self) -> Option<&str> {
        match self {
            Self::And(fs) => fs.first().and_then(Self::field_path),
            Self::Or(_) | Self::Nor(_) => None,
            Self::Exists { path, .. }
            | Self::In { path, .. }
            | Self::Nin { path, .. }
            | Self::Cmp { path, .. } => Some(path),
            #[cfg(feature = "regex")]
            Self::Regex { path, .. } => Some(path),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    pub matched: u64,
    pub modified: u64,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeleteReport {
    pub deleted: u64,
}
