//! Errors raised while shaping fields

use thiserror::Error;

/// A requested field path that does not fit the target schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The top-level segment is unknown
    #[error("field '{token}' is not mapped")]
    NotMapped { token: String },

    /// The nested segment is unknown under an existing top-level field
    #[error("field '{token}' is not mapped: '{parent}' has no nested field '{nested}'")]
    NestedNotMapped {
        token: String,
        parent: String,
        nested: String,
    },

    /// The path has more than two segments
    #[error("field '{token}' is not supported: depth>2 unsupported")]
    TooDeep { token: String },
}

impl FieldError {
    /// The raw token as supplied by the caller
    pub fn token(&self) -> &str {
        match self {
            FieldError::NotMapped { token }
            | FieldError::NestedNotMapped { token, .. }
            | FieldError::TooDeep { token } => token,
        }
    }
}

/// Include and exclude sets that cannot be reconciled
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeConflictError {
    /// Tokens present in both the include and the exclude set
    #[error("fields cannot be both included and excluded: {}", .tokens.join(", "))]
    Overlap { tokens: Vec<String> },

    /// Nothing is left to return once exclusions are applied
    #[error("no fields remain after applying exclusions")]
    EmptyResult,
}

/// A validated path without a compiled mapping
///
/// This means the validator and the mapping configuration disagree, which is
/// a configuration bug rather than bad input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("schema contract violation: path '{path}' passed validation but has no mapping")]
pub struct ContractViolation {
    pub path: String,
}

impl ContractViolation {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// Any failure of the shaping engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapingError {
    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Conflict(#[from] ShapeConflictError),

    #[error(transparent)]
    Contract(#[from] ContractViolation),

    /// A source object could not be turned into a JSON object
    #[error("failed to serialize source object: {message}")]
    Serialization { message: String },
}

impl ShapingError {
    /// Whether the caller can fix this by changing the request
    pub fn is_user_error(&self) -> bool {
        matches!(self, ShapingError::Field(_) | ShapingError::Conflict(_))
    }
}

impl From<serde_json::Error> for ShapingError {
    fn from(err: serde_json::Error) -> Self {
        ShapingError::Serialization {
            message: err.to_string(),
        }
    }
}
