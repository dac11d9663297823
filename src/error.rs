use thiserror::Error;

/// Errors raised while assembling a document. Every variant is produced at
/// the moment the offending value is handed to a builder.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("Invalid identifier {name:?}: must match ^[A-Za-z0-9._-]+$")]
    InvalidIdentifier { name: String },

    #[error("Invalid path entry {path:?}: {reason}")]
    InvalidPathEntry { path: String, reason: String },

    #[error("Invalid value {value:?} for {field}, expected one of: {}", .allowed.join(", "))]
    InvalidEnumValue {
        field: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },

    #[error("Invalid element {key:?} in {collection}: expected {expected}")]
    InvalidElementType {
        collection: &'static str,
        key: String,
        expected: &'static str,
    },

    #[error("Invalid scope at index {index} of security requirement {requirement:?}: scopes must be strings")]
    InvalidScopeType { requirement: String, index: usize },

    #[error("Invalid raw schema: expected a JSON object, got {0}")]
    InvalidRawSchema(&'static str),
}

pub type Result<T> = std::result::Result<T, BuildError>;
