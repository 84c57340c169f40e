//! Error types for reading, editing and writing kubelet configuration.

use thiserror::Error;

use crate::document::Path;

/// ParseError is returned when input bytes cannot become a document tree.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid YAML: {0}")]
    Syntax(#[from] serde_yaml::Error),

    #[error("document root is a {found}, not a mapping")]
    NotAMapping { found: &'static str },

    #[error("unsupported YAML tag {tag}")]
    UnsupportedTag { tag: String },

    #[error("mapping keys must be scalars")]
    NonScalarKey,

    #[error("expected a single YAML document")]
    MultipleDocuments,
}

/// SerializeError is returned when a document tree cannot be rendered.
#[derive(Debug, Error)]
#[error("failed to serialize document: {0}")]
pub struct SerializeError(#[from] pub serde_yaml::Error);

/// PathError is returned when a field path cannot be walked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("empty field path")]
    Empty,

    #[error("field {path} does not exist")]
    Missing { path: Path },

    #[error("field {path} is a {found}, not a mapping")]
    NotAMapping { path: Path, found: &'static str },
}

/// TypeError is returned when a field holds a value of the wrong kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field {path}: expected {expected}, found {found}")]
pub struct TypeError {
    pub path: Path,
    pub expected: &'static str,
    pub found: &'static str,
}

/// Error is the union of every failure the crate reports.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Serialize(#[from] SerializeError),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Type(#[from] TypeError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
