//! Error types for the build pipeline and validation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while assembling, dereferencing or flattening the document.
#[derive(Debug, Error)]
pub enum BuildError {
    // IO errors (exit code 3)
    #[error("directory not found: {path}")]
    DirNotFound { path: PathBuf },

    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON in {path}: {source}")]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid YAML in {path}: {source}")]
    InvalidYaml {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    #[error("unsupported fragment extension: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("fragment {path} is not a {expected}")]
    UnexpectedShape {
        path: PathBuf,
        expected: &'static str,
    },

    // Reference errors (exit code 2)
    #[error("circular reference chain at {pointer}")]
    CircularRef { pointer: String },

    #[error("unresolved reference: {pointer}")]
    UnresolvedRef { pointer: String },
}

impl BuildError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            BuildError::DirNotFound { .. }
            | BuildError::FileNotFound { .. }
            | BuildError::ReadError { .. }
            | BuildError::WriteError { .. } => 3,
            _ => 2,
        }
    }
}

/// Errors raised while checking a final document.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("meta-schema validation failed with {} error(s)", errors.len())]
    MetaSchema { errors: Vec<SchemaError> },

    #[error("document contains {} unresolved $ref pointer(s)", errors.len())]
    DanglingRefs { errors: Vec<SchemaError> },

    #[error("document parse failed: {message}")]
    Parse { message: String },

    #[error("invalid meta-schema: {message}")]
    InvalidMetaSchema { message: String },
}

/// Single validation error with path context.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SchemaError {
    /// JSON Pointer (RFC 6901) to the invalid node.
    pub path: String,
    /// Human-readable error message, truncated before any schema dump.
    pub message: String,
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

impl ValidateError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ValidateError::Build(e) => e.exit_code(),
            ValidateError::MetaSchema { .. }
            | ValidateError::DanglingRefs { .. }
            | ValidateError::Parse { .. } => 1,
            ValidateError::InvalidMetaSchema { .. } => 2,
        }
    }
}
