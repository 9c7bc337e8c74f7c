//! Error types for CDC event derivation and serialization
//!
//! Every error here is final for the call that raised it: retrying a
//! decode of corrupt bytes or a build of an inconsistent mutation cannot
//! succeed, so nothing is retried internally.

use serde::{Deserialize, Serialize};
use sluice_schema::{ColumnType, SchemaError};
use thiserror::Error;

/// Error categories for logging and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Producer/consumer schema skew or schema model violations
    Schema,
    /// Bytes that do not parse against the wire schema
    Serialization,
    /// Inconsistent input handed to the builder
    Validation,
}

/// CDC errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CdcError {
    /// Decoded type id has no registered column type
    #[error("Unknown column type id: {0}")]
    UnknownTypeId(i32),

    /// Byte stream does not conform to the wire schema
    #[error("Malformed mutation event: {0}")]
    MalformedEvent(String),

    /// A typed value disagrees with the column type it is encoded against
    #[error("Codec mismatch on column '{column}': declared {declared}, got {actual}")]
    CodecMismatch {
        column: String,
        declared: ColumnType,
        actual: ColumnType,
    },

    /// The bound mutation is internally inconsistent
    #[error("Invalid mutation: {0}")]
    InvalidMutation(String),

    /// Other schema model error
    #[error("Schema error: {0}")]
    Schema(SchemaError),

    /// Fault writing the encoded event
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CdcError {
    /// Create a malformed event error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedEvent(msg.into())
    }

    /// Create an invalid mutation error
    pub fn invalid_mutation(msg: impl Into<String>) -> Self {
        Self::InvalidMutation(msg.into())
    }

    /// Create a serialization error
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Classify this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownTypeId(_) | Self::Schema(_) => ErrorCategory::Schema,
            Self::MalformedEvent(_) | Self::Serialization(_) => ErrorCategory::Serialization,
            Self::CodecMismatch { .. } | Self::InvalidMutation(_) => ErrorCategory::Validation,
        }
    }

    /// Always false, see module docs.
    pub fn is_retriable(&self) -> bool {
        false
    }
}

impl From<SchemaError> for CdcError {
    fn from(e: SchemaError) -> Self {
        match e {
            SchemaError::UnknownTypeId(id) => Self::UnknownTypeId(id),
            SchemaError::CodecMismatch {
                column,
                declared,
                actual,
            } => Self::CodecMismatch {
                column,
                declared,
                actual,
            },
            other => Self::Schema(other),
        }
    }
}

/// Result type for CDC operations
pub type Result<T> = std::result::Result<T, CdcError>;
