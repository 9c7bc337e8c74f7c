//! Schema and value codec error types

use crate::ColumnType;
use thiserror::Error;

/// Errors raised by the schema model and value codecs
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A type id with no registered column type
    #[error("Unknown column type id: {0}")]
    UnknownTypeId(i32),

    /// Column names must be non-empty
    #[error("Column name must not be empty")]
    EmptyColumnName,

    /// Two columns of the same table share a name
    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    /// Unrecognized column kind name
    #[error("Unknown column kind: {0}")]
    UnknownColumnKind(String),

    /// Unrecognized clustering order name
    #[error("Unknown clustering order: {0}")]
    UnknownClusteringOrder(String),

    /// A typed value disagrees with its column's declared type
    #[error("Codec mismatch on column '{column}': declared {declared}, got {actual}")]
    CodecMismatch {
        column: String,
        declared: ColumnType,
        actual: ColumnType,
    },

    /// A native value cannot be represented as the requested type
    #[error("Type mismatch: expected {expected}, got {actual}")]
    ValueTypeMismatch {
        expected: ColumnType,
        actual: &'static str,
    },

    /// The codec does not handle this column type
    #[error("Codec '{codec}' does not support type {column_type}")]
    UnsupportedType {
        codec: &'static str,
        column_type: ColumnType,
    },

    /// Raw bytes do not form a valid value of the type
    #[error("Invalid {column_type} encoding: {reason}")]
    InvalidEncoding {
        column_type: ColumnType,
        reason: String,
    },
}

impl SchemaError {
    /// Create an invalid encoding error
    pub fn invalid_encoding(column_type: ColumnType, reason: impl Into<String>) -> Self {
        Self::InvalidEncoding {
            column_type,
            reason: reason.into(),
        }
    }
}

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;
