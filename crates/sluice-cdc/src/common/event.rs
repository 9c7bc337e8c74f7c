//! Mutation event representation
//!
//! The transport-ready projection of a bound mutation. Inserts and updates
//! are the same write at the storage layer, so consumers only see
//! [`MutationEventType::Update`] ("row written") and
//! [`MutationEventType::Delete`] ("row removed").

use crate::common::{CdcError, Result};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use sluice_schema::serde_utils::bytes_serde;
use sluice_schema::{Column, Table};
use std::sync::Arc;

/// Mutation event type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MutationEventType {
    /// Row written (insert or update)
    Update,
    /// Row removed
    Delete,
}

impl MutationEventType {
    /// Canonical wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            MutationEventType::Update => "UPDATE",
            MutationEventType::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for MutationEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MutationEventType {
    type Err = CdcError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "UPDATE" => Ok(MutationEventType::Update),
            "DELETE" => Ok(MutationEventType::Delete),
            _ => Err(CdcError::malformed(format!("unknown mutation type '{}'", s))),
        }
    }
}

/// A column together with its encoded value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellValue {
    pub column: Column,
    #[serde(with = "bytes_serde")]
    pub value: Bytes,
}

impl CellValue {
    pub fn new(column: Column, value: impl Into<Bytes>) -> Self {
        Self {
            column,
            value: value.into(),
        }
    }
}

/// A captured mutation, ready to encode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationEvent {
    /// Full table schema, not just key columns
    pub table: Arc<Table>,
    pub ttl: Option<i32>,
    pub timestamp: Option<i64>,
    #[serde(rename = "type")]
    pub mutation_type: MutationEventType,
    /// Partition key cells in key order, empty when unknown
    pub partition_keys: Vec<CellValue>,
}

impl MutationEvent {
    /// Create an event with no TTL, timestamp or partition keys
    pub fn new(table: Arc<Table>, mutation_type: MutationEventType) -> Self {
        Self {
            table,
            ttl: None,
            timestamp: None,
            mutation_type,
            partition_keys: Vec::new(),
        }
    }

    /// Check if this event removes data
    pub fn is_delete(&self) -> bool {
        self.mutation_type == MutationEventType::Delete
    }

    /// Topic-style name for routing: `cdc.{keyspace}.{table}`
    pub fn topic_name(&self) -> String {
        format!("cdc.{}.{}", self.table.keyspace(), self.table.name())
    }
}
