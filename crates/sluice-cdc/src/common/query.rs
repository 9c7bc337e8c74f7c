//! Bound mutations as handed over by the query layer
//!
//! A [`BoundMutation`] is a DML statement already resolved against its
//! table: every value is a [`TypedValue`] tied to a schema column. These
//! types are read-only input to the event builder.

use crate::common::{CdcError, Result};
use sluice_schema::{Column, Table, TypedValue};
use std::sync::Arc;

/// Kind of DML statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    Insert,
    Update,
    Delete,
}

impl std::fmt::Display for QueryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryKind::Insert => write!(f, "INSERT"),
            QueryKind::Update => write!(f, "UPDATE"),
            QueryKind::Delete => write!(f, "DELETE"),
        }
    }
}

/// Values of a (possibly partial) primary key
///
/// Values follow the primary key definition: partition key columns in
/// declared order, then clustering columns in declared order. A prefix of
/// the full key is allowed.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryKeyValue {
    table: Arc<Table>,
    values: Vec<TypedValue>,
}

impl PrimaryKeyValue {
    /// Bind key values to a table, checking they form a key prefix.
    pub fn new(table: Arc<Table>, values: Vec<TypedValue>) -> Result<Self> {
        let key_columns = table.primary_key_columns();
        if values.len() > key_columns.len() {
            return Err(CdcError::invalid_mutation(format!(
                "{} key values for {} with {} primary key columns",
                values.len(),
                table,
                key_columns.len()
            )));
        }
        for (position, (value, expected)) in values.iter().zip(&key_columns).enumerate() {
            if value.column().name() != expected.name() {
                return Err(CdcError::invalid_mutation(format!(
                    "key value {} of {} is for column '{}', expected '{}'",
                    position,
                    table,
                    value.column().name(),
                    expected.name()
                )));
            }
        }
        Ok(Self { table, values })
    }

    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    /// Key values in primary key order
    pub fn values(&self) -> &[TypedValue] {
        &self.values
    }

    /// Check if every primary key column is bound
    pub fn is_complete(&self) -> bool {
        self.values.len() == self.table.primary_key_columns().len()
    }

    /// Values of partition key columns, in order
    pub fn partition_key_values(&self) -> impl Iterator<Item = &TypedValue> {
        self.values.iter().filter(|v| v.column().is_partition_key())
    }
}

/// One end of a clustering range
#[derive(Debug, Clone, PartialEq)]
pub struct RangeBound {
    pub values: Vec<TypedValue>,
    pub inclusive: bool,
}

/// A slice of rows selected by clustering bounds, `None` meaning unbounded
#[derive(Debug, Clone, PartialEq)]
pub struct RowsRange {
    pub start: Option<RangeBound>,
    pub end: Option<RangeBound>,
}

/// Rows a mutation applies to
#[derive(Debug, Clone, PartialEq)]
pub enum RowsImpacted {
    /// Point mutation on one or more keys
    Keys(Vec<PrimaryKeyValue>),
    /// Range mutation
    Ranges(Vec<RowsRange>),
    /// Every row of the table
    All,
}

impl RowsImpacted {
    /// Primary keys of a point mutation, empty for the other variants
    pub fn keys(&self) -> &[PrimaryKeyValue] {
        match self {
            RowsImpacted::Keys(keys) => keys,
            RowsImpacted::Ranges(_) | RowsImpacted::All => &[],
        }
    }
}

impl RangeBound {
    fn columns(&self) -> String {
        let names: Vec<&str> = self.values.iter().map(|v| v.column().name()).collect();
        names.join(",")
    }
}

// `[ck..*)`: brackets mark inclusive ends, `*` an unbounded one
impl std::fmt::Display for RowsRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.start {
            Some(b) => write!(f, "{}{}", if b.inclusive { '[' } else { '(' }, b.columns())?,
            None => f.write_str("(*")?,
        }
        f.write_str("..")?;
        match &self.end {
            Some(b) => write!(f, "{}{}", b.columns(), if b.inclusive { ']' } else { ')' }),
            None => f.write_str("*)"),
        }
    }
}

impl std::fmt::Display for RowsImpacted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowsImpacted::Keys(keys) => write!(f, "keys({})", keys.len()),
            RowsImpacted::Ranges(ranges) => {
                let ranges: Vec<String> = ranges.iter().map(|r| r.to_string()).collect();
                write!(f, "ranges({})", ranges.join(" "))
            }
            RowsImpacted::All => f.write_str("all"),
        }
    }
}

/// How a modification changes its column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModificationOperation {
    Set,
    Increment,
    Append,
    Prepend,
    Remove,
}

/// A column-level change; carried through the builder untouched
#[derive(Debug, Clone, PartialEq)]
pub struct Modification {
    pub column: Column,
    pub operation: ModificationOperation,
    /// `None` for column deletions
    pub value: Option<TypedValue>,
}

/// A DML statement bound to its table
#[derive(Debug, Clone, PartialEq)]
pub struct BoundMutation {
    pub kind: QueryKind,
    pub table: Arc<Table>,
    pub ttl: Option<i32>,
    pub timestamp: Option<i64>,
    pub rows_impacted: RowsImpacted,
    pub modifications: Vec<Modification>,
}

impl BoundMutation {
    /// Create a mutation with no TTL, timestamp or modifications
    pub fn new(kind: QueryKind, table: Arc<Table>, rows_impacted: RowsImpacted) -> Self {
        Self {
            kind,
            table,
            ttl: None,
            timestamp: None,
            rows_impacted,
            modifications: Vec::new(),
        }
    }

    /// Set the TTL in seconds
    pub fn with_ttl(mut self, ttl: i32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Set the write timestamp (microseconds)
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Add a column modification
    pub fn with_modification(mut self, modification: Modification) -> Self {
        self.modifications.push(modification);
        self
    }
}
