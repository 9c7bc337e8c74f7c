//! Columns and tables
//!
//! A [`Table`] is built once from live schema metadata and then shared
//! read-only (usually behind an `Arc`) by every mutation that touches it.

use crate::error::{Result, SchemaError};
use crate::types::{ClusteringOrder, ColumnKind, ColumnType};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A table column
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ColumnRepr")]
pub struct Column {
    name: String,
    kind: ColumnKind,
    #[serde(default, rename = "type")]
    column_type: Option<ColumnType>,
    #[serde(default)]
    order: Option<ClusteringOrder>,
}

impl Column {
    /// Create a column with no type and no clustering order.
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(SchemaError::EmptyColumnName);
        }
        Ok(Self {
            name,
            kind,
            column_type: None,
            order: None,
        })
    }

    /// Create a column of the given kind and type
    pub fn typed(
        name: impl Into<String>,
        kind: ColumnKind,
        column_type: ColumnType,
    ) -> Result<Self> {
        Ok(Self::new(name, kind)?.with_type(column_type))
    }

    /// Set the column type
    pub fn with_type(mut self, column_type: ColumnType) -> Self {
        self.column_type = Some(column_type);
        self
    }

    /// Set the clustering order
    pub fn with_order(mut self, order: ClusteringOrder) -> Self {
        self.order = Some(order);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    /// Declared type, `None` when unresolved at capture time
    pub fn column_type(&self) -> Option<ColumnType> {
        self.column_type
    }

    pub fn order(&self) -> Option<ClusteringOrder> {
        self.order
    }

    /// Check if this column is part of the partition key
    pub fn is_partition_key(&self) -> bool {
        self.kind == ColumnKind::PartitionKey
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(t) = self.column_type {
            write!(f, " {}", t)?;
        }
        write!(f, " ({})", self.kind)
    }
}

// Deserialized forms run through the same checks as the constructors.
#[derive(Deserialize)]
struct ColumnRepr {
    name: String,
    kind: ColumnKind,
    #[serde(default, rename = "type")]
    column_type: Option<ColumnType>,
    #[serde(default)]
    order: Option<ClusteringOrder>,
}

impl TryFrom<ColumnRepr> for Column {
    type Error = SchemaError;

    fn try_from(repr: ColumnRepr) -> Result<Self> {
        let mut column = Column::new(repr.name, repr.kind)?;
        column.column_type = repr.column_type;
        column.order = repr.order;
        Ok(column)
    }
}

#[derive(Deserialize)]
struct TableRepr {
    keyspace: String,
    name: String,
    columns: Vec<Column>,
}

impl TryFrom<TableRepr> for Table {
    type Error = SchemaError;

    fn try_from(repr: TableRepr) -> Result<Self> {
        Table::new(repr.keyspace, repr.name, repr.columns)
    }
}

/// Schema of a single table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TableRepr")]
pub struct Table {
    keyspace: String,
    name: String,
    columns: Vec<Column>,
}

impl Table {
    /// Create a table. Column order is kept as given.
    pub fn new(
        keyspace: impl Into<String>,
        name: impl Into<String>,
        columns: Vec<Column>,
    ) -> Result<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.name()) {
                return Err(SchemaError::DuplicateColumn(column.name().to_string()));
            }
        }
        Ok(Self {
            keyspace: keyspace.into(),
            name: name.into(),
            columns,
        })
    }

    pub fn keyspace(&self) -> &str {
        &self.keyspace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All columns in declared order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// `keyspace.name`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.keyspace, self.name)
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn partition_key_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns_of(ColumnKind::PartitionKey)
    }

    pub fn clustering_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns_of(ColumnKind::Clustering)
    }

    /// Partition key columns then clustering columns, each in declared order
    pub fn primary_key_columns(&self) -> Vec<&Column> {
        self.partition_key_columns()
            .chain(self.clustering_columns())
            .collect()
    }

    fn columns_of(&self, kind: ColumnKind) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(move |c| c.kind() == kind)
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.keyspace, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> Table {
        Table::new(
            "ks",
            "users",
            vec![
                Column::typed("ck", ColumnKind::Clustering, ColumnType::Int)
                    .unwrap()
                    .with_order(ClusteringOrder::Desc),
                Column::typed("name", ColumnKind::Regular, ColumnType::Text).unwrap(),
                Column::typed("id", ColumnKind::PartitionKey, ColumnType::Uuid).unwrap(),
                Column::typed("bucket", ColumnKind::PartitionKey, ColumnType::Int).unwrap(),
                Column::typed("total", ColumnKind::Static, ColumnType::Bigint).unwrap(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_empty_column_name() {
        assert_eq!(
            Column::new("", ColumnKind::Regular),
            Err(SchemaError::EmptyColumnName)
        );
    }

    #[test]
    fn test_column_optional_fields() {
        let column = Column::new("col_2", ColumnKind::Regular).unwrap();
        assert_eq!(column.column_type(), None);
        assert_eq!(column.order(), None);

        let column = column.with_order(ClusteringOrder::Asc);
        assert_eq!(column.column_type(), None);
        assert_eq!(column.order(), Some(ClusteringOrder::Asc));
    }

    #[test]
    fn test_duplicate_column() {
        let result = Table::new(
            "ks",
            "t",
            vec![
                Column::new("a", ColumnKind::PartitionKey).unwrap(),
                Column::new("a", ColumnKind::Regular).unwrap(),
            ],
        );
        assert_eq!(result, Err(SchemaError::DuplicateColumn("a".to_string())));
    }

    #[test]
    fn test_primary_key_columns() {
        let table = users();
        let names: Vec<&str> = table.primary_key_columns().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["id", "bucket", "ck"]);
    }

    #[test]
    fn test_column_lookup() {
        let table = users();
        assert_eq!(table.column("name").unwrap().column_type(), Some(ColumnType::Text));
        assert!(table.column("missing").is_none());
        assert_eq!(table.qualified_name(), "ks.users");
    }

    #[test]
    fn test_empty_table() {
        let table = Table::new("ks", "table", Vec::new()).unwrap();
        assert!(table.columns().is_empty());
        assert!(table.primary_key_columns().is_empty());
    }

    #[test]
    fn test_deserialize_validates() {
        let column: Column =
            serde_json::from_str(r#"{"name":"pk","kind":"PartitionKey","type":"int"}"#).unwrap();
        assert_eq!(column.column_type(), Some(ColumnType::Int));
        assert_eq!(column.order(), None);

        assert!(serde_json::from_str::<Column>(r#"{"name":"","kind":"Regular"}"#).is_err());
        assert!(serde_json::from_str::<Table>(
            r#"{"keyspace":"ks","name":"t","columns":[
                {"name":"a","kind":"Regular"},{"name":"a","kind":"Static"}]}"#
        )
        .is_err());
    }

    #[test]
    fn test_column_display() {
        let column = Column::typed("id", ColumnKind::PartitionKey, ColumnType::Uuid).unwrap();
        assert_eq!(column.to_string(), "id uuid (PartitionKey)");
    }
}
