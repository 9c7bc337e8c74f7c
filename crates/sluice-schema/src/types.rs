//! Column type registry, column kinds and clustering orders
//!
//! Type ids follow the CQL native protocol option ids. Ids are assigned
//! additively: a retired variant keeps its id forever and new variants take
//! fresh ones, so `from_id(id(t)) == t` holds across producer and consumer
//! versions.

use crate::error::{Result, SchemaError};
use serde::{Deserialize, Serialize};

/// CQL column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Custom,
    Ascii,
    Bigint,
    Blob,
    Boolean,
    Counter,
    Decimal,
    Double,
    Float,
    Int,
    Text,
    Timestamp,
    Uuid,
    Varchar,
    Varint,
    Timeuuid,
    Inet,
    Date,
    Time,
    Smallint,
    Tinyint,
    Duration,
    List,
    Map,
    Set,
    Udt,
    Tuple,
}

impl ColumnType {
    /// Every registered column type, in id order
    pub const ALL: [ColumnType; 27] = [
        ColumnType::Custom,
        ColumnType::Ascii,
        ColumnType::Bigint,
        ColumnType::Blob,
        ColumnType::Boolean,
        ColumnType::Counter,
        ColumnType::Decimal,
        ColumnType::Double,
        ColumnType::Float,
        ColumnType::Int,
        ColumnType::Text,
        ColumnType::Timestamp,
        ColumnType::Uuid,
        ColumnType::Varchar,
        ColumnType::Varint,
        ColumnType::Timeuuid,
        ColumnType::Inet,
        ColumnType::Date,
        ColumnType::Time,
        ColumnType::Smallint,
        ColumnType::Tinyint,
        ColumnType::Duration,
        ColumnType::List,
        ColumnType::Map,
        ColumnType::Set,
        ColumnType::Udt,
        ColumnType::Tuple,
    ];

    /// Stable wire id of this type
    pub const fn id(self) -> i32 {
        match self {
            ColumnType::Custom => 0x00,
            ColumnType::Ascii => 0x01,
            ColumnType::Bigint => 0x02,
            ColumnType::Blob => 0x03,
            ColumnType::Boolean => 0x04,
            ColumnType::Counter => 0x05,
            ColumnType::Decimal => 0x06,
            ColumnType::Double => 0x07,
            ColumnType::Float => 0x08,
            ColumnType::Int => 0x09,
            ColumnType::Text => 0x0A,
            ColumnType::Timestamp => 0x0B,
            ColumnType::Uuid => 0x0C,
            ColumnType::Varchar => 0x0D,
            ColumnType::Varint => 0x0E,
            ColumnType::Timeuuid => 0x0F,
            ColumnType::Inet => 0x10,
            ColumnType::Date => 0x11,
            ColumnType::Time => 0x12,
            ColumnType::Smallint => 0x13,
            ColumnType::Tinyint => 0x14,
            ColumnType::Duration => 0x15,
            ColumnType::List => 0x20,
            ColumnType::Map => 0x21,
            ColumnType::Set => 0x22,
            ColumnType::Udt => 0x30,
            ColumnType::Tuple => 0x31,
        }
    }

    /// Resolve a wire id back to its column type
    pub fn from_id(id: i32) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.id() == id)
            .ok_or(SchemaError::UnknownTypeId(id))
    }

    /// CQL keyword for this type
    pub fn cql_name(self) -> &'static str {
        match self {
            ColumnType::Custom => "custom",
            ColumnType::Ascii => "ascii",
            ColumnType::Bigint => "bigint",
            ColumnType::Blob => "blob",
            ColumnType::Boolean => "boolean",
            ColumnType::Counter => "counter",
            ColumnType::Decimal => "decimal",
            ColumnType::Double => "double",
            ColumnType::Float => "float",
            ColumnType::Int => "int",
            ColumnType::Text => "text",
            ColumnType::Timestamp => "timestamp",
            ColumnType::Uuid => "uuid",
            ColumnType::Varchar => "varchar",
            ColumnType::Varint => "varint",
            ColumnType::Timeuuid => "timeuuid",
            ColumnType::Inet => "inet",
            ColumnType::Date => "date",
            ColumnType::Time => "time",
            ColumnType::Smallint => "smallint",
            ColumnType::Tinyint => "tinyint",
            ColumnType::Duration => "duration",
            ColumnType::List => "list",
            ColumnType::Map => "map",
            ColumnType::Set => "set",
            ColumnType::Udt => "udt",
            ColumnType::Tuple => "tuple",
        }
    }

    /// Check if this is a list, set or map
    pub fn is_collection(self) -> bool {
        matches!(self, ColumnType::List | ColumnType::Set | ColumnType::Map)
    }

    /// Check if values of this type need type parameters to be interpreted
    pub fn is_parameterized(self) -> bool {
        self.is_collection()
            || matches!(self, ColumnType::Udt | ColumnType::Tuple | ColumnType::Custom)
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.cql_name())
    }
}

/// Role of a column within its table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ColumnKind {
    PartitionKey,
    Clustering,
    Static,
    #[default]
    Regular,
}

impl ColumnKind {
    /// Canonical wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::PartitionKey => "PartitionKey",
            ColumnKind::Clustering => "Clustering",
            ColumnKind::Static => "Static",
            ColumnKind::Regular => "Regular",
        }
    }

    /// Check if the column is part of the primary key
    pub fn is_primary_key(&self) -> bool {
        matches!(self, ColumnKind::PartitionKey | ColumnKind::Clustering)
    }
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ColumnKind {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "PartitionKey" => Ok(ColumnKind::PartitionKey),
            "Clustering" => Ok(ColumnKind::Clustering),
            "Static" => Ok(ColumnKind::Static),
            "Regular" => Ok(ColumnKind::Regular),
            _ => Err(SchemaError::UnknownColumnKind(s.to_string())),
        }
    }
}

/// Sort order of a clustering column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ClusteringOrder {
    Asc,
    Desc,
}

impl ClusteringOrder {
    /// Canonical wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            ClusteringOrder::Asc => "ASC",
            ClusteringOrder::Desc => "DESC",
        }
    }
}

impl std::fmt::Display for ClusteringOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ClusteringOrder {
    type Err = SchemaError;

    // Names are case sensitive on the wire.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ASC" => Ok(ClusteringOrder::Asc),
            "DESC" => Ok(ClusteringOrder::Desc),
            _ => Err(SchemaError::UnknownClusteringOrder(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_type_id_bijection() {
        for t in ColumnType::ALL {
            assert_eq!(ColumnType::from_id(t.id()).unwrap(), t);
        }
    }

    #[test]
    fn test_type_ids_unique() {
        let ids: HashSet<i32> = ColumnType::ALL.iter().map(|t| t.id()).collect();
        assert_eq!(ids.len(), ColumnType::ALL.len());
    }

    #[test]
    fn test_known_type_ids() {
        assert_eq!(ColumnType::Ascii.id(), 1);
        assert_eq!(ColumnType::Counter.id(), 5);
        assert_eq!(ColumnType::Int.id(), 9);
        assert_eq!(ColumnType::Tuple.id(), 0x31);
    }

    #[test]
    fn test_unknown_type_id() {
        assert_eq!(
            ColumnType::from_id(0x16),
            Err(SchemaError::UnknownTypeId(0x16))
        );
        assert_eq!(ColumnType::from_id(-1), Err(SchemaError::UnknownTypeId(-1)));
    }

    #[test]
    fn test_type_classification() {
        assert!(ColumnType::Map.is_collection());
        assert!(!ColumnType::Udt.is_collection());
        assert!(ColumnType::Udt.is_parameterized());
        assert!(!ColumnType::Int.is_parameterized());
    }

    #[test]
    fn test_kind_names() {
        for kind in [
            ColumnKind::PartitionKey,
            ColumnKind::Clustering,
            ColumnKind::Static,
            ColumnKind::Regular,
        ] {
            assert_eq!(kind.as_str().parse::<ColumnKind>().unwrap(), kind);
        }
        assert!("partitionkey".parse::<ColumnKind>().is_err());
        assert!(ColumnKind::Clustering.is_primary_key());
        assert!(!ColumnKind::Static.is_primary_key());
    }

    #[test]
    fn test_order_names() {
        assert_eq!("ASC".parse::<ClusteringOrder>().unwrap(), ClusteringOrder::Asc);
        assert_eq!("DESC".parse::<ClusteringOrder>().unwrap(), ClusteringOrder::Desc);
        assert_eq!(
            "asc".parse::<ClusteringOrder>(),
            Err(SchemaError::UnknownClusteringOrder("asc".to_string()))
        );
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&ColumnType::Timeuuid).unwrap(), "\"timeuuid\"");
        assert_eq!(
            serde_json::to_string(&ColumnKind::PartitionKey).unwrap(),
            "\"PartitionKey\""
        );
        assert_eq!(serde_json::to_string(&ClusteringOrder::Desc).unwrap(), "\"DESC\"");
    }
}
