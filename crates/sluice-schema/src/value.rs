//! Native (decoded) CQL values

use crate::types::ColumnType;
use bytes::Bytes;
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use uuid::Uuid;

/// A CQL duration: months, days and nanoseconds are independent components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CqlDuration {
    pub months: i32,
    pub days: i32,
    pub nanos: i64,
}

/// Arbitrary precision decimal, `unscaled * 10^-scale`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CqlDecimal {
    pub unscaled: BigInt,
    pub scale: i32,
}

impl CqlDecimal {
    pub fn new(unscaled: impl Into<BigInt>, scale: i32) -> Self {
        Self {
            unscaled: unscaled.into(),
            scale,
        }
    }
}

/// A decoded scalar value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CqlValue {
    Ascii(String),
    Bigint(i64),
    Blob(Bytes),
    Boolean(bool),
    Counter(i64),
    /// Days since the epoch, centered on 2^31
    Date(u32),
    Decimal(CqlDecimal),
    Double(f64),
    Duration(CqlDuration),
    Float(f32),
    Inet(IpAddr),
    Int(i32),
    Smallint(i16),
    /// Also used for `varchar` columns
    Text(String),
    /// Nanoseconds since midnight
    Time(i64),
    /// Milliseconds since the epoch
    Timestamp(i64),
    Timeuuid(Uuid),
    Tinyint(i8),
    Uuid(Uuid),
    Varint(BigInt),
}

impl CqlValue {
    /// Short name of the variant, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            CqlValue::Ascii(_) => "ascii",
            CqlValue::Bigint(_) => "bigint",
            CqlValue::Blob(_) => "blob",
            CqlValue::Boolean(_) => "boolean",
            CqlValue::Counter(_) => "counter",
            CqlValue::Date(_) => "date",
            CqlValue::Decimal(_) => "decimal",
            CqlValue::Double(_) => "double",
            CqlValue::Duration(_) => "duration",
            CqlValue::Float(_) => "float",
            CqlValue::Inet(_) => "inet",
            CqlValue::Int(_) => "int",
            CqlValue::Smallint(_) => "smallint",
            CqlValue::Text(_) => "text",
            CqlValue::Time(_) => "time",
            CqlValue::Timestamp(_) => "timestamp",
            CqlValue::Timeuuid(_) => "timeuuid",
            CqlValue::Tinyint(_) => "tinyint",
            CqlValue::Uuid(_) => "uuid",
            CqlValue::Varint(_) => "varint",
        }
    }

    /// Check if this value can be stored in a column of the given type
    pub fn fits(&self, column_type: ColumnType) -> bool {
        matches!(
            (self, column_type),
            (CqlValue::Ascii(_), ColumnType::Ascii)
                | (CqlValue::Bigint(_), ColumnType::Bigint)
                | (CqlValue::Blob(_), ColumnType::Blob)
                | (CqlValue::Boolean(_), ColumnType::Boolean)
                | (CqlValue::Counter(_), ColumnType::Counter)
                | (CqlValue::Date(_), ColumnType::Date)
                | (CqlValue::Decimal(_), ColumnType::Decimal)
                | (CqlValue::Double(_), ColumnType::Double)
                | (CqlValue::Duration(_), ColumnType::Duration)
                | (CqlValue::Float(_), ColumnType::Float)
                | (CqlValue::Inet(_), ColumnType::Inet)
                | (CqlValue::Int(_), ColumnType::Int)
                | (CqlValue::Smallint(_), ColumnType::Smallint)
                | (CqlValue::Text(_), ColumnType::Text | ColumnType::Varchar)
                | (CqlValue::Time(_), ColumnType::Time)
                | (CqlValue::Timestamp(_), ColumnType::Timestamp)
                | (CqlValue::Timeuuid(_), ColumnType::Timeuuid)
                | (CqlValue::Tinyint(_), ColumnType::Tinyint)
                | (CqlValue::Uuid(_), ColumnType::Uuid)
                | (CqlValue::Varint(_), ColumnType::Varint)
        )
    }
}

impl From<bool> for CqlValue {
    fn from(v: bool) -> Self {
        CqlValue::Boolean(v)
    }
}

impl From<i32> for CqlValue {
    fn from(v: i32) -> Self {
        CqlValue::Int(v)
    }
}

impl From<i64> for CqlValue {
    fn from(v: i64) -> Self {
        CqlValue::Bigint(v)
    }
}

impl From<f64> for CqlValue {
    fn from(v: f64) -> Self {
        CqlValue::Double(v)
    }
}

impl From<&str> for CqlValue {
    fn from(v: &str) -> Self {
        CqlValue::Text(v.to_string())
    }
}

impl From<String> for CqlValue {
    fn from(v: String) -> Self {
        CqlValue::Text(v)
    }
}

impl From<Uuid> for CqlValue {
    fn from(v: Uuid) -> Self {
        CqlValue::Uuid(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fits() {
        assert!(CqlValue::Int(1).fits(ColumnType::Int));
        assert!(!CqlValue::Int(1).fits(ColumnType::Bigint));
        assert!(CqlValue::Text("v".into()).fits(ColumnType::Varchar));
        assert!(!CqlValue::Text("v".into()).fits(ColumnType::Ascii));
        assert!(!CqlValue::Counter(1).fits(ColumnType::Bigint));
    }

    #[test]
    fn test_conversions() {
        assert_eq!(CqlValue::from(true), CqlValue::Boolean(true));
        assert_eq!(CqlValue::from("v"), CqlValue::Text("v".to_string()));
        assert_eq!(CqlValue::from(7i64).type_name(), "bigint");
    }

    #[test]
    fn test_json_view() {
        let json = serde_json::to_value(CqlValue::Int(5)).unwrap();
        assert_eq!(json, serde_json::json!({"type": "int", "value": 5}));
    }

    #[test]
    fn test_blob_json_view() {
        let blob = CqlValue::Blob(Bytes::from_static(&[0, 7, 255]));
        let json = serde_json::to_value(&blob).unwrap();
        assert_eq!(json, serde_json::json!({"type": "blob", "value": [0, 7, 255]}));
        assert_eq!(serde_json::from_value::<CqlValue>(json).unwrap(), blob);
    }
}
