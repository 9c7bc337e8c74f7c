//! Serde helpers for `bytes::Bytes` fields

use bytes::Bytes;
use serde::{Deserializer, Serializer};

/// Serde module for `Bytes` fields
pub mod bytes_serde {
    use super::*;

    pub fn serialize<S>(val: &Bytes, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serde_bytes::serialize(&val[..], serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Bytes, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v: Vec<u8> = serde_bytes::deserialize(deserializer)?;
        Ok(Bytes::from(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Cell {
        #[serde(with = "bytes_serde")]
        value: Bytes,
    }

    #[test]
    fn test_bytes_serde_roundtrip() {
        let cell = Cell {
            value: Bytes::from_static(&[0, 1, 255]),
        };
        let json = serde_json::to_string(&cell).unwrap();
        assert_eq!(json, r#"{"value":[0,1,255]}"#);
        let decoded: Cell = serde_json::from_str(&json).unwrap();
        assert_eq!(cell, decoded);
    }
}
